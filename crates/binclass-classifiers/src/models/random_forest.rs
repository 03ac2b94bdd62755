use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality};
use log::debug;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data_handling::{check_prediction_input, validate_training_data, Label};
use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::{labels_from_proba, proba_pair, BinaryClassifier};

/// Hyper-parameters for [`RandomForestClassifier`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RandomForestParams {
    pub n_trees: usize,
    /// `None` grows trees until leaves are pure or too small to split.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features drawn for each tree; `None` means `floor(sqrt(n_features))`.
    pub max_features: Option<usize>,
    /// Draw a bootstrap sample per tree instead of using every row.
    pub bootstrap: bool,
    /// Fixed seed for reproducible forests; `None` draws a fresh one per fit.
    pub seed: Option<u64>,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: None,
        }
    }
}

impl RandomForestParams {
    /// Validate the parameters and resolve the per-tree feature count.
    fn features_per_tree(&self, n_features: usize) -> Result<usize> {
        if self.n_trees == 0 {
            return Err(ClassifierError::invalid("n_trees must be at least 1"));
        }
        if self.min_samples_split < 2 {
            return Err(ClassifierError::invalid("min_samples_split must be at least 2"));
        }
        if self.min_samples_leaf == 0 {
            return Err(ClassifierError::invalid("min_samples_leaf must be at least 1"));
        }
        match self.max_features {
            Some(k) if k == 0 || k > n_features => Err(ClassifierError::invalid(format!(
                "max_features must be between 1 and {}, got {}",
                n_features, k
            ))),
            Some(k) => Ok(k),
            None => Ok(((n_features as f64).sqrt().floor() as usize).max(1)),
        }
    }
}

/// One bagged tree and the feature columns it was trained on.
struct ForestMember {
    tree: DecisionTree<f64, usize>,
    features: Vec<usize>,
}

impl ForestMember {
    fn votes(&self, x: &Array2<f64>) -> Array1<usize> {
        let columns = x.select(Axis(1), &self.features);
        self.tree.predict(&columns)
    }
}

struct FittedForest {
    members: Vec<ForestMember>,
    n_features: usize,
}

/// Bagged ensemble of `linfa-trees` decision trees. Each tree sees a bootstrap
/// sample of the rows and a random subset of the columns; the class-1
/// probability is the fraction of trees voting for class 1.
pub struct RandomForestClassifier {
    model: Option<FittedForest>,
    params: RandomForestParams,
}

impl RandomForestClassifier {
    pub fn new(params: RandomForestParams) -> Self {
        RandomForestClassifier {
            model: None,
            params,
        }
    }

    pub fn params(&self) -> &RandomForestParams {
        &self.params
    }

    /// Number of trees in the fitted ensemble, 0 while unfitted.
    pub fn n_fitted_trees(&self) -> usize {
        self.model.as_ref().map_or(0, |m| m.members.len())
    }
}

impl Default for RandomForestClassifier {
    fn default() -> Self {
        Self::new(RandomForestParams::default())
    }
}

impl BinaryClassifier for RandomForestClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[Label]) -> Result<()> {
        validate_training_data(x, y)?;
        let max_features = self.params.features_per_tree(x.ncols())?;

        let (n_samples, n_features) = x.dim();
        let params = &self.params;
        let base_seed = params.seed.unwrap_or_else(|| rand::thread_rng().gen());

        debug!(
            "Fitting random forest: rows={}, cols={}, n_trees={}, max_features={}, seed={}",
            n_samples, n_features, params.n_trees, max_features, base_seed
        );

        let members = (0..params.n_trees)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(i as u64));
                let rows: Vec<usize> = if params.bootstrap {
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
                } else {
                    (0..n_samples).collect()
                };
                let mut features = index::sample(&mut rng, n_features, max_features).into_vec();
                features.sort_unstable();

                let records = x.select(Axis(0), &rows).select(Axis(1), &features);
                let targets: Array1<usize> = rows.iter().map(|&r| usize::from(y[r])).collect();
                let dataset = Dataset::new(records, targets);

                let tree = DecisionTree::params()
                    .split_quality(SplitQuality::Gini)
                    .max_depth(params.max_depth)
                    .min_weight_split(params.min_samples_split as f32)
                    .min_weight_leaf(params.min_samples_leaf as f32)
                    .fit(&dataset)
                    .map_err(|e| ClassifierError::invalid(format!("tree {} failed to fit: {}", i, e)))?;
                Ok(ForestMember { tree, features })
            })
            .collect::<Result<Vec<_>>>()?;

        self.model = Some(FittedForest {
            members,
            n_features,
        });
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<Label>> {
        let proba = self.predict_proba(x)?;
        Ok(labels_from_proba(&proba))
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<[f64; 2]>> {
        let model = self.model.as_ref().ok_or(ClassifierError::NotFitted)?;
        check_prediction_input(x, model.n_features)?;

        let mut class_one = Array1::<f64>::zeros(x.nrows());
        for member in &model.members {
            for (count, vote) in class_one.iter_mut().zip(member.votes(x).iter()) {
                if *vote == 1 {
                    *count += 1.0;
                }
            }
        }
        let n_trees = model.members.len() as f64;
        Ok(class_one.iter().map(|&c| proba_pair(c / n_trees)).collect())
    }

    fn n_features(&self) -> Option<usize> {
        self.model.as_ref().map(|m| m.n_features)
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Two well separated clusters: class 0 near (0, 0), class 1 near (10, 10).
    fn clusters() -> (Array2<f64>, Vec<Label>) {
        let x = array![
            [0.1, 0.3],
            [0.4, 0.0],
            [0.2, 0.8],
            [0.9, 0.5],
            [0.6, 0.2],
            [0.0, 0.7],
            [10.2, 10.1],
            [10.8, 9.7],
            [9.9, 10.4],
            [10.5, 10.9],
            [9.6, 10.0],
            [10.0, 9.5]
        ];
        let y = vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1];
        (x, y)
    }

    fn seeded(seed: u64) -> RandomForestClassifier {
        RandomForestClassifier::new(RandomForestParams {
            n_trees: 25,
            seed: Some(seed),
            ..Default::default()
        })
    }

    #[test]
    fn separates_clusters() {
        let (x, y) = clusters();
        let mut forest = seeded(7);
        forest.fit(&x, &y).unwrap();

        assert_eq!(forest.n_fitted_trees(), 25);
        assert_eq!(forest.predict(&x).unwrap(), y);
        let far = array![[-5.0, -5.0], [20.0, 20.0]];
        assert_eq!(forest.predict(&far).unwrap(), vec![0, 1]);
    }

    #[test]
    fn same_seed_gives_same_probabilities() {
        let (x, y) = clusters();
        let probe = array![[5.0, 5.0], [3.0, 8.0], [0.5, 0.5]];

        let mut a = seeded(42);
        let mut b = seeded(42);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.predict_proba(&probe).unwrap(), b.predict_proba(&probe).unwrap());
    }

    #[test]
    fn probabilities_are_vote_fractions() {
        let (x, y) = clusters();
        let mut forest = seeded(3);
        forest.fit(&x, &y).unwrap();
        for p in forest.predict_proba(&array![[5.0, 5.0], [4.0, 6.0]]).unwrap() {
            let votes = p[1] * 25.0;
            assert!((votes - votes.round()).abs() < 1e-9, "{p:?}");
        }
    }

    #[test]
    fn single_tree_without_bootstrap_memorises_training_data() {
        let x = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
        let y = vec![0, 1, 1, 1];
        let mut forest = RandomForestClassifier::new(RandomForestParams {
            n_trees: 1,
            bootstrap: false,
            max_features: Some(2),
            seed: Some(1),
            ..Default::default()
        });
        forest.fit(&x, &y).unwrap();
        assert_eq!(forest.predict(&x).unwrap(), y);
    }

    #[test]
    fn single_class_training_set_is_accepted() {
        let x = array![[0.0], [1.0], [2.0]];
        let mut forest = seeded(5);
        forest.fit(&x, &[1, 1, 1]).unwrap();
        assert_eq!(forest.predict_proba(&array![[7.0]]).unwrap(), vec![[0.0, 1.0]]);
    }

    #[test]
    fn huge_finite_features_still_give_a_distribution() {
        let (x, y) = clusters();
        let mut forest = seeded(11);
        forest.fit(&x, &y).unwrap();
        let p = forest.predict_proba(&array![[1e308, -1e308]]).unwrap();
        assert!((p[0][0] + p[0][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn max_features_out_of_range_is_invalid() {
        let (x, y) = clusters();
        let mut forest = RandomForestClassifier::new(RandomForestParams {
            max_features: Some(3),
            ..Default::default()
        });
        let err = forest.fit(&x, &y).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidInput(_)));
        assert!(!forest.is_fitted());
    }

    #[test]
    fn zero_trees_is_invalid() {
        let (x, y) = clusters();
        let mut forest = RandomForestClassifier::new(RandomForestParams {
            n_trees: 0,
            ..Default::default()
        });
        assert!(forest.fit(&x, &y).is_err());
    }

    #[test]
    fn default_max_features_is_sqrt_of_width() {
        let params = RandomForestParams::default();
        assert_eq!(params.features_per_tree(4).unwrap(), 2);
        assert_eq!(params.features_per_tree(1).unwrap(), 1);
        assert_eq!(params.features_per_tree(10).unwrap(), 3);
    }
}
