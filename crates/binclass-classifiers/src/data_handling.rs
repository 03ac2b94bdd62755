//! Training-set construction and the input checks shared by every classifier.
//!
//! Classifiers call [`validate_training_data`] before touching their own
//! state and [`check_prediction_input`] before predicting, so the error
//! behaviour is identical across algorithms.
use ndarray::Array2;
use rand::Rng;

use crate::error::{ClassifierError, Result};

/// A binary class label, 0 or 1.
pub type Label = u8;

/// Validated (features, labels) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    pub x: Array2<f64>,
    pub y: Vec<Label>,
}

impl TrainingSet {
    pub fn new(x: Array2<f64>, y: Vec<Label>) -> Result<Self> {
        validate_training_data(&x, &y)?;
        Ok(TrainingSet { x, y })
    }

    /// Build a training set from row vectors; ragged rows are rejected.
    pub fn from_rows(rows: &[Vec<f64>], labels: Vec<Label>) -> Result<Self> {
        let x = features_from_rows(rows)?;
        Self::new(x, labels)
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Count of (class 0, class 1) labels.
    pub fn class_counts(&self) -> (usize, usize) {
        let positives = self.y.iter().filter(|&&l| l == 1).count();
        (self.y.len() - positives, positives)
    }
}

/// Stack row vectors into a feature matrix.
pub fn features_from_rows(rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
    let mut data = Vec::with_capacity(rows.len() * n_cols);
    for (i, row) in rows.iter().enumerate() {
        if row.len() != n_cols {
            return Err(ClassifierError::invalid(format!(
                "row {} has {} features but row 0 has {}",
                i,
                row.len(),
                n_cols
            )));
        }
        data.extend_from_slice(row);
    }
    Array2::from_shape_vec((rows.len(), n_cols), data)
        .map_err(|e| ClassifierError::invalid(format!("could not build feature matrix: {}", e)))
}

/// Checks applied by every `fit` before any state is modified.
pub fn validate_training_data(x: &Array2<f64>, y: &[Label]) -> Result<()> {
    if x.nrows() == 0 {
        return Err(ClassifierError::invalid("training set is empty"));
    }
    if x.ncols() == 0 {
        return Err(ClassifierError::invalid("training samples have no features"));
    }
    if x.nrows() != y.len() {
        return Err(ClassifierError::invalid(format!(
            "{} feature rows but {} labels",
            x.nrows(),
            y.len()
        )));
    }
    if let Some((i, &label)) = y.iter().enumerate().find(|(_, &l)| l > 1) {
        return Err(ClassifierError::invalid(format!(
            "label {} at index {} is not 0 or 1",
            label, i
        )));
    }
    ensure_finite(x)
}

/// Checks applied by `predict`/`predict_proba` against the fitted dimensionality.
pub fn check_prediction_input(x: &Array2<f64>, n_features: usize) -> Result<()> {
    if x.ncols() != n_features {
        return Err(ClassifierError::DimensionMismatch {
            expected: n_features,
            found: x.ncols(),
        });
    }
    ensure_finite(x)
}

fn ensure_finite(x: &Array2<f64>) -> Result<()> {
    for ((row, col), v) in x.indexed_iter() {
        if !v.is_finite() {
            return Err(ClassifierError::invalid(format!(
                "non-finite value {} at row {}, column {}",
                v, row, col
            )));
        }
    }
    Ok(())
}

/// Disposable training data: features uniform in [0, 1), labels uniform in {0, 1}.
pub fn random_training_set<R: Rng>(
    n_samples: usize,
    n_features: usize,
    rng: &mut R,
) -> Result<TrainingSet> {
    let x = Array2::from_shape_fn((n_samples, n_features), |_| rng.gen::<f64>());
    let y = (0..n_samples).map(|_| rng.gen_range(0..=1u8)).collect();
    TrainingSet::new(x, y)
}
