use linfa::traits::Fit;
use linfa::Dataset;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use log::debug;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::data_handling::{check_prediction_input, validate_training_data, Label};
use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::{labels_from_proba, proba_pair, BinaryClassifier};

/// Hyper-parameters for [`LogisticRegressionClassifier`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LogisticRegressionParams {
    /// Strength of the L2 penalty on the weights (the intercept is not penalised).
    pub l2_penalty: f64,
    pub max_iterations: u64,
    /// Gradient norm at which the L-BFGS solver stops.
    pub tolerance: f64,
    pub fit_intercept: bool,
}

impl Default for LogisticRegressionParams {
    fn default() -> Self {
        Self {
            l2_penalty: 0.01,
            max_iterations: 100,
            tolerance: 1e-4,
            fit_intercept: true,
        }
    }
}

impl LogisticRegressionParams {
    fn validate(&self) -> Result<()> {
        if !self.l2_penalty.is_finite() || self.l2_penalty < 0.0 {
            return Err(ClassifierError::invalid(format!(
                "l2_penalty must be a non-negative number, got {}",
                self.l2_penalty
            )));
        }
        if self.max_iterations == 0 {
            return Err(ClassifierError::invalid("max_iterations must be at least 1"));
        }
        if !(self.tolerance > 0.0) {
            return Err(ClassifierError::invalid(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// L2-regularised logistic regression backed by `linfa-logistic`.
pub struct LogisticRegressionClassifier {
    model: Option<FittedLogisticRegression<f64, usize>>,
    params: LogisticRegressionParams,
}

impl LogisticRegressionClassifier {
    pub fn new(params: LogisticRegressionParams) -> Self {
        LogisticRegressionClassifier {
            model: None,
            params,
        }
    }

    pub fn params(&self) -> &LogisticRegressionParams {
        &self.params
    }

    /// Fitted feature weights, signed so that positive values favour class 1.
    pub fn weights(&self) -> Option<Array1<f64>> {
        self.model.as_ref().map(|m| {
            if positive_is_class_one(m) {
                m.params().clone()
            } else {
                -m.params()
            }
        })
    }

    pub fn intercept(&self) -> Option<f64> {
        self.model.as_ref().map(|m| {
            if positive_is_class_one(m) {
                m.intercept()
            } else {
                -m.intercept()
            }
        })
    }

    /// Linear score `x·w + b` per row; positive means class 1 is more likely.
    ///
    /// Rows whose score is not finite (features large enough to overflow the
    /// dot product) are rejected as invalid input.
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        let model = self.model.as_ref().ok_or(ClassifierError::NotFitted)?;
        check_prediction_input(x, model.params().len())?;
        let sign = if positive_is_class_one(model) { 1.0 } else { -1.0 };
        let z = (x.dot(model.params()) + model.intercept()) * sign;
        if let Some(row) = z.iter().position(|v| !v.is_finite()) {
            return Err(ClassifierError::invalid(format!(
                "row {} overflows the linear score; rescale its features",
                row
            )));
        }
        Ok(z.to_vec())
    }
}

impl Default for LogisticRegressionClassifier {
    fn default() -> Self {
        Self::new(LogisticRegressionParams::default())
    }
}

impl BinaryClassifier for LogisticRegressionClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[Label]) -> Result<()> {
        self.params.validate()?;
        validate_training_data(x, y)?;
        if y.iter().all(|&l| l == y[0]) {
            return Err(ClassifierError::invalid(format!(
                "logistic regression needs both classes, all labels are {}",
                y[0]
            )));
        }

        debug!(
            "Fitting logistic regression: rows={}, cols={}, l2_penalty={}",
            x.nrows(),
            x.ncols(),
            self.params.l2_penalty
        );

        let targets: Array1<usize> = y.iter().map(|&l| usize::from(l)).collect();
        let dataset = Dataset::new(x.to_owned(), targets);

        let model = LogisticRegression::default()
            .alpha(self.params.l2_penalty)
            .max_iterations(self.params.max_iterations)
            .gradient_tolerance(self.params.tolerance)
            .with_intercept(self.params.fit_intercept)
            .fit(&dataset)
            .map_err(|e| ClassifierError::invalid(format!("logistic regression failed to fit: {}", e)))?;

        debug!(
            "logistic regression fitted: intercept={:.4}, weights={:?}",
            model.intercept(),
            model.params().as_slice()
        );
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<Label>> {
        let proba = self.predict_proba(x)?;
        Ok(labels_from_proba(&proba))
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<[f64; 2]>> {
        let model = self.model.as_ref().ok_or(ClassifierError::NotFitted)?;
        // rejects overflowing rows before they turn into NaN probabilities
        self.decision_function(x)?;

        let positive = model.predict_probabilities(x);
        let flip = !positive_is_class_one(model);
        Ok(positive
            .iter()
            .map(|&p| proba_pair(if flip { 1.0 - p } else { p }))
            .collect())
    }

    fn n_features(&self) -> Option<usize> {
        self.model.as_ref().map(|m| m.params().len())
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}

/// The backend picks which input class it models as "positive".
fn positive_is_class_one(model: &FittedLogisticRegression<f64, usize>) -> bool {
    model.labels().pos.class == 1
}
