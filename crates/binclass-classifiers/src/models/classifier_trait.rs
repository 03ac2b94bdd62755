use ndarray::Array2;

use crate::data_handling::Label;
use crate::error::Result;

/// The contract every binary classifier in the crate satisfies, so callers can
/// pick an algorithm at runtime (see [`crate::models::factory::build_model`])
/// without knowing its internals.
///
/// A classifier starts unfitted. A successful `fit` replaces any previous
/// parameters; a failed `fit` leaves the instance untouched. Rows of `x` are
/// samples, columns are features.
pub trait BinaryClassifier {
    /// Fit the model on `x` with one label (0 or 1) per row.
    fn fit(&mut self, x: &Array2<f64>, y: &[Label]) -> Result<()>;

    /// Predicted class label for each row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<Label>>;

    /// `[P(class 0), P(class 1)]` for each row of `x`.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<[f64; 2]>>;

    /// Number of features seen at fit time, `None` while unfitted.
    fn n_features(&self) -> Option<usize>;

    fn is_fitted(&self) -> bool {
        self.n_features().is_some()
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Threshold class-1 probabilities at 0.5 into labels.
pub(crate) fn labels_from_proba(proba: &[[f64; 2]]) -> Vec<Label> {
    proba.iter().map(|p| if p[1] >= 0.5 { 1 } else { 0 }).collect()
}

/// Expand P(class 1) into the `[P(0), P(1)]` pair.
pub(crate) fn proba_pair(p1: f64) -> [f64; 2] {
    let p1 = p1.clamp(0.0, 1.0);
    [1.0 - p1, p1]
}
