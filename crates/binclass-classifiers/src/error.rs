use thiserror::Error;

/// Errors raised by classifier operations.
///
/// Each variant is scoped to the call that produced it; a failed `fit` leaves
/// the classifier in whatever state it was in before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    /// Malformed or inconsistent data (or parameters) supplied to the classifier.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// `predict` or `predict_proba` called before a successful `fit`.
    #[error("classifier has not been fitted; call fit before predicting")]
    NotFitted,

    /// Prediction input has a different number of features than the training data.
    #[error("expected {expected} features per sample (as fitted), got {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

impl ClassifierError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ClassifierError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
