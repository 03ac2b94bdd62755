use log::debug;

use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::BinaryClassifier;
use crate::models::logistic::LogisticRegressionClassifier;
use crate::models::random_forest::RandomForestClassifier;

/// Build a boxed, unfitted classifier from a `ModelConfig`.
pub fn build_model(params: ModelConfig) -> Box<dyn BinaryClassifier> {
    debug!("Building {} classifier", params.model_type.name());
    match params.model_type {
        ModelType::LogisticRegression(lr) => Box::new(LogisticRegressionClassifier::new(lr)),
        ModelType::RandomForest(rf) => Box::new(RandomForestClassifier::new(rf)),
    }
}
