use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::logistic::LogisticRegressionParams;
use crate::models::random_forest::RandomForestParams;

/// Central configuration for models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct ModelConfig {
    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    LogisticRegression(LogisticRegressionParams),
    RandomForest(RandomForestParams),
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::LogisticRegression(LogisticRegressionParams::default())
    }
}

impl ModelType {
    /// Names accepted by [`ModelType::from_str`], one per algorithm.
    pub const NAMES: [&'static str; 2] = ["logistic_regression", "random_forest"];

    pub fn name(&self) -> &'static str {
        match self {
            ModelType::LogisticRegression(_) => "logistic_regression",
            ModelType::RandomForest(_) => "random_forest",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelType::LogisticRegression(_) => "Logistic Regression",
            ModelType::RandomForest(_) => "Random Forest",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(&[' ', '-'][..], "_");
        match key.as_str() {
            "logistic" | "logistic_regression" | "lr" => Ok(ModelType::LogisticRegression(
                LogisticRegressionParams::default(),
            )),
            "random_forest" | "forest" | "rf" => {
                Ok(ModelType::RandomForest(RandomForestParams::default()))
            }
            _ => Err(format!(
                "Unknown model type: {}. Available models: {}",
                s,
                ModelType::NAMES.join(", ")
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(model_type: ModelType) -> Self {
        Self { model_type }
    }
}
