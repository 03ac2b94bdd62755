//! Playground: train a chosen classifier and classify one feature vector.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use binclass_classifiers::data_handling::random_training_set;
use binclass_classifiers::io::{read_training_csv, ReadError};
use binclass_classifiers::{build_model, ClassifierError, Label, ModelConfig, ModelType, TrainingSet};

/// Number of disposable samples drawn when no training file is given.
pub const DEFAULT_RANDOM_SAMPLES: usize = 100;

/// Where the playground gets its training data from.
#[derive(Debug, Clone)]
pub enum TrainingSource {
    Csv(PathBuf),
    /// Uniform random features and labels, sized to match the input vector.
    Random { samples: usize },
}

#[derive(Debug, Clone)]
pub struct PlaygroundRequest {
    pub model: ModelConfig,
    pub training: TrainingSource,
    pub features: Vec<f64>,
    /// Seeds both the random training data and the forest, when set.
    pub seed: Option<u64>,
}

/// Outcome of one playground prediction.
#[derive(Debug, Clone, Serialize)]
pub struct PlaygroundResult {
    pub model: String,
    pub prediction: Label,
    /// Probability of class 1.
    pub confidence: f64,
    pub probabilities: [f64; 2],
    pub training_samples: usize,
}

/// Load a model configuration from a JSON file.
pub fn load_model_config<P: AsRef<Path>>(path: P) -> Result<ModelConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: ModelConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

pub fn run(request: &PlaygroundRequest) -> Result<PlaygroundResult> {
    let mut model_type = request.model.model_type.clone();
    if let (ModelType::RandomForest(params), Some(seed)) = (&mut model_type, request.seed) {
        params.seed.get_or_insert(seed);
    }
    let display_name = model_type.display_name().to_string();

    let training_set = load_training_set(&request.training, request.features.len(), request.seed)?;
    info!(
        "Training {} on {} samples with {} features",
        display_name,
        training_set.n_samples(),
        training_set.n_features()
    );

    let mut model = build_model(ModelConfig::new(model_type));
    model.fit(&training_set.x, &training_set.y)?;

    let input = Array2::from_shape_vec((1, request.features.len()), request.features.clone())
        .context("Failed to build input feature vector")?;
    let prediction = model.predict(&input)?[0];
    let probabilities = model.predict_proba(&input)?[0];

    Ok(PlaygroundResult {
        model: display_name,
        prediction,
        confidence: probabilities[1],
        probabilities,
        training_samples: training_set.n_samples(),
    })
}

fn load_training_set(source: &TrainingSource, n_features: usize, seed: Option<u64>) -> Result<TrainingSet> {
    match source {
        TrainingSource::Csv(path) => Ok(read_training_csv(path)?.training_set),
        TrainingSource::Random { samples } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            Ok(random_training_set(*samples, n_features, &mut rng)?)
        }
    }
}

/// Human readable summary, one metric per line.
pub fn render(result: &PlaygroundResult) -> String {
    format!(
        "Model: {}\nPrediction: Class {}\nConfidence: {:.2}%",
        result.model,
        result.prediction,
        result.confidence * 100.0
    )
}

/// A next step for the user, chosen by the kind of failure.
pub fn hint_for(err: &anyhow::Error) -> Option<String> {
    let classifier_err = err.downcast_ref::<ClassifierError>().or_else(|| {
        match err.downcast_ref::<ReadError>() {
            Some(ReadError::Invalid { source, .. }) => Some(source),
            _ => None,
        }
    });

    if let Some(classifier_err) = classifier_err {
        return Some(match classifier_err {
            ClassifierError::NotFitted => "train the model before asking for predictions".to_string(),
            ClassifierError::DimensionMismatch { expected, found } => format!(
                "the model was trained on {} feature(s); pass exactly {} value(s) instead of {}",
                expected, expected, found
            ),
            ClassifierError::InvalidInput(_) => {
                "check the training data and model parameters, then try again".to_string()
            }
        });
    }

    match err.downcast_ref::<ReadError>() {
        Some(ReadError::Parse { .. }) => {
            Some("every feature must be numeric and the last column must be 0 or 1".to_string())
        }
        Some(ReadError::TooFewColumns { .. }) => {
            Some("the CSV needs a header, one or more feature columns and a final label column".to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binclass_classifiers::models::random_forest::RandomForestParams;

    fn request(model_type: ModelType, features: Vec<f64>) -> PlaygroundRequest {
        PlaygroundRequest {
            model: ModelConfig::new(model_type),
            training: TrainingSource::Random {
                samples: DEFAULT_RANDOM_SAMPLES,
            },
            features,
            seed: Some(17),
        }
    }

    #[test]
    fn random_training_gives_consistent_prediction() {
        for model_type in [
            ModelType::default(),
            ModelType::RandomForest(RandomForestParams {
                n_trees: 20,
                ..Default::default()
            }),
        ] {
            let result = run(&request(model_type, vec![0.0, 0.0, 0.0, 0.0])).unwrap();
            assert_eq!(result.training_samples, DEFAULT_RANDOM_SAMPLES);
            assert!((result.probabilities[0] + result.probabilities[1] - 1.0).abs() < 1e-9);
            assert_eq!(result.prediction == 1, result.confidence >= 0.5);
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let forest = ModelType::RandomForest(RandomForestParams {
            n_trees: 10,
            ..Default::default()
        });
        let a = run(&request(forest.clone(), vec![0.3, 0.6])).unwrap();
        let b = run(&request(forest, vec![0.3, 0.6])).unwrap();
        assert_eq!(a.probabilities, b.probabilities);
    }

    #[test]
    fn render_shows_class_and_percentage() {
        let result = PlaygroundResult {
            model: "Logistic Regression".to_string(),
            prediction: 1,
            confidence: 0.73456,
            probabilities: [0.26544, 0.73456],
            training_samples: 100,
        };
        let text = render(&result);
        assert!(text.contains("Prediction: Class 1"));
        assert!(text.contains("Confidence: 73.46%"));
    }

    #[test]
    fn hints_depend_on_error_kind() {
        let mismatch = anyhow::Error::from(ClassifierError::DimensionMismatch {
            expected: 2,
            found: 4,
        });
        assert!(hint_for(&mismatch).unwrap().contains("exactly 2"));

        let not_fitted = anyhow::Error::from(ClassifierError::NotFitted);
        assert!(hint_for(&not_fitted).unwrap().contains("train"));

        let other = anyhow::anyhow!("disk on fire");
        assert!(hint_for(&other).is_none());
    }
}
