//! Integration tests for model configuration and CSV loading.

use std::io::Write;

use binclass_classifiers::config::{ModelConfig, ModelType};
use binclass_classifiers::io::{read_training_csv, ReadError};
use binclass_classifiers::models::logistic::LogisticRegressionParams;
use binclass_classifiers::models::random_forest::RandomForestParams;
use binclass_classifiers::build_model;

// ---------------------------------------------------------------------------
// ModelType parsing
// ---------------------------------------------------------------------------

#[test]
fn model_type_accepts_common_spellings() {
    for name in ["logistic", "Logistic Regression", "logistic_regression", "LR"] {
        let parsed: ModelType = name.parse().unwrap();
        assert_eq!(parsed.name(), "logistic_regression", "{name}");
    }
    for name in ["random_forest", "Random Forest", "random-forest", "rf", "forest"] {
        let parsed: ModelType = name.parse().unwrap();
        assert_eq!(parsed.name(), "random_forest", "{name}");
    }
}

#[test]
fn unknown_model_type_lists_alternatives() {
    let err = "svm".parse::<ModelType>().unwrap_err();
    assert!(err.contains("svm"));
    assert!(err.contains("random_forest"));
}

#[test]
fn default_model_is_logistic_regression() {
    let cfg = ModelConfig::default();
    assert_eq!(cfg.model_type.display_name(), "Logistic Regression");
    assert_eq!(cfg.model_type.to_string(), "Logistic Regression");
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn model_config_round_trips_through_json() {
    let cfg = ModelConfig::new(ModelType::RandomForest(RandomForestParams {
        n_trees: 12,
        max_depth: Some(4),
        seed: Some(99),
        ..Default::default()
    }));
    let json = serde_json::to_string_pretty(&cfg).unwrap();
    assert!(json.contains("RandomForest"));
    assert!(json.contains("n_trees"));

    let back: ModelConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let cfg: ModelConfig =
        serde_json::from_str(r#"{ "LogisticRegression": { "l2_penalty": 0.5 } }"#).unwrap();
    match cfg.model_type {
        ModelType::LogisticRegression(params) => {
            assert_eq!(params.l2_penalty, 0.5);
            assert_eq!(params.max_iterations, LogisticRegressionParams::default().max_iterations);
            assert!(params.fit_intercept);
        }
        other => panic!("unexpected model type {other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV training data
// ---------------------------------------------------------------------------

#[test]
fn csv_training_set_fits_a_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "height,weight,label").unwrap();
    for i in 0..10 {
        let v = i as f64;
        writeln!(file, "{},{},{}", v, v * 0.5, u8::from(i >= 5)).unwrap();
    }
    drop(file);

    let data = read_training_csv(&path).unwrap();
    assert_eq!(data.feature_names, vec!["height", "weight"]);
    assert_eq!(data.training_set.class_counts(), (5, 5));

    let mut model = build_model(ModelConfig::default());
    model
        .fit(&data.training_set.x, &data.training_set.y)
        .unwrap();
    assert_eq!(model.n_features(), Some(2));
}

#[test]
fn missing_csv_file_is_a_read_error() {
    let err = read_training_csv("/nonexistent/path/train.csv").unwrap_err();
    assert!(matches!(err, ReadError::Csv { .. }));
    assert!(err.to_string().contains("/nonexistent/path/train.csv"));
}
