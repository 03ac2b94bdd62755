//! binclass-classifiers: binary classifiers behind a single fit/predict contract.
//!
//! This crate provides the [`BinaryClassifier`] trait, two implementations of
//! it (L2-regularised logistic regression and a bagged random forest), a
//! config-driven factory for choosing between them at runtime, and helpers for
//! building and loading training sets.
//!
//! Every operation reports failures through [`ClassifierError`]; callers get
//! the specific kind (invalid input, not fitted, dimension mismatch) rather
//! than a generic failure.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod models;

pub use config::{ModelConfig, ModelType};
pub use data_handling::{Label, TrainingSet};
pub use error::ClassifierError;
pub use models::factory::build_model;
pub use models::BinaryClassifier;
