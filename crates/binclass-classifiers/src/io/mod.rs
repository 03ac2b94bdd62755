//! IO utilities for loading training data from disk.

pub mod training_csv;

pub use training_csv::{read_training_csv, read_training_csv_from, LabeledData, ReadError};
