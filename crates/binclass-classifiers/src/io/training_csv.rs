//! Headered CSV reader: feature columns first, the class label (0 or 1) last.
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::debug;
use thiserror::Error;

use crate::data_handling::{features_from_rows, Label, TrainingSet};
use crate::error::ClassifierError;

/// Training data loaded from a CSV file.
#[derive(Debug, Clone)]
pub struct LabeledData {
    pub feature_names: Vec<String>,
    pub label_column: String,
    pub training_set: TrainingSet,
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("{source_name}: expected at least one feature column and a label column, found {found} column(s)")]
    TooFewColumns { source_name: String, found: usize },

    #[error("{source_name}, line {line}: column '{column}' value '{value}' is not {expected}")]
    Parse {
        source_name: String,
        line: u64,
        column: String,
        value: String,
        expected: &'static str,
    },

    #[error("{source_name}: {source}")]
    Invalid {
        source_name: String,
        #[source]
        source: ClassifierError,
    },
}

/// Read a training set from a CSV file on disk.
pub fn read_training_csv<P: AsRef<Path>>(path: P) -> Result<LabeledData, ReadError> {
    let source_name = path.as_ref().display().to_string();
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())
        .map_err(|source| ReadError::Csv {
            source_name: source_name.clone(),
            source,
        })?;
    read_records(rdr, source_name)
}

/// Read a training set from any reader; `source_name` is only used in errors.
pub fn read_training_csv_from<R: Read>(reader: R, source_name: &str) -> Result<LabeledData, ReadError> {
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    read_records(rdr, source_name.to_string())
}

fn read_records<R: Read>(mut rdr: csv::Reader<R>, source_name: String) -> Result<LabeledData, ReadError> {
    let csv_err = |source: csv::Error| ReadError::Csv {
        source_name: source_name.clone(),
        source,
    };

    let headers = rdr.headers().map_err(csv_err)?.clone();
    if headers.len() < 2 {
        return Err(ReadError::TooFewColumns {
            source_name: source_name.clone(),
            found: headers.len(),
        });
    }
    let n_features = headers.len() - 1;
    let feature_names: Vec<String> = headers.iter().take(n_features).map(str::to_string).collect();
    let label_column = headers[n_features].to_string();

    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        let (row, label) = parse_record(&record, &headers, &source_name)?;
        rows.push(row);
        labels.push(label);
    }

    debug!(
        "Loaded {} samples with {} features from {}",
        rows.len(),
        n_features,
        source_name
    );

    let invalid = |source: ClassifierError| ReadError::Invalid {
        source_name: source_name.clone(),
        source,
    };
    let x = features_from_rows(&rows).map_err(invalid)?;
    let training_set = TrainingSet::new(x, labels).map_err(invalid)?;

    Ok(LabeledData {
        feature_names,
        label_column,
        training_set,
    })
}

fn parse_record(
    record: &StringRecord,
    headers: &StringRecord,
    source_name: &str,
) -> Result<(Vec<f64>, Label), ReadError> {
    let line = record.position().map_or(0, |p| p.line());
    let parse_error = |col: usize, value: &str, expected: &'static str| ReadError::Parse {
        source_name: source_name.to_string(),
        line,
        column: headers.get(col).unwrap_or_default().to_string(),
        value: value.to_string(),
        expected,
    };

    let label_idx = record.len() - 1;
    let mut row = Vec::with_capacity(label_idx);
    for (col, value) in record.iter().take(label_idx).enumerate() {
        let v = value
            .parse::<f64>()
            .map_err(|_| parse_error(col, value, "a number"))?;
        row.push(v);
    }

    let raw_label = &record[label_idx];
    let label = match raw_label.parse::<f64>() {
        Ok(v) if v == 0.0 => 0,
        Ok(v) if v == 1.0 => 1,
        _ => return Err(parse_error(label_idx, raw_label, "a 0/1 class label")),
    };
    Ok((row, label))
}
