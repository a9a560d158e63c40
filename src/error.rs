use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the training data.
#[derive(Error, Debug)]
pub enum DataError {
    /// The dataset file could not be opened.
    #[error("failed to open dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed, including fields that do not parse as numbers.
    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    /// A row does not have exactly four measurements and a label.
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A row parsed but holds a value outside the data model.
    #[error("line {line}: {reason}")]
    Invalid { line: u64, reason: String },
}

/// Errors raised while declaring, fitting or applying a pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("the feature concatenation selects no columns")]
    NoFeatures,

    #[error("feature column `{0}` is selected more than once")]
    DuplicateFeature(&'static str),

    #[error("invalid trainer option: {0}")]
    InvalidOption(String),

    #[error("cannot fit a pipeline on an empty dataset")]
    EmptyDataset,

    #[error("row {0} has no label")]
    MissingLabel(usize),

    #[error("label `{0}` was not seen during training")]
    UnknownLabel(String),

    #[error("the classifier produced key {0}, which has no label")]
    UnknownKey(usize),

    #[error("the classifier produced no scores")]
    NoScores,

    #[error("cannot predict an invalid sample: {0}")]
    InvalidSample(String),

    #[error("the classifier produced a non-finite score for key {0}")]
    NonFiniteScore(usize),

    #[error("trainer failed: {0}")]
    Training(#[from] linfa_logistic::error::Error),
}

/// Errors raised by the interactive prediction loop.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("prediction failed: {0}")]
    Prediction(#[from] PipelineError),

    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
