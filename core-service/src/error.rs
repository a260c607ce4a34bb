//! Error handling
//!
//! Every failure in the pipeline is fatal for the run, so there is a single
//! error enum and callers propagate it with `?`.

use std::path::PathBuf;

use thiserror::Error;

use crate::logic::features::layout::LayoutMismatchError;
use crate::logic::model::InferenceError;

pub type GrcResult<T> = Result<T, GrcError>;

#[derive(Debug, Error)]
pub enum GrcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required columns in {source_name}: expected {expected:?}, found {found:?}")]
    MissingColumns {
        source_name: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Feature width mismatch at row {row}: classifier expects {expected}, got {found}")]
    FeatureWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Vocabulary mismatch: vectorizer has {expected} terms, input has {found} lexical columns")]
    VocabularyMismatch { expected: usize, found: usize },

    #[error("Lexical column {position} is headed {found:?}, expected {expected:?} or \"{position}\"")]
    LexicalColumnMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Invalid value in column '{column}' at row {row}: {value:?}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("{0}")]
    Inference(#[from] InferenceError),

    #[error("Classifier returned invalid score {score} for row {row}")]
    InvalidScore { row: usize, score: f64 },

    #[error("{0}")]
    LayoutMismatch(#[from] LayoutMismatchError),

    #[error("Checksum mismatch for {path:?}: expected {expected}, computed {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Invalid vectorizer artifact: {0}")]
    InvalidVectorizer(String),

    #[error("Invalid model artifact: {0}")]
    InvalidModel(String),

    #[error("Invalid control policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid register row {row}: {reason}")]
    InvalidRegister { row: usize, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
