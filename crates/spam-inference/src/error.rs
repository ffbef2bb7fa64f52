use std::path::PathBuf;

use spam_pre_processing::PreProcessingError;

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("failed to load vectorizer")]
    Vectorizer(#[from] PreProcessingError),

    #[error("failed to read classifier artifact {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse classifier artifact")]
    Json(#[from] serde_json::Error),

    #[error("invalid classifier artifact: {0}")]
    InvalidModel(String),

    #[error("feature dimension mismatch: model expects {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
