use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PreProcessingError {
    #[error("invalid token pattern `{pattern}`")]
    InvalidTokenPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid ngram range ({0}, {1}): bounds must satisfy 1 <= min <= max")]
    InvalidNgramRange(usize, usize),

    #[error("idf has {idf} entries but the vocabulary has {vocabulary}")]
    IdfLengthMismatch { idf: usize, vocabulary: usize },

    #[error("idf weight for feature {index} is not finite")]
    NonFiniteIdf { index: usize },

    #[error("vocabulary term `{term}` maps to index {index}, expected indices 0..{len} with no gaps")]
    SparseVocabulary {
        term: String,
        index: usize,
        len: usize,
    },

    #[error("failed to read vectorizer artifact {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse vectorizer artifact as JSON")]
    Json(#[from] serde_json::Error),

    #[error("failed to decode vectorizer artifact")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("failed to encode vectorizer artifact")]
    Encode(#[from] bincode::error::EncodeError),
}
