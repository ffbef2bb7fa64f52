use serde::{Deserialize, Serialize};

use crate::PreProcessingError;

/// Default `token_pattern`: runs of two or more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Row normalisation applied after idf weighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// Analyzer and weighting parameters the vectorizer was fitted with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerParams {
    /// Lowercase text before applying `token_pattern`.
    lowercase: bool,
    /// Regex whose matches are the unigram tokens.
    token_pattern: String,
    /// Inclusive range of word n-gram sizes.
    ngram_range: (usize, usize),
    /// Apply sublinear tf scaling: replace term frequency `tf` with `1 + ln(tf)`.
    /// This reduces the impact of terms that occur many times in a document.
    sublinear_tf: bool,
    /// `None` leaves rows unnormalised.
    norm: Option<Norm>,
}

impl VectorizerParams {
    pub fn new(
        lowercase: bool,
        token_pattern: impl Into<String>,
        ngram_range: (usize, usize),
        sublinear_tf: bool,
        norm: Option<Norm>,
    ) -> Result<Self, PreProcessingError> {
        let params = Self {
            lowercase,
            token_pattern: token_pattern.into(),
            ngram_range,
            sublinear_tf,
            norm,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks the invariants that `new` enforces. Deserialized params skip
    /// `new`, so loaders call this directly.
    pub fn validate(&self) -> Result<(), PreProcessingError> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(PreProcessingError::InvalidNgramRange(min_n, max_n));
        }
        Ok(())
    }

    #[must_use]
    pub fn lowercase(&self) -> bool {
        self.lowercase
    }

    #[must_use]
    pub fn token_pattern(&self) -> &str {
        &self.token_pattern
    }

    #[must_use]
    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    #[must_use]
    pub fn sublinear_tf(&self) -> bool {
        self.sublinear_tf
    }

    #[must_use]
    pub fn norm(&self) -> Option<Norm> {
        self.norm
    }
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            lowercase: true,
            token_pattern: DEFAULT_TOKEN_PATTERN.to_owned(),
            ngram_range: (1, 1),
            sublinear_tf: false,
            norm: Some(Norm::L2),
        }
    }
}
