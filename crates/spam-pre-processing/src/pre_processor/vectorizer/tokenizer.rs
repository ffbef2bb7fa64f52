use rayon::prelude::*;
use regex::Regex;
use tracing::debug;

use super::params::VectorizerParams;
use crate::PreProcessingError;

/// Minimum number of texts to consider parallelization
const MIN_TEXTS_FOR_PARALLEL: usize = 100;

/// Minimum total character count to consider parallelization
const MIN_CHARS_FOR_PARALLEL: usize = 10_000;

/// Splits documents into the unigram tokens the vocabulary was built from.
#[derive(Clone, Debug)]
pub struct Analyzer {
    pattern: Regex,
    lowercase: bool,
}

impl Analyzer {
    pub fn new(params: &VectorizerParams) -> Result<Self, PreProcessingError> {
        let pattern = Regex::new(params.token_pattern()).map_err(|source| {
            PreProcessingError::InvalidTokenPattern {
                pattern: params.token_pattern().to_owned(),
                source,
            }
        })?;
        Ok(Self {
            pattern,
            lowercase: params.lowercase(),
        })
    }

    pub fn tokens(&self, text: &str) -> Vec<String> {
        if self.lowercase {
            let lowered = text.to_lowercase();
            self.find_tokens(&lowered)
        } else {
            self.find_tokens(text)
        }
    }

    fn find_tokens(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|token| token.as_str().to_owned())
            .collect()
    }
}

/// Determine if parallel processing should be used based on workload characteristics.
///
/// Parallelization is beneficial when:
/// - There are many texts (>= 100), OR
/// - The total character count is large (>= 10,000 chars)
#[inline]
pub fn should_use_parallel<T: AsRef<str>>(texts: &[T]) -> bool {
    let num_texts = texts.len();

    if num_texts >= MIN_TEXTS_FOR_PARALLEL {
        return true;
    }

    // Estimate from the first 20 texts rather than walking all of them
    let total_chars: usize = if num_texts > 20 {
        let sample_chars: usize = texts.iter().take(20).map(|s| s.as_ref().len()).sum();
        (sample_chars * num_texts) / 20
    } else {
        texts.iter().map(|s| s.as_ref().len()).sum()
    };

    total_chars >= MIN_CHARS_FOR_PARALLEL
}

pub fn tokenize<T: AsRef<str> + Sync>(analyzer: &Analyzer, texts: &[T]) -> Vec<Vec<String>> {
    if should_use_parallel(texts) {
        debug!(num_texts = texts.len(), "Using parallel tokenization");
        texts
            .par_iter()
            .map(|text| analyzer.tokens(text.as_ref()))
            .collect()
    } else {
        debug!(num_texts = texts.len(), "Using sequential tokenization");
        texts
            .iter()
            .map(|text| analyzer.tokens(text.as_ref()))
            .collect()
    }
}
