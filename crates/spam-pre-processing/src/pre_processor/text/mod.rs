//! Raw text to cleaned token string.

mod stopwords;
mod tokenizer;

pub use stopwords::{is_stopword, ENGLISH_STOPWORDS};
pub use tokenizer::word_tokenize;

/// Returns true if `token` is a single ASCII punctuation character.
#[must_use]
pub fn is_punctuation(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_punctuation())
}

fn is_alphanumeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}

fn keep_token(token: &str) -> bool {
    is_alphanumeric(token) && !is_stopword(token) && !is_punctuation(token)
}

/// Normalise raw text into the cleaned form the classifier was trained on.
///
/// The text is lowercased and word-tokenized; only tokens that are entirely
/// alphanumeric, not English stopwords and not punctuation survive. Survivors
/// keep their relative order and are joined by single spaces.
///
/// ```rust
/// use spam_pre_processing::pre_processor::preprocess;
///
/// assert_eq!(
///     preprocess("Congratulations! Claim your free prize today!!!"),
///     "congratulations claim free prize today"
/// );
/// assert_eq!(preprocess(""), "");
/// ```
#[must_use]
pub fn preprocess(text: &str) -> String {
    let lowered = text.to_lowercase();
    word_tokenize(&lowered)
        .into_iter()
        .filter(|token| keep_token(token))
        .collect::<Vec<_>>()
        .join(" ")
}
