//! Pre-processing module for the spam scorer
//!
//! [`preprocess`] cleans raw text the way the model's training corpus was
//! cleaned; [`TfidfVectorizer`] turns that cleaned text into features.

mod text;
mod vectorizer;

pub use text::{is_punctuation, is_stopword, preprocess, word_tokenize, ENGLISH_STOPWORDS};
pub use vectorizer::{
    should_use_parallel, Norm, TfidfArtifact, TfidfVectorizer, VectorizerParams,
    DEFAULT_TOKEN_PATTERN,
};
