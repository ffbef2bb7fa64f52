mod count_vectorizer;
mod ngrams;
mod params;
mod tfidf_vectorizer;
mod tokenizer;

pub use params::{Norm, VectorizerParams, DEFAULT_TOKEN_PATTERN};
pub use tfidf_vectorizer::{TfidfArtifact, TfidfVectorizer};
pub use tokenizer::should_use_parallel;
