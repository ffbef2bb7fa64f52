use ahash::AHashMap as HashMap;
use sprs::CsMat;
use tracing::debug;

use super::{
    ngrams,
    params::VectorizerParams,
    tokenizer::{self, Analyzer},
};
use crate::PreProcessingError;

#[derive(Clone, Debug)]
pub struct CountVectorizer {
    params: VectorizerParams,
    analyzer: Analyzer,
    /// Vocabulary mapping n-gram text to feature index
    vocab: HashMap<String, usize>,
}

impl CountVectorizer {
    /// Build a count vectorizer over an already-fitted vocabulary.
    ///
    /// Feature indices must cover `0..vocabulary.len()` exactly once.
    pub fn from_vocabulary(
        vocab: HashMap<String, usize>,
        params: VectorizerParams,
    ) -> Result<Self, PreProcessingError> {
        params.validate()?;
        let analyzer = Analyzer::new(&params)?;

        let len = vocab.len();
        let mut seen = vec![false; len];
        for (term, &index) in &vocab {
            if index >= len || seen[index] {
                return Err(PreProcessingError::SparseVocabulary {
                    term: term.clone(),
                    index,
                    len,
                });
            }
            seen[index] = true;
        }

        debug!(vocab_size = len, "CountVectorizer loaded");
        Ok(Self {
            params,
            analyzer,
            vocab,
        })
    }

    /// Term counts for every text, one CSR row per text. Out-of-vocabulary
    /// n-grams are dropped.
    pub fn transform<T: AsRef<str> + Sync>(&self, texts: &[T]) -> CsMat<f64> {
        debug!(
            num_texts = texts.len(),
            "Transforming texts using CountVectorizer"
        );
        let tokenized_texts = tokenizer::tokenize(&self.analyzer, texts);

        let mut indptr = Vec::with_capacity(texts.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();

        indptr.push(0);
        for tokens in &tokenized_texts {
            let ngrams = ngrams::count_ngrams(tokens, self.params.ngram_range());
            let mut row_entries = ngrams
                .iter()
                .filter_map(|(ngram, &count)| {
                    self.vocab
                        .get(ngram)
                        .map(|&col_idx| (col_idx, count as f64))
                })
                .collect::<Vec<_>>();

            row_entries.sort_by_key(|(col_idx, _)| *col_idx);
            for (col_idx, count) in row_entries {
                indices.push(col_idx);
                data.push(count);
            }
            indptr.push(indices.len());
        }

        debug!(
            non_zero_entries = data.len(),
            "Text transformation complete"
        );
        CsMat::new((texts.len(), self.num_features()), indptr, indices, data)
    }

    pub fn num_features(&self) -> usize {
        self.vocab.len()
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocab
    }

    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }
}
