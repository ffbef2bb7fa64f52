//! # spam-inference
//!
//! Classifies text as spam or ham with a fitted TF-IDF vectorizer and a
//! fitted probabilistic classifier, both loaded from artifact files.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spam_inference::{Scorer, DEFAULT_THRESHOLD};
//!
//! let scorer = Scorer::from_paths(
//!     "model_artifacts/spam_classifier.json",
//!     "model_artifacts/tfidf_vectorizer.json",
//! )?;
//!
//! let prediction = scorer.score("Claim your free prize today!", DEFAULT_THRESHOLD)?;
//! println!("{} with P(spam) = {:.3}", prediction.label(), prediction.propensity());
//! # Ok::<(), spam_inference::InferenceError>(())
//! ```
//!
//! The free function [`score`] takes the model and vectorizer explicitly for
//! callers that manage the handles themselves.

mod error;
pub mod model;
mod pipeline;

use std::{path::Path, sync::Arc};

use rayon::prelude::*;
use spam_pre_processing::pre_processor::{preprocess, should_use_parallel, TfidfVectorizer};
use tracing::{debug, info};

pub use error::InferenceError;
pub use model::{ProbabilisticClassifier, DEFAULT_THRESHOLD};
pub use pipeline::{score, Label, Prediction};

use crate::model::POSITIVE_CLASS_INDEX;

/// Read-only scoring handles: a vectorizer and a classifier that agree on the
/// feature space.
///
/// Cloning is cheap; clones share the same artifacts.
#[derive(Clone, Debug)]
pub struct Scorer {
    vectorizer: Arc<TfidfVectorizer>,
    model: Arc<dyn ProbabilisticClassifier>,
}

impl Scorer {
    /// Pair a vectorizer with a model, failing if their dimensions differ.
    pub fn new(
        vectorizer: Arc<TfidfVectorizer>,
        model: Arc<dyn ProbabilisticClassifier>,
    ) -> Result<Self, InferenceError> {
        if vectorizer.num_features() != model.num_features() {
            return Err(InferenceError::DimensionMismatch {
                expected: model.num_features(),
                actual: vectorizer.num_features(),
            });
        }
        Ok(Self { vectorizer, model })
    }

    /// Load both artifacts from disk.
    pub fn from_paths(
        model_path: impl AsRef<Path>,
        vectorizer_path: impl AsRef<Path>,
    ) -> Result<Self, InferenceError> {
        let vectorizer = TfidfVectorizer::from_path(vectorizer_path)?;
        let model = model::load_classifier(model_path)?;
        let scorer = Self::new(Arc::new(vectorizer), model)?;
        info!(
            num_features = scorer.vectorizer.num_features(),
            "Scorer ready"
        );
        Ok(scorer)
    }

    pub fn score<T: AsRef<str>>(&self, text: T, threshold: f64) -> Result<Prediction, InferenceError> {
        pipeline::score(text.as_ref(), self.model.as_ref(), threshold, &self.vectorizer)
    }

    /// Score many texts against one threshold. Results are in input order.
    pub fn score_batch<T: AsRef<str> + Sync>(
        &self,
        texts: &[T],
        threshold: f64,
    ) -> Result<Vec<Prediction>, InferenceError> {
        debug!(num_texts = texts.len(), threshold, "Scoring batch");
        let cleaned: Vec<String> = if should_use_parallel(texts) {
            texts.par_iter().map(|text| preprocess(text.as_ref())).collect()
        } else {
            texts.iter().map(|text| preprocess(text.as_ref())).collect()
        };

        let features = self.vectorizer.transform(&cleaned);
        features
            .outer_iterator()
            .map(|row| -> Result<Prediction, InferenceError> {
                let propensity = self.model.predict_proba(row)?[POSITIVE_CLASS_INDEX];
                Ok(Prediction::from_propensity(propensity, threshold))
            })
            .collect()
    }

    #[must_use]
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }
}
