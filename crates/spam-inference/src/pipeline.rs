use core::fmt;

use serde::{Deserialize, Serialize};
use spam_pre_processing::pre_processor::{preprocess, TfidfVectorizer};
use tracing::debug;

use crate::{
    model::{ProbabilisticClassifier, POSITIVE_CLASS_INDEX},
    InferenceError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Ham,
    Spam,
}

impl Label {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ham => "ham",
            Self::Spam => "spam",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Label> for i64 {
    fn from(label: Label) -> Self {
        match label {
            Label::Ham => 0,
            Label::Spam => 1,
        }
    }
}

impl From<bool> for Label {
    fn from(is_spam: bool) -> Self {
        if is_spam {
            Self::Spam
        } else {
            Self::Ham
        }
    }
}

/// Outcome of scoring one text: the thresholded decision and the model's
/// positive-class probability it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    prediction: bool,
    propensity: f64,
}

impl Prediction {
    /// Apply the decision rule `propensity >= threshold`. A tie counts as spam.
    #[inline]
    #[must_use]
    pub fn from_propensity(propensity: f64, threshold: f64) -> Self {
        Self {
            prediction: propensity >= threshold,
            propensity,
        }
    }

    #[must_use]
    pub fn is_spam(&self) -> bool {
        self.prediction
    }

    /// P(spam) as reported by the model.
    #[must_use]
    pub fn propensity(&self) -> f64 {
        self.propensity
    }

    #[must_use]
    pub fn label(&self) -> Label {
        Label::from(self.prediction)
    }

    /// `[P(ham), P(spam)]`
    #[must_use]
    pub fn probabilities(&self) -> [f64; 2] {
        [1.0 - self.propensity, self.propensity]
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (P(spam)={:.3})", self.label(), self.propensity)
    }
}

/// Score one text: clean it, vectorize it, and threshold the model's spam
/// probability.
///
/// Neither `model` nor `vectorizer` is mutated, so both can be shared across
/// concurrent callers.
pub fn score(
    text: &str,
    model: &dyn ProbabilisticClassifier,
    threshold: f64,
    vectorizer: &TfidfVectorizer,
) -> Result<Prediction, InferenceError> {
    let cleaned = preprocess(text);
    let features = vectorizer.transform_one(&cleaned);
    let propensity = model.predict_proba(features.view())?[POSITIVE_CLASS_INDEX];
    let prediction = Prediction::from_propensity(propensity, threshold);

    debug!(
        input_chars = text.len(),
        active_features = features.nnz(),
        propensity,
        threshold,
        label = %prediction.label(),
        "Scored text"
    );
    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use spam_pre_processing::pre_processor::TfidfArtifact;

    use super::*;
    use crate::model::LogisticRegression;

    fn fixtures() -> (Arc<dyn ProbabilisticClassifier>, TfidfVectorizer) {
        let vectorizer = TfidfVectorizer::try_from(TfidfArtifact {
            vocabulary: [("free", 0), ("prize", 1), ("meeting", 2)]
                .into_iter()
                .map(|(term, idx)| (term.to_owned(), idx))
                .collect(),
            idf: vec![1.0, 1.0, 1.0],
            params: Default::default(),
        })
        .unwrap();
        let model = LogisticRegression::new(
            ["ham".to_owned(), "spam".to_owned()],
            vec![4.0, 4.0, -4.0],
            -1.0,
        )
        .unwrap();
        (Arc::new(model), vectorizer)
    }

    #[test]
    fn test_tie_counts_as_spam() {
        assert!(Prediction::from_propensity(0.5, 0.5).is_spam());
        assert!(!Prediction::from_propensity(0.499_999, 0.5).is_spam());
    }

    #[test]
    fn test_out_of_range_thresholds() {
        assert!(Prediction::from_propensity(0.0, 0.0).is_spam());
        assert!(Prediction::from_propensity(0.0, -3.0).is_spam());
        assert!(!Prediction::from_propensity(1.0, 1.5).is_spam());
        assert!(Prediction::from_propensity(1.0, 1.0).is_spam());
    }

    #[test]
    fn test_label_conversions() {
        assert_eq!(Label::from(true), Label::Spam);
        assert_eq!(i64::from(Label::Ham), 0);
        assert_eq!(Label::Spam.to_string(), "spam");
        assert_eq!(serde_json::to_string(&Label::Ham).unwrap(), r#""ham""#);
    }

    #[test]
    fn test_score_separates_spam_and_ham() {
        let (model, vectorizer) = fixtures();
        let spam = score("FREE prize!!!", model.as_ref(), 0.5, &vectorizer).unwrap();
        assert!(spam.is_spam());
        assert_eq!(spam.label(), Label::Spam);

        let ham = score("About the meeting.", model.as_ref(), 0.5, &vectorizer).unwrap();
        assert!(!ham.is_spam());
    }

    #[test]
    fn test_empty_text_scores_the_intercept() {
        let (model, vectorizer) = fixtures();
        let prediction = score("", model.as_ref(), 0.5, &vectorizer).unwrap();
        let expected = 1.0 / (1.0 + 1.0_f64.exp());
        assert!((prediction.propensity() - expected).abs() < 1e-12);
        assert!(!prediction.is_spam());
    }

    #[test]
    fn test_stopwords_do_not_reach_the_vectorizer() {
        let (model, vectorizer) = fixtures();
        let with_filler = score("Your free prize is here for you", model.as_ref(), 0.5, &vectorizer)
            .unwrap();
        let bare = score("free prize", model.as_ref(), 0.5, &vectorizer).unwrap();
        assert!((with_filler.propensity() - bare.propensity()).abs() < 1e-12);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let prediction = Prediction::from_propensity(0.3, 0.5);
        let [ham, spam] = prediction.probabilities();
        assert!((ham + spam - 1.0).abs() < 1e-12);
        assert_eq!(prediction.label(), Label::Ham);
    }
}
