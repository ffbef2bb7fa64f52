use std::{fmt, fs, path::Path, sync::Arc};

use serde::{Deserialize, Serialize};
use sprs::CsVecView;
use tracing::info;

use crate::InferenceError;

mod logistic;
mod naive_bayes;
mod threshold;

pub use logistic::LogisticRegression;
pub use naive_bayes::MultinomialNb;
pub use threshold::DEFAULT_THRESHOLD;

/// Position of the positive ("spam") class in `classes()` and in the
/// probability pair returned by [`ProbabilisticClassifier::predict_proba`].
/// Fixed by the label ordering used at training time.
pub const POSITIVE_CLASS_INDEX: usize = 1;

/// A fitted binary classifier that produces class probabilities.
///
/// Implementations are immutable after loading and are shared across threads
/// without locking.
pub trait ProbabilisticClassifier: fmt::Debug + Send + Sync {
    /// Dimensionality of the feature vectors the model was fitted on.
    fn num_features(&self) -> usize;

    /// Class labels in probability order: `[negative, positive]`.
    fn classes(&self) -> &[String; 2];

    /// `[P(negative), P(positive)]` for one feature row.
    fn predict_proba(&self, features: CsVecView<'_, f64>) -> Result<[f64; 2], InferenceError>;
}

/// On-disk form of a fitted classifier, tagged by `kind`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LogisticRegression),
    MultinomialNb(MultinomialNb),
}

impl ClassifierArtifact {
    pub fn into_classifier(self) -> Result<Arc<dyn ProbabilisticClassifier>, InferenceError> {
        match self {
            Self::LogisticRegression(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            }
            Self::MultinomialNb(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            }
        }
    }
}

pub fn classifier_from_json(json: &str) -> Result<Arc<dyn ProbabilisticClassifier>, InferenceError> {
    let artifact: ClassifierArtifact = serde_json::from_str(json)?;
    artifact.into_classifier()
}

/// Load a JSON classifier artifact from disk.
pub fn load_classifier(
    path: impl AsRef<Path>,
) -> Result<Arc<dyn ProbabilisticClassifier>, InferenceError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| InferenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let model = classifier_from_json(&json)?;
    info!(
        path = %path.display(),
        num_features = model.num_features(),
        classes = ?model.classes(),
        "Loaded classifier"
    );
    Ok(model)
}

fn check_dimension(expected: usize, features: &CsVecView<'_, f64>) -> Result<(), InferenceError> {
    if features.dim() == expected {
        Ok(())
    } else {
        Err(InferenceError::DimensionMismatch {
            expected,
            actual: features.dim(),
        })
    }
}

fn check_finite(name: &str, values: &[f64]) -> Result<(), InferenceError> {
    match values.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(InferenceError::InvalidModel(format!(
            "{name}[{index}] is not finite"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_logistic_artifact_from_json() {
        let model = classifier_from_json(
            r#"{"kind": "logistic_regression", "classes": ["ham", "spam"], "coef": [1.0, -1.0], "intercept": 0.0}"#,
        )
        .unwrap();
        assert_eq!(model.num_features(), 2);
        assert_eq!(model.classes(), &["ham".to_owned(), "spam".to_owned()]);
    }

    #[test]
    fn test_naive_bayes_artifact_from_json() {
        let model = classifier_from_json(
            r#"{
                "kind": "multinomial_nb",
                "classes": ["ham", "spam"],
                "class_log_prior": [-0.2, -1.7],
                "feature_log_prob": [[-0.5, -1.0, -2.0], [-2.0, -1.0, -0.5]]
            }"#,
        )
        .unwrap();
        assert_eq!(model.num_features(), 3);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = classifier_from_json(r#"{"kind": "random_forest", "classes": ["ham", "spam"]}"#)
            .unwrap_err();
        assert!(matches!(err, InferenceError::Json(_)));
    }

    #[test]
    fn test_wrong_class_count_is_rejected() {
        let err = classifier_from_json(
            r#"{"kind": "logistic_regression", "classes": ["ham", "spam", "eggs"], "coef": [1.0], "intercept": 0.0}"#,
        )
        .unwrap_err();
        assert!(matches!(err, InferenceError::Json(_)));
    }

    #[test]
    fn test_load_classifier_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(
            &path,
            r#"{"kind": "logistic_regression", "classes": ["ham", "spam"], "coef": [0.5], "intercept": -0.5}"#,
        )
        .unwrap();
        assert_eq!(load_classifier(&path).unwrap().num_features(), 1);
    }

    #[test]
    fn test_missing_classifier_file() {
        let err = load_classifier("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, InferenceError::Io { .. }));
    }
}
