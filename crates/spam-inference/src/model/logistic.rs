use serde::{Deserialize, Serialize};
use sprs::CsVecView;

use super::{check_dimension, check_finite, ProbabilisticClassifier};
use crate::InferenceError;

/// Binary logistic regression: `P(positive) = sigmoid(intercept + coef . x)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogisticRegression {
    classes: [String; 2],
    coef: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(classes: [String; 2], coef: Vec<f64>, intercept: f64) -> Result<Self, InferenceError> {
        let model = Self {
            classes,
            coef,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    pub(super) fn validate(&self) -> Result<(), InferenceError> {
        if self.coef.is_empty() {
            return Err(InferenceError::InvalidModel("coef is empty".to_owned()));
        }
        check_finite("coef", &self.coef)?;
        check_finite("intercept", &[self.intercept])
    }

    /// Signed distance from the decision boundary (the logit).
    pub fn decision_function(&self, features: CsVecView<'_, f64>) -> Result<f64, InferenceError> {
        check_dimension(self.coef.len(), &features)?;
        let dot: f64 = features
            .iter()
            .map(|(idx, &value)| self.coef[idx] * value)
            .sum();
        Ok(self.intercept + dot)
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn num_features(&self) -> usize {
        self.coef.len()
    }

    fn classes(&self) -> &[String; 2] {
        &self.classes
    }

    fn predict_proba(&self, features: CsVecView<'_, f64>) -> Result<[f64; 2], InferenceError> {
        let positive = sigmoid(self.decision_function(features)?);
        Ok([1.0 - positive, positive])
    }
}

/// Logistic function, arranged so `exp` never overflows.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
