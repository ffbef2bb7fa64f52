use serde::{Deserialize, Serialize};
use sprs::CsVecView;

use super::{check_dimension, check_finite, ProbabilisticClassifier};
use crate::InferenceError;

/// Multinomial naive Bayes over term weights.
///
/// Probabilities come from the joint log-likelihood
/// `class_log_prior[c] + x . feature_log_prob[c]`, normalised with log-sum-exp.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultinomialNb {
    classes: [String; 2],
    class_log_prior: [f64; 2],
    feature_log_prob: [Vec<f64>; 2],
}

impl MultinomialNb {
    pub fn new(
        classes: [String; 2],
        class_log_prior: [f64; 2],
        feature_log_prob: [Vec<f64>; 2],
    ) -> Result<Self, InferenceError> {
        let model = Self {
            classes,
            class_log_prior,
            feature_log_prob,
        };
        model.validate()?;
        Ok(model)
    }

    pub(super) fn validate(&self) -> Result<(), InferenceError> {
        let [negative, positive] = &self.feature_log_prob;
        if negative.is_empty() || negative.len() != positive.len() {
            return Err(InferenceError::InvalidModel(format!(
                "feature_log_prob rows must be non-empty and equal length, got {} and {}",
                negative.len(),
                positive.len()
            )));
        }
        check_finite("class_log_prior", &self.class_log_prior)?;
        check_finite("feature_log_prob[0]", negative)?;
        check_finite("feature_log_prob[1]", positive)
    }

    fn joint_log_likelihood(&self, features: &CsVecView<'_, f64>) -> [f64; 2] {
        let mut jll = self.class_log_prior;
        for (class, log_probs) in self.feature_log_prob.iter().enumerate() {
            jll[class] += features
                .iter()
                .map(|(idx, &value)| log_probs[idx] * value)
                .sum::<f64>();
        }
        jll
    }
}

impl ProbabilisticClassifier for MultinomialNb {
    fn num_features(&self) -> usize {
        self.feature_log_prob[0].len()
    }

    fn classes(&self) -> &[String; 2] {
        &self.classes
    }

    fn predict_proba(&self, features: CsVecView<'_, f64>) -> Result<[f64; 2], InferenceError> {
        check_dimension(self.num_features(), &features)?;
        let [negative, positive] = self.joint_log_likelihood(&features);

        let max = negative.max(positive);
        let log_norm = max + ((negative - max).exp() + (positive - max).exp()).ln();
        Ok([(negative - log_norm).exp(), (positive - log_norm).exp()])
    }
}
