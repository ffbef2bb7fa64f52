use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use sprs::{CsMat, CsVec};
use tracing::{debug, info};

use super::{
    count_vectorizer::CountVectorizer,
    params::{Norm, VectorizerParams},
};
use crate::PreProcessingError;

/// On-disk form of a fitted [`TfidfVectorizer`].
///
/// Mirrors the state of a fitted scikit-learn `TfidfVectorizer`: the
/// `vocabulary_` mapping, the `idf_` weights and the analyzer settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TfidfArtifact {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default)]
    pub params: VectorizerParams,
}

/// A fitted, read-only TF-IDF transform.
#[derive(Clone, Debug)]
pub struct TfidfVectorizer {
    count_vectorizer: CountVectorizer,
    idf: Vec<f64>,
}

impl TryFrom<TfidfArtifact> for TfidfVectorizer {
    type Error = PreProcessingError;

    fn try_from(artifact: TfidfArtifact) -> Result<Self, Self::Error> {
        let TfidfArtifact {
            vocabulary,
            idf,
            params,
        } = artifact;

        if idf.len() != vocabulary.len() {
            return Err(PreProcessingError::IdfLengthMismatch {
                idf: idf.len(),
                vocabulary: vocabulary.len(),
            });
        }
        if let Some(index) = idf.iter().position(|weight| !weight.is_finite()) {
            return Err(PreProcessingError::NonFiniteIdf { index });
        }

        let count_vectorizer =
            CountVectorizer::from_vocabulary(vocabulary.into_iter().collect(), params)?;
        Ok(Self {
            count_vectorizer,
            idf,
        })
    }
}

impl TfidfVectorizer {
    pub fn from_json(json: &str) -> Result<Self, PreProcessingError> {
        let artifact: TfidfArtifact = serde_json::from_str(json)?;
        artifact.try_into()
    }

    /// Decode a bincode-encoded [`TfidfArtifact`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PreProcessingError> {
        let (artifact, _): (TfidfArtifact, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        artifact.try_into()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, PreProcessingError> {
        Ok(bincode::serde::encode_to_vec(
            self.to_artifact(),
            bincode::config::standard(),
        )?)
    }

    /// Load an artifact from disk. `.json` files are parsed as JSON, anything
    /// else is treated as bincode.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PreProcessingError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| PreProcessingError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let vectorizer = if is_json {
            let artifact: TfidfArtifact = serde_json::from_slice(&bytes)?;
            Self::try_from(artifact)?
        } else {
            Self::from_bytes(&bytes)?
        };

        info!(
            path = %path.display(),
            num_features = vectorizer.num_features(),
            "Loaded TF-IDF vectorizer"
        );
        Ok(vectorizer)
    }

    #[must_use]
    pub fn to_artifact(&self) -> TfidfArtifact {
        TfidfArtifact {
            vocabulary: self
                .count_vectorizer
                .vocabulary()
                .iter()
                .map(|(term, &idx)| (term.clone(), idx))
                .collect(),
            idf: self.idf.clone(),
            params: self.count_vectorizer.params().clone(),
        }
    }

    /// TF-IDF features for every text, one CSR row per text.
    pub fn transform<T: AsRef<str> + Sync>(&self, texts: &[T]) -> CsMat<f64> {
        debug!(
            num_texts = texts.len(),
            "Transforming texts using TfidfVectorizer"
        );
        let mut tf_matrix = self.count_vectorizer.transform(texts);
        let params = self.count_vectorizer.params();

        for mut row_vec in tf_matrix.outer_iterator_mut() {
            for (col_idx, val) in row_vec.iter_mut() {
                if params.sublinear_tf() {
                    *val = 1.0 + val.ln();
                }
                *val *= self.idf[col_idx];
            }

            let norm = match params.norm() {
                Some(Norm::L2) => row_vec.iter().map(|(_, &v)| v * v).sum::<f64>().sqrt(),
                Some(Norm::L1) => row_vec.iter().map(|(_, &v)| v.abs()).sum::<f64>(),
                None => continue,
            };
            if norm > 0.0 {
                for (_, val) in row_vec.iter_mut() {
                    *val /= norm;
                }
            }
        }
        tf_matrix
    }

    /// TF-IDF features for a single text.
    pub fn transform_one(&self, text: &str) -> CsVec<f64> {
        self.transform(&[text])
            .outer_view(0)
            .map_or_else(|| CsVec::empty(self.num_features()), |row| row.to_owned())
    }

    pub fn num_features(&self) -> usize {
        self.count_vectorizer.num_features()
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn vocabulary(&self) -> &ahash::AHashMap<String, usize> {
        self.count_vectorizer.vocabulary()
    }

    pub fn params(&self) -> &VectorizerParams {
        self.count_vectorizer.params()
    }
}
