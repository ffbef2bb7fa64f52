use std::path::PathBuf;

use spam_inference::{InferenceError, Scorer};
use tracing::{debug, info};

use crate::{
    config::{ArtifactLoading, Config},
    ApiError,
};

#[derive(Clone, Debug)]
enum ArtifactSource {
    Preloaded(Scorer),
    PerRequest {
        model_path: PathBuf,
        vectorizer_path: PathBuf,
    },
}

/// Shared handler state: where scorers come from and the fallback threshold.
#[derive(Clone, Debug)]
pub struct AppState {
    source: ArtifactSource,
    default_threshold: f64,
}

impl AppState {
    /// Serve every request from one already-loaded scorer.
    #[must_use]
    pub fn preloaded(scorer: Scorer, default_threshold: f64) -> Self {
        Self {
            source: ArtifactSource::Preloaded(scorer),
            default_threshold,
        }
    }

    /// Re-read both artifacts on every request.
    #[must_use]
    pub fn per_request(
        model_path: impl Into<PathBuf>,
        vectorizer_path: impl Into<PathBuf>,
        default_threshold: f64,
    ) -> Self {
        Self {
            source: ArtifactSource::PerRequest {
                model_path: model_path.into(),
                vectorizer_path: vectorizer_path.into(),
            },
            default_threshold,
        }
    }

    /// Build state from configuration. Artifacts are loaded (and validated)
    /// here in both modes so a broken deployment fails before it listens.
    pub fn from_config(config: &Config) -> Result<Self, InferenceError> {
        let scorer = Scorer::from_paths(&config.model_path, &config.vectorizer_path)?;
        Ok(match config.artifact_loading {
            ArtifactLoading::Startup => Self::preloaded(scorer, config.default_threshold),
            ArtifactLoading::PerRequest => {
                info!("Artifacts will be reloaded for every scoring request");
                Self::per_request(
                    &config.model_path,
                    &config.vectorizer_path,
                    config.default_threshold,
                )
            }
        })
    }

    #[must_use]
    pub fn default_threshold(&self) -> f64 {
        self.default_threshold
    }

    pub async fn scorer(&self) -> Result<Scorer, ApiError> {
        match &self.source {
            ArtifactSource::Preloaded(scorer) => Ok(scorer.clone()),
            ArtifactSource::PerRequest {
                model_path,
                vectorizer_path,
            } => {
                debug!("Reloading artifacts for request");
                let (model_path, vectorizer_path) = (model_path.clone(), vectorizer_path.clone());
                tokio::task::spawn_blocking(move || Scorer::from_paths(model_path, vectorizer_path))
                    .await?
                    .map_err(ApiError::Artifacts)
            }
        }
    }
}
