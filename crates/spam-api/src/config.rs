use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use clap::{Parser, ValueEnum};
use spam_inference::DEFAULT_THRESHOLD;

/// When the model and vectorizer are read from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArtifactLoading {
    /// Load once at startup and share across requests
    Startup,
    /// Reload both artifacts for every scoring request
    PerRequest,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "spam-api")]
#[command(about = "Serve spam/ham predictions over HTTP", long_about = None)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "SPAM_API_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "SPAM_API_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Fitted classifier artifact (JSON)
    #[arg(
        long,
        env = "SPAM_MODEL_PATH",
        value_name = "PATH",
        default_value = "model_artifacts/spam_classifier.json"
    )]
    pub model_path: PathBuf,

    /// Fitted TF-IDF vectorizer artifact (JSON or bincode)
    #[arg(
        long,
        env = "SPAM_VECTORIZER_PATH",
        value_name = "PATH",
        default_value = "model_artifacts/tfidf_vectorizer.json"
    )]
    pub vectorizer_path: PathBuf,

    /// When to read the artifacts from disk
    #[arg(
        long,
        env = "SPAM_ARTIFACT_LOADING",
        value_enum,
        default_value_t = ArtifactLoading::Startup
    )]
    pub artifact_loading: ArtifactLoading,

    /// Threshold applied when a request does not send one
    #[arg(long, env = "SPAM_DEFAULT_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
    pub default_threshold: f64,
}

impl Config {
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}
