//! # spam-api
//!
//! HTTP front end for the spam scorer.
//!
//! - `GET /health` reports liveness.
//! - `POST /score` takes `{"text": ..., "threshold": ...}` and answers
//!   `{"prediction": "spam" | "ham", "propensity": <P(spam)>}`.

pub mod config;
mod error;
pub mod routes;
mod state;
pub mod telemetry;

use anyhow::Context;
use tracing::info;

pub use config::{ArtifactLoading, Config};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;

/// Load artifacts, bind, and serve until Ctrl-C.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config).with_context(|| {
        format!(
            "Failed to load artifacts (model: {}, vectorizer: {})",
            config.model_path.display(),
            config.vectorizer_path.display()
        )
    })?;

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, loading = ?config.artifact_loading, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated unexpectedly")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
