use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use spam_inference::Label;
use tower_http::trace::TraceLayer;

use crate::{ApiError, AppState};

pub const HEALTH_STATUS: &str = "API is up and running!";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Body of `POST /score`. Both fields are optional: a missing text scores as
/// the empty string, a missing threshold falls back to the configured default.
#[derive(Debug, Default, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub threshold: Option<ThresholdValue>,
}

/// Thresholds may arrive as JSON numbers or as numeric strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ThresholdValue {
    Number(f64),
    Text(String),
}

impl ThresholdValue {
    fn resolve(self) -> Result<f64, ApiError> {
        match self {
            Self::Number(value) => Ok(value),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| ApiError::InvalidThreshold(text)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub prediction: Label,
    pub propensity: f64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/score", post(score))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTH_STATUS,
    })
}

async fn score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let threshold = request
        .threshold
        .map(ThresholdValue::resolve)
        .transpose()?
        .unwrap_or_else(|| state.default_threshold());
    let text = request.text.unwrap_or_default();

    let scorer = state.scorer().await?;
    let prediction = scorer.score(&text, threshold).map_err(ApiError::Scoring)?;

    Ok(Json(ScoreResponse {
        prediction: prediction.label(),
        propensity: prediction.propensity(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use spam_inference::{Scorer, DEFAULT_THRESHOLD};
    use tower::ServiceExt;

    use super::*;

    const MODEL_PATH: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../model_artifacts/spam_classifier.json"
    );
    const VECTORIZER_PATH: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../model_artifacts/tfidf_vectorizer.json"
    );

    fn app() -> Router {
        let scorer = Scorer::from_paths(MODEL_PATH, VECTORIZER_PATH).unwrap();
        router(AppState::preloaded(scorer, DEFAULT_THRESHOLD))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }

    fn post_score(body: impl Into<String>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/score")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.into()))
            .unwrap()
    }

    async fn prediction_for(app: Router, payload: Value) -> (StatusCode, Value) {
        send(app, post_score(payload.to_string())).await
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "API is up and running!" }));
    }

    #[tokio::test]
    async fn test_response_has_two_keys() {
        let (status, body) = prediction_for(app(), json!({ "text": "hello" })).await;
        assert_eq!(status, StatusCode::OK);

        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 2);
        let prediction = object["prediction"].as_str().unwrap();
        assert!(["spam", "ham"].contains(&prediction));
        assert!(object["propensity"].is_f64());
    }

    #[tokio::test]
    async fn test_obvious_spam() {
        for text in [
            "Congratulations! Claim your free prize today!!!",
            "You are a lucky winner of $500,000! Visit our site to collect!",
            "Alert: Suspicious activity detected. Verify your account immediately.",
        ] {
            let (_, body) = prediction_for(app(), json!({ "text": text })).await;
            assert_eq!(body["prediction"], "spam", "for {text:?}");
        }
    }

    #[tokio::test]
    async fn test_obvious_ham() {
        for text in [
            "Can we reschedule our lunch meeting to next week?",
            "Looking forward to catching up with you soon.",
            "Let me know if you need any help with the project.",
        ] {
            let (_, body) = prediction_for(app(), json!({ "text": text })).await;
            assert_eq!(body["prediction"], "ham", "for {text:?}");
        }
    }

    #[tokio::test]
    async fn test_missing_text_scores_as_empty() {
        let (status, body) = prediction_for(app(), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], "ham");
    }

    #[tokio::test]
    async fn test_threshold_extremes() {
        let text = "Can we reschedule our lunch meeting to next week?";
        let (_, body) = prediction_for(app(), json!({ "text": text, "threshold": 0 })).await;
        assert_eq!(body["prediction"], "spam");

        let text = "Congratulations! Claim your free prize today!!!";
        let (_, body) = prediction_for(app(), json!({ "text": text, "threshold": 1.5 })).await;
        assert_eq!(body["prediction"], "ham");
    }

    #[tokio::test]
    async fn test_numeric_string_threshold() {
        let (status, body) =
            prediction_for(app(), json!({ "text": "hello", "threshold": " 0.0 " })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], "spam");
    }

    #[tokio::test]
    async fn test_invalid_threshold_is_a_bad_request() {
        let (status, body) =
            prediction_for(app(), json!({ "text": "hello", "threshold": "high" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("high"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let (status, _) = send(app(), post_score("{\"text\": ")).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_per_request_loading() {
        let app = router(AppState::per_request(
            MODEL_PATH,
            VECTORIZER_PATH,
            DEFAULT_THRESHOLD,
        ));
        let (status, body) = prediction_for(
            app,
            json!({ "text": "Congratulations! Claim your free prize today!!!" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], "spam");
    }

    #[tokio::test]
    async fn test_per_request_loading_failure_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(AppState::per_request(
            dir.path().join("missing.json"),
            VECTORIZER_PATH,
            DEFAULT_THRESHOLD,
        ));
        let (status, body) = prediction_for(app, json!({ "text": "hello" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("failed to load scoring artifacts"));
    }

    #[test]
    fn test_threshold_value_parsing() {
        let request: ScoreRequest =
            serde_json::from_value(json!({ "text": "x", "threshold": "0.25" })).unwrap();
        assert_eq!(
            request.threshold,
            Some(ThresholdValue::Text("0.25".to_owned()))
        );
        assert!((request.threshold.unwrap().resolve().unwrap() - 0.25).abs() < f64::EPSILON);

        let request: ScoreRequest = serde_json::from_value(json!({ "threshold": null })).unwrap();
        assert_eq!(request.threshold, None);
        assert_eq!(request.text, None);
    }
}
