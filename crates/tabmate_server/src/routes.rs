use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use engine_logging::engine_info;
use serde::Deserialize;
use serde_json::{json, Value};
use tabmate_core::{apply, FetchResult, TabRecord};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{ApiError, AppState, ConfigError};

#[derive(Debug, Deserialize)]
pub struct CategorizeRequest {
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default, rename = "currentTabs")]
    pub current_tabs: Option<Vec<TabRecord>>,
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/categorize", post(categorize_handler))
        .route("/api/categorize", post(categorize_handler))
        .route("/update", post(update_handler))
        .route("/api/update", post(update_handler))
        .layer(cors)
        .with_state(state)
}

/// CORS for the browser front-end: `*` or one exact origin.
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = if allowed_origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        let value = HeaderValue::from_str(allowed_origin.trim()).map_err(|err| {
            ConfigError::Invalid(format!("server.allowed_origin {allowed_origin:?}: {err}"))
        })?;
        AllowOrigin::exact(value)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

async fn health_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn categorize_handler(
    State(state): State<AppState>,
    payload: Result<Json<CategorizeRequest>, JsonRejection>,
) -> Result<Json<Vec<FetchResult>>, ApiError> {
    let Json(request) = payload?;
    if request.urls.is_empty() {
        return Err(ApiError::Validation("urls must be a non-empty list".into()));
    }

    engine_info!("Categorize request with {} urls", request.urls.len());
    let pipeline = state.pipeline.clone();
    let max_workers = state.max_workers;
    let urls = request.urls;
    let results = tokio::task::spawn_blocking(move || pipeline.process(&urls, max_workers))
        .await
        .map_err(|err| ApiError::Internal(format!("categorize task failed: {err}")))?;

    Ok(Json(results))
}

async fn update_handler(
    State(state): State<AppState>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<Vec<TabRecord>>, ApiError> {
    let Json(request) = payload?;
    let command = request
        .command
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::Validation("command is required".into()))?;
    let tabs = request
        .current_tabs
        .filter(|tabs| !tabs.is_empty())
        .ok_or_else(|| ApiError::Validation("currentTabs must be a non-empty list".into()))?;

    let rule = state.translator.translate(&command).await?;
    let kept = apply(&tabs, &rule);
    engine_info!(
        "Command {:?} kept {} of {} tabs",
        command,
        kept.len(),
        tabs.len()
    );
    Ok(Json(kept))
}
