use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ApiError;
use crate::ner::Entity;
use crate::state::AppState;
use crate::translate::{TranslateRequest, TranslateResponse};

pub const INDEX_MESSAGE: &str = "Combined Translation + NLP API is running";

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub entities: Vec<Entity>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub translator: bool,
    pub recognizer: bool,
}

pub async fn index() -> (StatusCode, Json<IndexResponse>) {
    (
        StatusCode::OK,
        Json(IndexResponse {
            message: INDEX_MESSAGE.to_string(),
        }),
    )
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (translator, recognizer) = state.models.health().await;

    let status = if translator && recognizer { "ok" } else { "degraded" };
    Json(HealthResponse {
        status: status.to_string(),
        backend: state.config.model_config.backend.as_str().to_string(),
        translator,
        recognizer,
    })
}

pub async fn translate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TranslateResponse>, ApiError> {
    let payload = parse_payload(&body)
        .filter(|map| !map.is_empty())
        .ok_or(ApiError::MissingPayload)?;
    let request = translate_request(&payload)?;

    debug!("Translate request {} -> {}", request.source_lang, request.target_lang);
    let response = state.models.translator.translate(request).await?;
    Ok(Json(response))
}

pub async fn analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let payload = parse_payload(&body).ok_or(ApiError::MissingPayload)?;
    let text = required_str(&payload, "cvText").ok_or(ApiError::MissingField)?;

    let entities = state.models.recognizer.recognize(&text).await?;
    debug!("Analyze request found {} entities", entities.len());
    Ok(Json(AnalysisResponse { entities }))
}

/// Body as a JSON object, or `None` when absent, malformed or not an object.
fn parse_payload(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice(body).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// A present, non-empty string field.
fn required_str(payload: &Map<String, Value>, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn translate_request(payload: &Map<String, Value>) -> Result<TranslateRequest, ApiError> {
    match (
        required_str(payload, "text"),
        required_str(payload, "source_lang"),
        required_str(payload, "target_lang"),
    ) {
        (Some(text), Some(source_lang), Some(target_lang)) => Ok(TranslateRequest {
            text,
            source_lang,
            target_lang,
        }),
        _ => Err(ApiError::MissingFields),
    }
}
