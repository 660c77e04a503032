use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::ner::Entity;

/// Failure reported by a model collaborator.
///
/// The `Display` output is what ends up in the `error` field of a 500 response,
/// so service-provided messages are passed through untouched.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("Translation model returned no output")]
    EmptyOutput,

    #[error("Unsupported language code: {0}")]
    UnsupportedLanguage(String),
}

/// Deadline for the readiness probe only; model calls are never cut short.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct InferenceServiceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub generated: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntitiesRequest {
    pub text: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntitiesResponse {
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// Error envelope the inference service uses for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: Option<String>,
    detail: Option<String>,
}

impl InferenceServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn generate_translation(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, InferenceError> {
        self.post("/translation/generate", request).await
    }

    pub async fn extract_entities(
        &self,
        request: &EntitiesRequest,
    ) -> Result<EntitiesResponse, InferenceError> {
        self.post("/ner/entities", request).await
    }

    pub async fn health_check(&self) -> Result<bool, InferenceError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, InferenceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(service_error(status, &text));
        }

        Ok(response.json().await?)
    }
}

fn service_error(status: StatusCode, body: &str) -> InferenceError {
    let message = serde_json::from_str::<ServiceErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.detail))
        .unwrap_or_else(|| format!("inference service returned {}", status));

    InferenceError::Service {
        status: status.as_u16(),
        message,
    }
}
