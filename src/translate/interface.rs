use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::inference_service::InferenceError;

/// A single translation job: `text` in `source_lang`, generation forced to `target_lang`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}

/// Translation model collaborator
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate the request text and return the top decoded candidate.
    async fn translate(&self, request: TranslateRequest) -> Result<TranslateResponse, InferenceError>;

    async fn health_check(&self) -> bool {
        true
    }

    /// Base URL of the inference service backing this collaborator, if any.
    fn endpoint(&self) -> Option<&str> {
        None
    }

    fn name(&self) -> &str;
}
