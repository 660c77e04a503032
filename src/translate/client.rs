use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use super::interface::{TranslateRequest, TranslateResponse, Translator};
use crate::inference_service::{GenerateRequest, InferenceError, InferenceServiceClient};

/// Translator backed by the model hosted on the inference service
pub struct RemoteTranslator {
    inference_service: Arc<InferenceServiceClient>,
    model: String,
}

impl RemoteTranslator {
    pub fn new(inference_service: Arc<InferenceServiceClient>, model: String) -> Self {
        Self {
            inference_service,
            model,
        }
    }
}

#[async_trait]
impl Translator for RemoteTranslator {
    async fn translate(&self, request: TranslateRequest) -> Result<TranslateResponse, InferenceError> {
        debug!(
            "Translating {} chars {} -> {} with {}",
            request.text.chars().count(),
            request.source_lang,
            request.target_lang,
            self.model
        );

        let generate = GenerateRequest {
            text: request.text,
            source_lang: request.source_lang,
            target_lang: request.target_lang,
            model: self.model.clone(),
        };

        let response = self
            .inference_service
            .generate_translation(&generate)
            .await
            .map_err(|e| {
                error!("Translation failed: {}", e);
                e
            })?;

        // Only the top beam is surfaced.
        let translated_text = response
            .generated
            .into_iter()
            .next()
            .ok_or(InferenceError::EmptyOutput)?;

        Ok(TranslateResponse { translated_text })
    }

    async fn health_check(&self) -> bool {
        self.inference_service.health_check().await.unwrap_or(false)
    }

    fn endpoint(&self) -> Option<&str> {
        Some(self.inference_service.base_url())
    }

    fn name(&self) -> &str {
        &self.model
    }
}
