use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use super::interface::{Entity, EntityRecognizer};
use crate::inference_service::{EntitiesRequest, InferenceError, InferenceServiceClient};

/// Entity recognizer backed by the pipeline hosted on the inference service
pub struct RemoteEntityRecognizer {
    inference_service: Arc<InferenceServiceClient>,
    model: String,
}

impl RemoteEntityRecognizer {
    pub fn new(inference_service: Arc<InferenceServiceClient>, model: String) -> Self {
        Self {
            inference_service,
            model,
        }
    }
}

#[async_trait]
impl EntityRecognizer for RemoteEntityRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<Entity>, InferenceError> {
        debug!("Extracting entities from {} chars with {}", text.chars().count(), self.model);

        let request = EntitiesRequest {
            text: text.to_string(),
            model: self.model.clone(),
        };

        match self.inference_service.extract_entities(&request).await {
            Ok(response) => {
                debug!("Pipeline returned {} entities", response.entities.len());
                Ok(response.entities)
            }
            Err(e) => {
                error!("Entity extraction failed: {}", e);
                Err(e)
            }
        }
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
