use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use super::ModelHandles;
use crate::config::{ModelBackend, ModelConfig};
use crate::inference_service::InferenceServiceClient;
use crate::ner::{EntityRecognizer, MockEntityRecognizer, RemoteEntityRecognizer};
use crate::translate::{MockTranslator, RemoteTranslator, Translator};

/// Factory for the translation and entity-recognition collaborators
pub struct ModelFactory;

impl ModelFactory {
    /// Build both model handles for the configured backend.
    ///
    /// For the remote backend the inference service is probed once; an unreachable
    /// service is logged but does not abort startup.
    pub async fn load(model_config: &ModelConfig) -> Result<ModelHandles> {
        match model_config.backend {
            ModelBackend::Remote => {
                if model_config.inference_url.trim().is_empty() {
                    anyhow::bail!("model_config.inference_url must be set for the remote backend");
                }

                let inference_service =
                    Arc::new(InferenceServiceClient::new(model_config.inference_url.as_str()));

                info!("Loading translation model: {}", model_config.translation_model);
                let translator = Self::create_translator(model_config, inference_service.clone());
                info!("Loading NER model: {}", model_config.ner_model);
                let recognizer = Self::create_recognizer(model_config, inference_service.clone());

                match inference_service.health_check().await {
                    Ok(true) => info!("Inference service ready at {}", inference_service.base_url()),
                    Ok(false) => warn!(
                        "Inference service at {} reported unhealthy",
                        inference_service.base_url()
                    ),
                    Err(e) => warn!(
                        "Inference service at {} not reachable yet: {}",
                        inference_service.base_url(),
                        e
                    ),
                }

                Ok(ModelHandles::new(translator, recognizer))
            }
            ModelBackend::Mock => {
                warn!("Using mock models; responses are not real translations or entities");
                Ok(ModelHandles::new(
                    Arc::new(MockTranslator::new()),
                    Arc::new(MockEntityRecognizer::new()),
                ))
            }
        }
    }

    pub fn create_translator(
        model_config: &ModelConfig,
        inference_service: Arc<InferenceServiceClient>,
    ) -> Arc<dyn Translator> {
        Arc::new(RemoteTranslator::new(
            inference_service,
            model_config.translation_model.clone(),
        ))
    }

    pub fn create_recognizer(
        model_config: &ModelConfig,
        inference_service: Arc<InferenceServiceClient>,
    ) -> Arc<dyn EntityRecognizer> {
        Arc::new(RemoteEntityRecognizer::new(
            inference_service,
            model_config.ner_model.clone(),
        ))
    }
}
