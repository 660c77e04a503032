use async_trait::async_trait;

use super::interface::{TranslateRequest, TranslateResponse, Translator};
use super::languages;
use crate::inference_service::InferenceError;

/// In-process translator for development without a model server.
///
/// Rejects language codes the real model would not know and otherwise tags the
/// input with the target language, so responses stay deterministic.
#[derive(Debug, Default)]
pub struct MockTranslator;

impl MockTranslator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, request: TranslateRequest) -> Result<TranslateResponse, InferenceError> {
        for code in [&request.source_lang, &request.target_lang] {
            if !languages::is_supported(code) {
                return Err(InferenceError::UnsupportedLanguage(code.clone()));
            }
        }

        Ok(TranslateResponse {
            translated_text: format!("[{}] {}", request.target_lang, request.text),
        })
    }

    fn name(&self) -> &str {
        "mock-translator"
    }
}
