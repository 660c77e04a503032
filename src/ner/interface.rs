//! Entity recognition interface - the pipeline itself runs on the inference service

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::inference_service::InferenceError;

/// A span of input text classified into a category such as `PERSON` or `ORG`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Entity-recognition collaborator
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Detect entities in `text`, in the order the pipeline found them.
    ///
    /// Duplicates are kept; an empty vector is a valid result.
    async fn recognize(&self, text: &str) -> Result<Vec<Entity>, InferenceError>;

    async fn health_check(&self) -> bool {
        true
    }

    /// Base URL of the inference service backing this collaborator, if any.
    fn endpoint(&self) -> Option<&str> {
        None
    }

    fn name(&self) -> &str;
}
