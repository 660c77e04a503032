pub mod factory;

use std::sync::Arc;

use crate::ner::EntityRecognizer;
use crate::translate::Translator;

pub use factory::ModelFactory;

/// The two model collaborators, loaded once at startup and shared read-only.
#[derive(Clone)]
pub struct ModelHandles {
    pub translator: Arc<dyn Translator>,
    pub recognizer: Arc<dyn EntityRecognizer>,
}

impl ModelHandles {
    pub fn new(translator: Arc<dyn Translator>, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            translator,
            recognizer,
        }
    }

    /// Readiness of `(translator, recognizer)`.
    ///
    /// Collaborators served by the same inference service share one probe.
    pub async fn health(&self) -> (bool, bool) {
        match (self.translator.endpoint(), self.recognizer.endpoint()) {
            (Some(a), Some(b)) if a == b => {
                let ready = self.translator.health_check().await;
                (ready, ready)
            }
            _ => tokio::join!(
                self.translator.health_check(),
                self.recognizer.health_check()
            ),
        }
    }
}
