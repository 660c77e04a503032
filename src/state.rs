use std::sync::Arc;

use crate::config::Config;
use crate::models::ModelHandles;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub models: ModelHandles,
}

impl AppState {
    pub fn new(config: Config, models: ModelHandles) -> Self {
        Self {
            config: Arc::new(config),
            models,
        }
    }
}
