pub mod config;
pub mod error;
pub mod handlers;
pub mod inference_service;
pub mod models;
pub mod ner;
pub mod routes;
pub mod state;
pub mod translate;

pub use config::Config;
pub use models::{ModelFactory, ModelHandles};
pub use state::AppState;
