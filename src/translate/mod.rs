pub mod client;
pub mod interface;
pub mod languages;
pub mod mock;

pub use client::RemoteTranslator;
pub use interface::{TranslateRequest, TranslateResponse, Translator};
pub use mock::MockTranslator;
