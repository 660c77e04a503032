pub mod client;
pub mod interface;
pub mod mock;

pub use client::RemoteEntityRecognizer;
pub use interface::{Entity, EntityRecognizer};
pub use mock::MockEntityRecognizer;
