pub mod client;
pub mod http;
pub mod memory;
pub mod store;

pub use client::{BackendClient, Services};
pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use store::{MessageStore, PresenceSource, ProfileStore};
