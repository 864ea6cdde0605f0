// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod ndjson;
pub mod observability;
pub mod render;
pub mod types;

// Re-exports
pub use client::{ChunkStream, ClientCache, CompletionProvider, Ollama};
pub use error::{Error, Result};
pub use render::{PlainTextRenderer, Renderer};
pub use types::*;
