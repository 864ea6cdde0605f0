//! Domain and wire types for the banter library.

mod chat;
mod feedback;
mod message;
mod model;

pub use chat::{ChatChunk, ChatOptions, ChatRequest, ChunkMessage, PromptMessage, PromptRole};
pub use feedback::Feedback;
pub use message::{Message, Role};
pub use model::{KnownModel, Model, ModelInfo};
