//! Chat application module for interactive conversations with a local
//! model runtime.
//!
//! This module provides a streaming REPL chat core built on top of the
//! banter client library. It supports:
//!
//! - Multiple named sessions with switching, renaming, and deletion
//! - Streaming responses with live progress reporting
//! - Slash commands for session and parameter control
//! - Plain-text export of the active conversation
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`store`]: the session store holding all conversations
//! - [`prompt`]: system directive synthesis and prompt assembly
//! - [`turn`]: the per-turn response streamer
//! - [`session`]: the orchestrator gluing store, prompt, and client
//! - [`commands`]: slash command parsing and handling
//! - [`export`]: plain-text transcript export

mod commands;
mod config;
mod export;
mod prompt;
mod session;
mod store;
mod turn;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, PRESETS, help_text, parse_command, preset};
pub use config::{ChatArgs, ChatConfig};
pub use export::{EXPORT_FILE_NAME, EXPORT_MIME_TYPE, export_plain_text, write_export};
pub use prompt::{Directive, Persona, ResponseLength, ResponseStyle, build_prompt};
pub use session::{ChatSession, GREETING, SessionOverview};
pub use store::{Session, SessionStore};
pub use turn::{FALLBACK_MESSAGE, TurnOutcome, TurnState, drive_turn, estimate_tokens};
