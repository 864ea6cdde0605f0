//! The chat orchestrator.
//!
//! This module glues the session store, prompt assembly, and streaming
//! client together, one turn at a time.

use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::chat::config::ChatConfig;
use crate::chat::export::{EXPORT_FILE_NAME, write_export};
use crate::chat::prompt::build_prompt;
use crate::chat::store::SessionStore;
use crate::chat::turn::{FALLBACK_MESSAGE, TurnOutcome, TurnState, drive_turn, estimate_tokens};
use crate::client::{ClientCache, CompletionProvider};
use crate::error::Result;
use crate::render::Renderer;
use crate::types::{ChatRequest, Feedback, Message, Model};

/// The assistant message that seeds every new session.
pub const GREETING: &str = "Hello! I'm your AI assistant.";

/// One row of the session sidebar listing.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOverview {
    /// The session id.
    pub id: u64,

    /// The session's display name.
    pub name: String,

    /// Number of messages in the session.
    pub message_count: usize,

    /// Whether this is the active session.
    pub active: bool,
}

/// A chat session manager over the local completion runtime.
///
/// Owns the session store, the configuration, and the cached client, and
/// drives one turn at a time: there is never more than one completion call
/// in flight.
pub struct ChatSession {
    store: SessionStore,
    config: ChatConfig,
    cache: ClientCache,
    last_response_time: f64,
}

impl ChatSession {
    /// Creates a new chat session manager with the given configuration.
    pub fn new(config: ChatConfig) -> Self {
        let mut store = SessionStore::new();
        seed_greeting(&mut store);
        Self {
            store,
            config,
            cache: ClientCache::new(),
            last_response_time: 0.0,
        }
    }

    /// Sends a user message and streams the response.
    ///
    /// This method:
    /// 1. Adds the timestamped user message to the active session
    /// 2. Assembles the prompt from the session's full history
    /// 3. Streams the response, reporting progress to the renderer
    /// 4. Appends exactly one assistant message: the full response on
    ///    success, the fixed fallback on a provider failure
    ///
    /// # Errors
    ///
    /// Returns an error only when the client cannot be constructed (a
    /// malformed endpoint); the history is left untouched in that case.
    /// Provider failures during the turn do not propagate: they surface
    /// through the renderer and produce the fallback assistant message.
    pub async fn send_streaming(
        &mut self,
        user_input: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        // Construct the client before touching history so a bad endpoint
        // leaves the session clean.
        let client = self.cache.get(
            self.config.model.id(),
            &self.config.base_url,
            self.config.temperature,
        )?;
        let client = client.clone();

        let active_id = self.store.active_id();
        self.store
            .append(active_id, Message::user(user_input).with_timestamp(now()))?;

        let system_text = self.config.system_directive();
        let prompt = build_prompt(&system_text, &self.store.active().messages);
        let request = ChatRequest::new(self.config.model.id(), prompt)
            .with_temperature(self.config.temperature);

        let outcome = match client.stream_chat(request).await {
            Ok(chunks) => drive_turn(chunks, renderer).await,
            Err(e) => {
                // The call itself failed; treat it like a turn that failed
                // before the first chunk.
                renderer.print_error(&e.to_string());
                TurnOutcome {
                    text: FALLBACK_MESSAGE.to_string(),
                    elapsed: std::time::Duration::ZERO,
                    est_tokens: estimate_tokens(FALLBACK_MESSAGE),
                    state: TurnState::Failed,
                }
            }
        };

        self.last_response_time = outcome.elapsed_seconds();
        self.store
            .append(active_id, Message::assistant(outcome.text).with_timestamp(now()))?;
        Ok(())
    }

    /// Creates a new session, seeds the greeting, and makes it active.
    pub fn new_session(&mut self) -> u64 {
        let id = self.store.create();
        seed_greeting(&mut self.store);
        id
    }

    /// Makes the given session active.
    pub fn switch_session(&mut self, id: u64) -> Result<()> {
        self.store.switch(id)
    }

    /// Renames a session.
    pub fn rename_session(&mut self, id: u64, name: impl Into<String>) -> Result<()> {
        self.store.rename(id, name)
    }

    /// Deletes a session; the store keeps the active pointer valid. A
    /// recreated default session gets the greeting like any other.
    pub fn delete_session(&mut self, id: u64) -> Result<()> {
        let was_last = self.store.len() == 1;
        self.store.delete(id)?;
        if was_last {
            seed_greeting(&mut self.store);
        }
        Ok(())
    }

    /// Records a rating against the active session.
    pub fn rate(&mut self, feedback: Feedback) {
        let active_id = self.store.active_id();
        self.store
            .rate(active_id, feedback)
            .expect("active id always names a live session");
    }

    /// Exports the active session's transcript as plain text.
    ///
    /// Writes to `path` when given, otherwise to [`EXPORT_FILE_NAME`] in
    /// the current directory. Returns the path written.
    pub fn export_active(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
        write_export(&self.store.active().messages, &path)?;
        Ok(path)
    }

    /// Lists every session for sidebar display.
    pub fn sessions_overview(&self) -> Vec<SessionOverview> {
        let active_id = self.store.active_id();
        self.store
            .iter()
            .map(|session| SessionOverview {
                id: session.id,
                name: session.name.clone(),
                message_count: session.messages.len(),
                active: session.id == active_id,
            })
            .collect()
    }

    /// Returns the session store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Returns the active configuration for mutation.
    pub fn config_mut(&mut self) -> &mut ChatConfig {
        &mut self.config
    }

    /// Changes the model used for responses.
    pub fn set_model(&mut self, model: Model) {
        self.config.model = model;
    }

    /// Elapsed seconds of the most recent turn.
    pub fn last_response_time(&self) -> f64 {
        self.last_response_time
    }
}

fn seed_greeting(store: &mut SessionStore) {
    let active_id = store.active_id();
    store
        .append(active_id, Message::assistant(GREETING).with_timestamp(now()))
        .expect("active id always names a live session");
}

fn now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}
