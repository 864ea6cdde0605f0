//! The session store.
//!
//! This module holds every conversation and the active-session pointer.
//! It is an explicit object passed into every operation; there are no
//! ambient globals.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::types::{Feedback, Message};

/// An independent, named conversation thread.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Unique, monotonically assigned identifier.
    pub id: u64,

    /// User-editable display name. Blank and duplicate names are allowed.
    pub name: String,

    /// Ordered message history. Append-only; the single authoritative copy.
    pub messages: Vec<Message>,

    /// Response ratings recorded for this session, in memory only.
    pub feedback: Vec<Feedback>,
}

impl Session {
    fn new(id: u64) -> Self {
        Self {
            id,
            name: format!("Session {id}"),
            messages: Vec::new(),
            feedback: Vec::new(),
        }
    }
}

/// Holds all chat sessions and the currently active session id.
///
/// Invariant: the active id is always a key of the session map. Deleting
/// the active session falls back to the lowest remaining id, or recreates
/// a fresh default session when none remain.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: BTreeMap<u64, Session>,
    active_id: u64,
}

impl SessionStore {
    /// Creates a store with a single default session, which is active.
    pub fn new() -> Self {
        let mut sessions = BTreeMap::new();
        let session = Session::new(1);
        sessions.insert(session.id, session);
        Self {
            sessions,
            active_id: 1,
        }
    }

    /// Creates a new empty session, makes it active, and returns its id.
    ///
    /// Ids are allocated as `max(existing) + 1`, or 1 when the store is
    /// empty. This is a monotonic counter over live ids, not a gap-filling
    /// allocator: deleting the highest id makes that id reusable.
    pub fn create(&mut self) -> u64 {
        let id = self.sessions.keys().next_back().map_or(1, |max| max + 1);
        self.sessions.insert(id, Session::new(id));
        self.active_id = id;
        id
    }

    /// Makes the given session active.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] if no session has this id.
    pub fn switch(&mut self, id: u64) -> Result<()> {
        if !self.sessions.contains_key(&id) {
            return Err(Error::unknown_session(id));
        }
        self.active_id = id;
        Ok(())
    }

    /// Removes a session and everything it holds.
    ///
    /// If the active session is deleted, the active pointer moves to the
    /// first remaining session in iteration order; if none remain, a fresh
    /// default session is created and made active.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] if no session has this id.
    pub fn delete(&mut self, id: u64) -> Result<()> {
        if self.sessions.remove(&id).is_none() {
            return Err(Error::unknown_session(id));
        }
        if self.active_id == id {
            match self.sessions.keys().next().copied() {
                Some(first) => self.active_id = first,
                None => {
                    self.create();
                }
            }
        }
        Ok(())
    }

    /// Overwrites a session's display name.
    ///
    /// No validation is performed on the name itself: blank and duplicate
    /// names are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] if no session has this id.
    pub fn rename(&mut self, id: u64, name: impl Into<String>) -> Result<()> {
        match self.sessions.get_mut(&id) {
            Some(session) => {
                session.name = name.into();
                Ok(())
            }
            None => Err(Error::unknown_session(id)),
        }
    }

    /// Appends a message to the end of a session's history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] if no session has this id.
    pub fn append(&mut self, id: u64, message: Message) -> Result<()> {
        match self.sessions.get_mut(&id) {
            Some(session) => {
                session.messages.push(message);
                Ok(())
            }
            None => Err(Error::unknown_session(id)),
        }
    }

    /// Records a response rating on a session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] if no session has this id.
    pub fn rate(&mut self, id: u64, feedback: Feedback) -> Result<()> {
        match self.sessions.get_mut(&id) {
            Some(session) => {
                session.feedback.push(feedback);
                Ok(())
            }
            None => Err(Error::unknown_session(id)),
        }
    }

    /// Returns the active session id.
    pub fn active_id(&self) -> u64 {
        self.active_id
    }

    /// Returns the active session.
    pub fn active(&self) -> &Session {
        self.sessions
            .get(&self.active_id)
            .expect("active id always names a live session")
    }

    /// Returns the active session for mutation.
    pub fn active_mut(&mut self) -> &mut Session {
        self.sessions
            .get_mut(&self.active_id)
            .expect("active id always names a live session")
    }

    /// Returns a session by id.
    pub fn get(&self, id: u64) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Returns all session ids in ascending order.
    pub fn ids(&self) -> Vec<u64> {
        self.sessions.keys().copied().collect()
    }

    /// Iterates over all sessions in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    /// Returns the number of sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if the store holds no sessions.
    ///
    /// Never true after construction; every delete of the last session
    /// recreates a default one.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
