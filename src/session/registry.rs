//! Maps IPC client-pipe session IDs to live [`InputSession`]s.
//!
//! One registry per server process, constructed once in `main` and shared
//! behind an `Arc`. Access is `parking_lot::RwLock`-guarded: reads for
//! per-key dispatch, writes only on session start/end.

use super::engine::EngineSession;
use super::input_session::InputSession;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;

pub type SessionId = u32;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(SessionId),
    #[error("session {0} already exists")]
    AlreadyExists(SessionId),
}

pub type Result<T> = std::result::Result<T, SessionError>;

pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, InputSession>>,
    // Starts at 1: 0 is the wire protocol's "start_session failed" sentinel.
    next_id: AtomicU32,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU32::new(1),
        }
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh session id and starts a session under it. §4.2's
    /// `START_SESSION` returns this id directly as `result` (`0` = fail);
    /// the client is expected to echo it back in every later message's
    /// `session_id` header field.
    pub fn start_new(&self, engine: Box<dyn EngineSession>) -> SessionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.sessions.write().insert(id, InputSession::new(engine));
        id
    }

    #[cfg(test)]
    pub fn start(&self, id: SessionId, engine: Box<dyn EngineSession>) -> Result<()> {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(&id) {
            return Err(SessionError::AlreadyExists(id));
        }
        sessions.insert(id, InputSession::new(engine));
        Ok(())
    }

    pub fn end(&self, id: SessionId) -> Result<()> {
        self.sessions
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or(SessionError::NotFound(id))
    }

    pub fn with_session<R>(&self, id: SessionId, f: impl FnOnce(&mut InputSession) -> R) -> Result<R> {
        let mut sessions = self.sessions.write();
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        Ok(f(session))
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.read().contains_key(&id)
    }

    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::engine::fake::FakeEngine;

    #[test]
    fn start_new_allocates_distinct_nonzero_ids() {
        let registry = SessionRegistry::new();
        let a = registry.start_new(Box::new(FakeEngine::default()));
        let b = registry.start_new(Box::new(FakeEngine::default()));
        assert_ne!(a, 0);
        assert_ne!(b, 0);
        assert_ne!(a, b);
        assert!(registry.contains(a));
        assert!(registry.contains(b));
    }

    #[test]
    fn start_then_end_round_trips() {
        let registry = SessionRegistry::new();
        registry.start(1, Box::new(FakeEngine::default())).unwrap();
        assert!(registry.contains(1));
        registry.end(1).unwrap();
        assert!(!registry.contains(1));
    }

    #[test]
    fn duplicate_start_errors() {
        let registry = SessionRegistry::new();
        registry.start(1, Box::new(FakeEngine::default())).unwrap();
        assert!(matches!(
            registry.start(1, Box::new(FakeEngine::default())),
            Err(SessionError::AlreadyExists(1))
        ));
    }

    #[test]
    fn end_unknown_session_errors() {
        let registry = SessionRegistry::new();
        assert!(matches!(registry.end(42), Err(SessionError::NotFound(42))));
    }

    #[test]
    fn with_session_dispatches_to_the_right_session() {
        let registry = SessionRegistry::new();
        registry.start(7, Box::new(FakeEngine::default())).unwrap();
        let composing = registry
            .with_session(7, |s| {
                s.process_key(crate::input::KeyEvent::new(
                    crate::input::keysym::XK_a,
                    crate::input::Modifiers::NONE,
                ));
                s.is_composing()
            })
            .unwrap();
        assert!(composing);
    }
}
