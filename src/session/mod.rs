//! Engine session state machine and session registry.
//!
//! # Architecture
//!
//! ```text
//! IPC worker ──▶ SessionRegistry ──▶ InputSession ──▶ dyn EngineSession (RIME)
//!                 (id -> session)     (mode machine)   (external, mocked in tests)
//! ```
//!
//! The composition engine itself (candidate lookup, ranking, pronunciation)
//! is an external collaborator reached only through [`engine::EngineSession`].
//! Everything in this module is engine-agnostic state: input mode, the
//! temporary-English buffer, and expanded candidate-view navigation.

pub mod engine;
pub mod input_session;
pub mod registry;

pub use engine::{Candidate, EngineSession, InputState, Mode};
pub use input_session::InputSession;
pub use registry::{SessionError, SessionId, SessionRegistry};
