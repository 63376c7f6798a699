//! Recognition session management
//!
//! This module provides the `Session` abstraction that manages:
//! - The WebSocket connection to the dictation service
//! - Paced frame upload from the audio source
//! - Envelope decoding and transcript accumulation
//! - Completion, failure, timeout and cancellation
//! - Session statistics and state management

mod config;
mod error;
mod handle;
mod session;
mod state;
mod stats;
mod transcript;

pub use config::{SessionConfig, DEFAULT_ENDPOINT};
pub use error::SessionError;
pub use handle::SessionHandle;
pub use session::Session;
pub use state::SessionState;
pub use stats::{SessionOutcome, SessionReport, SessionStats};
pub use transcript::Transcript;
