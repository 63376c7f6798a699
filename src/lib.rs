pub mod audio;
pub mod auth;
pub mod client;
pub mod config;
pub mod protocol;
pub mod session;

pub use audio::{AudioFormat, AudioInfo, Frame, FrameEncoder, FrameStatus};
pub use auth::{sign_url, ConnectionRequest, Credentials};
pub use client::{IatClient, IatRecognizer, SpeechRecognizer};
pub use config::Config;
pub use protocol::{decode_envelope, DecodeError, Decoded, FrameMessage, IatParams, InboundEnvelope};
pub use session::{
    Session, SessionConfig, SessionError, SessionHandle, SessionOutcome, SessionReport,
    SessionState, SessionStats,
};
