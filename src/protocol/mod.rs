//! Wire format of the IAT dictation API
//!
//! - `messages`: serde types for outbound audio frames and inbound envelopes
//! - `decoder`: turns an inbound envelope into a transcript increment or a terminal signal

pub mod decoder;
pub mod messages;

pub use decoder::{decode_envelope, decode_result_text, DecodeError, Decoded, STATUS_FINAL};
pub use messages::{FrameMessage, InboundEnvelope, IatParams, ResultFormat, WordResult};
