use super::messages::{InboundEnvelope, WordResult};
use base64::Engine;
use thiserror::Error;

/// `header.status` of the envelope that ends a session
pub const STATUS_FINAL: u8 = 2;

/// What one inbound envelope means for the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Text increment to append; `is_final` marks the last envelope
    Text { fragment: String, is_final: bool },
    /// The service rejected the request
    ServerError {
        code: i64,
        message: Option<String>,
        sid: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("invalid envelope: missing header.status")]
    MissingStatus,

    #[error("invalid base64 in result text: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("result text is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid result JSON: {0}")]
    Result(#[source] serde_json::Error),
}

/// Decode one raw inbound message
pub fn decode_envelope(raw: &str) -> Result<Decoded, DecodeError> {
    let envelope: InboundEnvelope = serde_json::from_str(raw).map_err(DecodeError::Envelope)?;

    if envelope.header.code != 0 {
        return Ok(Decoded::ServerError {
            code: envelope.header.code,
            message: envelope.header.message,
            sid: envelope.header.sid,
        });
    }

    let status = envelope.header.status.ok_or(DecodeError::MissingStatus)?;

    let fragment = match envelope.payload {
        Some(payload) => decode_result_text(&payload.result.text)?,
        None => String::new(),
    };

    Ok(Decoded::Text {
        fragment,
        is_final: status == STATUS_FINAL,
    })
}

/// Decode the base64 JSON carried in `payload.result.text`
pub fn decode_result_text(encoded: &str) -> Result<String, DecodeError> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded)?;
    let json = String::from_utf8(bytes)?;
    let result: WordResult = serde_json::from_str(&json).map_err(DecodeError::Result)?;

    Ok(result.text())
}
