use crate::audio::Frame;
use base64::Engine;
use serde::{Deserialize, Serialize};

// ============================================================================
// Outbound
// ============================================================================

/// Recognition parameters sent with the first frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IatParams {
    pub domain: String,
    pub language: String,
    pub accent: String,
    pub result: ResultFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultFormat {
    pub encoding: String,
    pub compress: String,
    pub format: String,
}

impl Default for IatParams {
    fn default() -> Self {
        Self {
            domain: "slm".to_string(),
            language: "mul_cn".to_string(),
            accent: "mandarin".to_string(),
            result: ResultFormat {
                encoding: "utf8".to_string(),
                compress: "raw".to_string(),
                format: "json".to_string(),
            },
        }
    }
}

/// One audio frame as sent over the socket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameMessage {
    pub header: FrameHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<FrameParameter>,
    pub payload: FramePayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameHeader {
    pub status: u8,
    pub app_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameParameter {
    pub iat: IatParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramePayload {
    pub audio: AudioChunk,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioChunk {
    pub audio: String, // Base64-encoded audio bytes
    pub sample_rate: u32,
    pub encoding: String,
}

impl FrameMessage {
    /// Wrap a frame; recognition parameters ride along on the first one only
    pub fn from_frame(frame: &Frame, app_id: &str, params: &IatParams) -> Self {
        Self {
            header: FrameHeader {
                status: frame.status().code(),
                app_id: app_id.to_string(),
            },
            parameter: frame.is_first().then(|| FrameParameter {
                iat: params.clone(),
            }),
            payload: FramePayload {
                audio: AudioChunk {
                    audio: base64::engine::general_purpose::STANDARD.encode(&frame.payload),
                    sample_rate: frame.format.sample_rate,
                    encoding: frame.format.encoding.clone(),
                },
            },
        }
    }

    pub fn audio_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.payload.audio.audio)
    }
}

// ============================================================================
// Inbound
// ============================================================================

/// One message received from the recognition service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEnvelope {
    pub header: InboundHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<InboundPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundHeader {
    pub code: i64,
    /// Required on success; error envelopes may omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundPayload {
    pub result: RecognitionResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub text: String, // Base64-encoded `WordResult` JSON
}

/// Decoded contents of `payload.result.text`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordResult {
    pub ws: Vec<WordSegment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordSegment {
    pub cw: Vec<CandidateWord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateWord {
    pub w: String,
}

impl WordResult {
    pub fn from_words(words: &[&str]) -> Self {
        Self {
            ws: words
                .iter()
                .map(|w| WordSegment {
                    cw: vec![CandidateWord { w: w.to_string() }],
                })
                .collect(),
        }
    }

    /// Words of every segment, in order, with no separator
    pub fn text(&self) -> String {
        self.ws
            .iter()
            .flat_map(|segment| segment.cw.iter())
            .map(|candidate| candidate.w.as_str())
            .collect()
    }
}

impl InboundEnvelope {
    /// Successful envelope carrying `words` as its result
    pub fn with_words(status: u8, words: &[&str]) -> Self {
        let inner = serde_json::to_vec(&WordResult::from_words(words)).unwrap_or_default();

        Self {
            header: InboundHeader {
                code: 0,
                status: Some(status),
                message: Some("success".to_string()),
                sid: None,
            },
            payload: Some(InboundPayload {
                result: RecognitionResult {
                    text: base64::engine::general_purpose::STANDARD.encode(inner),
                },
            }),
        }
    }

    /// Successful envelope without a result payload
    pub fn empty(status: u8) -> Self {
        Self {
            header: InboundHeader {
                code: 0,
                status: Some(status),
                message: None,
                sid: None,
            },
            payload: None,
        }
    }

    /// Error envelope as the service reports rejected requests
    pub fn error(code: i64, message: &str) -> Self {
        Self {
            header: InboundHeader {
                code,
                status: Some(2),
                message: Some(message.to_string()),
                sid: None,
            },
            payload: None,
        }
    }
}
