// Mock IAT dictation server shared by the integration tests
//
// Accepts WebSocket connections on 127.0.0.1, records every frame message it
// receives, and replies according to a fixed `Behavior`.

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use iat_stream::{FrameMessage, InboundEnvelope, SessionConfig};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Echo each frame's audio bytes back as recognized text, finish on the last frame
    Echo,
    /// Answer the first frame with an error envelope
    Reject { code: i64 },
    /// Answer the first frame with an error header that has no `status`
    RejectBare { code: i64 },
    /// Answer the first frame with a result whose text is not base64
    Garbage,
    /// Ping, then deliver results as binary messages, then keep talking after the final one
    Binary,
    /// Read frames but never reply
    Silent,
    /// Close the connection after the first frame
    Hangup,
}

pub struct MockServer {
    pub addr: SocketAddr,
    frames: Arc<Mutex<Vec<FrameMessage>>>,
    queries: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicUsize>,
}

impl MockServer {
    pub async fn start(behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let frames = Arc::new(Mutex::new(Vec::new()));
        let queries = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(AtomicUsize::new(0));

        let server = Self {
            addr,
            frames: Arc::clone(&frames),
            queries: Arc::clone(&queries),
            closed: Arc::clone(&closed),
        };

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let frames = Arc::clone(&frames);
                let queries = Arc::clone(&queries);
                let closed = Arc::clone(&closed);

                tokio::spawn(async move {
                    if let Some(ws) = handshake(stream, queries).await {
                        serve(ws, behavior, frames).await;
                    }
                    closed.fetch_add(1, Ordering::SeqCst);
                });
            }
        });

        server
    }

    /// Session config pointing at this server, tuned for fast tests
    pub fn config(&self) -> SessionConfig {
        SessionConfig {
            endpoint: format!("ws://{}/v1", self.addr),
            frame_size: 16,
            frame_interval_ms: 1,
            timeout_ms: 10_000,
            close_timeout_ms: 500,
            ..SessionConfig::default()
        }
    }

    pub fn frames(&self) -> Vec<FrameMessage> {
        self.frames.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// Number of connections the server has seen end
    pub fn closed_connections(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

async fn handshake(
    stream: TcpStream,
    queries: Arc<Mutex<Vec<String>>>,
) -> Option<WebSocketStream<TcpStream>> {
    let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
        let query = req.uri().query().unwrap_or_default().to_string();
        queries.lock().unwrap().push(query);
        Ok(resp)
    };

    tokio_tungstenite::accept_hdr_async(stream, callback).await.ok()
}

async fn serve(
    mut ws: WebSocketStream<TcpStream>,
    behavior: Behavior,
    frames: Arc<Mutex<Vec<FrameMessage>>>,
) {
    let mut replied = false;

    while let Some(Ok(msg)) = ws.next().await {
        let Message::Text(text) = msg else {
            continue;
        };
        let Ok(frame) = serde_json::from_str::<FrameMessage>(&text) else {
            continue;
        };
        frames.lock().unwrap().push(frame.clone());

        match behavior {
            Behavior::Echo => {
                let audio = frame.audio_bytes().unwrap_or_default();
                if !audio.is_empty() {
                    let words = String::from_utf8_lossy(&audio).to_string();
                    send(&mut ws, InboundEnvelope::with_words(1, &[words.as_str()])).await;
                }
                if frame.header.status == 2 {
                    send(&mut ws, InboundEnvelope::empty(2)).await;
                }
            }
            Behavior::Reject { code } => {
                if !replied {
                    send(&mut ws, InboundEnvelope::error(code, "invalid request")).await;
                    replied = true;
                }
            }
            Behavior::RejectBare { code } => {
                if !replied {
                    let raw = format!(
                        r#"{{"header":{{"code":{},"message":"appid error","sid":"iat-mock"}}}}"#,
                        code
                    );
                    let _ = ws.send(Message::Text(raw)).await;
                    replied = true;
                }
            }
            Behavior::Garbage => {
                if !replied {
                    let raw = r#"{"header":{"code":0,"status":1},"payload":{"result":{"text":"%%%"}}}"#;
                    let _ = ws.send(Message::Text(raw.to_string())).await;
                    replied = true;
                }
            }
            Behavior::Binary => {
                if frame.header.status == 2 {
                    let _ = ws.send(Message::Ping(b"keepalive".to_vec())).await;
                    send_binary(&mut ws, InboundEnvelope::with_words(1, &["binary "])).await;
                    send_binary(&mut ws, InboundEnvelope::with_words(2, &["result"])).await;
                    // Anything after the final envelope must be ignored
                    send(&mut ws, InboundEnvelope::with_words(1, &[" trailing"])).await;
                    let _ = ws.send(Message::Text("not json".to_string())).await;
                }
            }
            Behavior::Silent => {}
            Behavior::Hangup => {
                let _ = ws.close(None).await;
            }
        }
    }
}

async fn send(ws: &mut WebSocketStream<TcpStream>, envelope: InboundEnvelope) {
    let json = serde_json::to_string(&envelope).unwrap();
    let _ = ws.send(Message::Text(json)).await;
}

async fn send_binary(ws: &mut WebSocketStream<TcpStream>, envelope: InboundEnvelope) {
    let json = serde_json::to_vec(&envelope).unwrap();
    let _ = ws.send(Message::Binary(json)).await;
}
