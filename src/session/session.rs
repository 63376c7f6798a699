use super::config::SessionConfig;
use super::error::SessionError;
use super::handle::SessionHandle;
use super::state::SessionState;
use super::stats::{SessionOutcome, SessionReport, SessionStats};
use super::transcript::Transcript;
use crate::audio::FrameEncoder;
use crate::auth::{ConnectionRequest, Credentials};
use crate::protocol::{decode_envelope, Decoded, DecodeError, FrameMessage};
use chrono::Utc;
use futures::{Sink, SinkExt, StreamExt};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::AsyncRead;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// How a session ended, before it is turned into an outcome
enum SessionEnd {
    Completed,
    Failed(SessionError),
}

/// Frame pump progress, readable while the pump is running
#[derive(Default)]
struct PumpCounters {
    frames: AtomicUsize,
    bytes: AtomicU64,
}

impl PumpCounters {
    fn record(&self, payload_len: usize) {
        self.frames.fetch_add(1, Ordering::SeqCst);
        self.bytes.fetch_add(payload_len as u64, Ordering::SeqCst);
    }
}

/// One recognition request over one WebSocket connection
///
/// The session runs as a single task that owns all of its state. The frame
/// pump and the inbound reader are two futures polled from the same
/// `select!`, so envelopes are handled one at a time and the transcript has a
/// single writer. The session is consumed when it finishes, so its outcome
/// can only be produced once.
pub struct Session {
    id: Uuid,
    config: Arc<SessionConfig>,
    credentials: Credentials,
    request: ConnectionRequest,
    state: SessionState,
    transcript: Transcript,
    started_at: chrono::DateTime<Utc>,
    started: Instant,
    envelopes_received: usize,
}

impl Session {
    pub fn new(
        config: Arc<SessionConfig>,
        credentials: Credentials,
        request: ConnectionRequest,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            credentials,
            request,
            state: SessionState::Idle,
            transcript: Transcript::new(),
            started_at: Utc::now(),
            started: Instant::now(),
            envelopes_received: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run the session on the tokio runtime, streaming `audio`
    pub fn spawn<R>(self, audio: R) -> SessionHandle
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let id = self.id;
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(audio, cancel_rx));

        SessionHandle::new(id, cancel_tx, task)
    }

    async fn run<R>(mut self, audio: R, mut cancel: oneshot::Receiver<()>) -> SessionReport
    where
        R: AsyncRead + Unpin,
    {
        let counters = PumpCounters::default();
        let config = Arc::clone(&self.config);
        let timeout = config.timeout();

        // Deadline counts from session start, connect included
        let deadline = tokio::time::sleep_until(self.started + timeout);
        tokio::pin!(deadline);

        self.transition(SessionState::Connecting);
        info!("[{}] Connecting to {}", self.id, self.request.host);

        let connect = tokio_tungstenite::connect_async(self.request.url.to_string());
        let ws = tokio::select! {
            biased;
            _ = &mut cancel => {
                return self.finish(SessionEnd::Failed(SessionError::Cancelled), &counters);
            }
            _ = &mut deadline => {
                return self.finish(SessionEnd::Failed(SessionError::Timeout(timeout)), &counters);
            }
            res = connect => match res {
                Ok((ws, _response)) => ws,
                Err(e) => {
                    return self.finish(SessionEnd::Failed(SessionError::Connect(e)), &counters);
                }
            },
        };

        self.transition(SessionState::Open);
        info!("[{}] Connected, streaming audio", self.id);

        let (mut sink, mut stream) = ws.split();
        let app_id = self.credentials.app_id.clone();
        let encoder = FrameEncoder::new(audio, config.frame_size, config.audio.clone());

        let end = {
            let pump = pump_frames(&mut sink, encoder, &app_id, &config, &counters);
            tokio::pin!(pump);
            let mut pumping = true;

            self.transition(SessionState::Streaming);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut cancel => break SessionEnd::Failed(SessionError::Cancelled),
                    _ = &mut deadline => break SessionEnd::Failed(SessionError::Timeout(timeout)),
                    msg = stream.next() => {
                        if let ControlFlow::Break(end) = self.on_message(msg) {
                            break end;
                        }
                    }
                    res = &mut pump, if pumping => {
                        pumping = false;
                        match res {
                            Ok(()) => {
                                debug!(
                                    "[{}] Last frame sent ({} frames), waiting for final result",
                                    self.id,
                                    counters.frames.load(Ordering::SeqCst)
                                );
                                self.transition(SessionState::Draining);
                            }
                            Err(e) => break SessionEnd::Failed(e),
                        }
                    }
                }
            }
        };
        // The pump was dropped with the block above, so no further frames go out

        match tokio::time::timeout(config.close_timeout(), sink.close()).await {
            Ok(Ok(())) => debug!("[{}] Connection closed", self.id),
            Ok(Err(e)) => debug!("[{}] Close handshake failed: {}", self.id, e),
            Err(_) => warn!("[{}] Close handshake timed out", self.id),
        }
        drop(stream);

        self.finish(end, &counters)
    }

    /// Handle one item from the inbound stream
    fn on_message(
        &mut self,
        msg: Option<Result<Message, tungstenite::Error>>,
    ) -> ControlFlow<SessionEnd> {
        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                return ControlFlow::Break(SessionEnd::Failed(SessionError::Transport(
                    e.to_string(),
                )))
            }
            None => {
                return ControlFlow::Break(SessionEnd::Failed(SessionError::Transport(
                    "connection closed before final result".to_string(),
                )))
            }
        };

        let text = match msg {
            Message::Text(text) => text,
            Message::Binary(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    return ControlFlow::Break(SessionEnd::Failed(DecodeError::Utf8(e).into()))
                }
            },
            Message::Close(frame) => {
                let reason = frame
                    .map(|f| format!(" ({}: {})", u16::from(f.code), f.reason))
                    .unwrap_or_default();
                return ControlFlow::Break(SessionEnd::Failed(SessionError::Transport(format!(
                    "server closed connection before final result{}",
                    reason
                ))));
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {
                return ControlFlow::Continue(())
            }
        };

        self.envelopes_received += 1;

        match decode_envelope(&text) {
            Ok(Decoded::Text { fragment, is_final }) => {
                if !fragment.is_empty() {
                    debug!("[{}] Recognized: {}", self.id, fragment);
                    self.transcript.push(fragment);
                }

                if is_final {
                    info!("[{}] Final result received", self.id);
                    ControlFlow::Break(SessionEnd::Completed)
                } else {
                    ControlFlow::Continue(())
                }
            }
            Ok(Decoded::ServerError { code, message, sid }) => {
                ControlFlow::Break(SessionEnd::Failed(SessionError::Server {
                    code,
                    message: message.unwrap_or_default(),
                    sid,
                }))
            }
            Err(e) => ControlFlow::Break(SessionEnd::Failed(e.into())),
        }
    }

    fn transition(&mut self, next: SessionState) {
        if self.state.can_transition_to(next) {
            debug!("[{}] {:?} -> {:?}", self.id, self.state, next);
            self.state = next;
        } else {
            warn!(
                "[{}] Ignoring invalid transition {:?} -> {:?}",
                self.id, self.state, next
            );
        }
    }

    fn finish(mut self, end: SessionEnd, counters: &PumpCounters) -> SessionReport {
        let text = self.transcript.text();

        let outcome = match end {
            SessionEnd::Completed => {
                self.transition(SessionState::Closed);
                SessionOutcome::succeeded(text)
            }
            SessionEnd::Failed(e) => {
                match &e {
                    SessionError::Cancelled => info!("[{}] Recognition cancelled", self.id),
                    err if err.is_timeout() => warn!("[{}] {}", self.id, err),
                    SessionError::Server { code, sid, .. } => {
                        error!("[{}] Server error {} (sid={:?}): {}", self.id, code, sid, e)
                    }
                    _ => error!("[{}] Recognition failed: {}", self.id, e),
                }
                self.transition(SessionState::Error);
                SessionOutcome::failed(text, e.to_string())
            }
        };

        let stats = SessionStats {
            session_id: self.id,
            started_at: self.started_at,
            duration_secs: self.started.elapsed().as_secs_f64(),
            frames_sent: counters.frames.load(Ordering::SeqCst),
            bytes_sent: counters.bytes.load(Ordering::SeqCst),
            envelopes_received: self.envelopes_received,
            final_state: self.state,
        };

        info!(
            "[{}] Session finished in {:.2}s (success={}, frames={}, envelopes={}, chars={})",
            self.id,
            stats.duration_secs,
            outcome.success,
            stats.frames_sent,
            stats.envelopes_received,
            outcome.text.chars().count()
        );

        SessionReport { outcome, stats }
    }
}

/// Send every frame of `encoder`, pausing between frames
async fn pump_frames<S, R>(
    sink: &mut S,
    mut encoder: FrameEncoder<R>,
    app_id: &str,
    config: &SessionConfig,
    counters: &PumpCounters,
) -> Result<(), SessionError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
    R: AsyncRead + Unpin,
{
    let interval = config.frame_interval();

    while let Some(frame) = encoder.next_frame().await.map_err(SessionError::Audio)? {
        let message = FrameMessage::from_frame(&frame, app_id, &config.iat);
        let json = serde_json::to_string(&message)?;

        sink.send(Message::Text(json))
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;
        counters.record(frame.payload.len());

        if frame.is_last() {
            break;
        }

        tokio::time::sleep(interval).await;
    }

    Ok(())
}
