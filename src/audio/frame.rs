use serde::{Deserialize, Serialize};
use std::io::{self, SeekFrom};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

/// Default frame window in bytes (40ms of 16kHz 16-bit mono audio)
pub const DEFAULT_FRAME_SIZE: usize = 1280;

/// Position of a frame in the upload sequence, as the server sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameStatus {
    First,
    Continue,
    Last,
}

impl FrameStatus {
    /// Wire value for `header.status`
    pub fn code(self) -> u8 {
        match self {
            FrameStatus::First => 0,
            FrameStatus::Continue => 1,
            FrameStatus::Last => 2,
        }
    }
}

/// Audio format announced with every frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub encoding: String,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            encoding: "raw".to_string(),
        }
    }
}

/// One outbound chunk of audio
#[derive(Debug, Clone)]
pub struct Frame {
    /// Zero-based position in the sequence
    pub index: usize,
    /// Whether this frame ends the sequence
    pub last: bool,
    pub payload: Vec<u8>,
    pub format: AudioFormat,
}

impl Frame {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.last
    }

    /// A frame that is both first and last is reported as `Last`, since the
    /// server must be told the stream has ended.
    pub fn status(&self) -> FrameStatus {
        if self.last {
            FrameStatus::Last
        } else if self.index == 0 {
            FrameStatus::First
        } else {
            FrameStatus::Continue
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncoderState {
    First,
    Continue,
    Done,
}

/// Slices a byte source into fixed-size frames
///
/// Frames are produced lazily. A window that cannot be filled means the
/// source is exhausted, so it is emitted as the last frame. A full window
/// is not proof of exhaustion; when the source length is an exact multiple
/// of the frame size, the following empty read becomes an empty last frame.
pub struct FrameEncoder<R> {
    reader: R,
    frame_size: usize,
    format: AudioFormat,
    state: EncoderState,
    next_index: usize,
}

impl<R: AsyncRead + Unpin> FrameEncoder<R> {
    pub fn new(reader: R, frame_size: usize, format: AudioFormat) -> Self {
        Self {
            reader,
            frame_size: frame_size.max(1),
            format,
            state: EncoderState::First,
            next_index: 0,
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Read the next frame, or `None` once the last frame has been produced
    pub async fn next_frame(&mut self) -> io::Result<Option<Frame>> {
        if self.state == EncoderState::Done {
            return Ok(None);
        }

        let payload = self.read_window().await?;
        let last = payload.len() < self.frame_size;

        let frame = Frame {
            index: self.next_index,
            last,
            payload,
            format: self.format.clone(),
        };

        self.next_index += 1;
        self.state = if last {
            EncoderState::Done
        } else {
            EncoderState::Continue
        };

        Ok(Some(frame))
    }

    /// Drain the remaining frames into a vector
    pub async fn collect_frames(&mut self) -> io::Result<Vec<Frame>> {
        let mut frames = Vec::new();
        while let Some(frame) = self.next_frame().await? {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Fill one window, stopping early only at end-of-stream
    async fn read_window(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; self.frame_size];
        let mut filled = 0;

        while filled < self.frame_size {
            let n = self.reader.read(&mut buf[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        buf.truncate(filled);
        Ok(buf)
    }
}

impl<R: AsyncRead + AsyncSeek + Unpin> FrameEncoder<R> {
    /// Rewind the source and start a fresh sequence
    pub async fn restart(&mut self) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(0)).await?;
        self.state = EncoderState::First;
        self.next_index = 0;
        Ok(())
    }
}
