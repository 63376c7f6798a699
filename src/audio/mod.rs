pub mod frame;
pub mod info;

pub use frame::{AudioFormat, Frame, FrameEncoder, FrameStatus, DEFAULT_FRAME_SIZE};
pub use info::AudioInfo;
