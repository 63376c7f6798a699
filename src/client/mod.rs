pub mod client;
pub mod recognizer;

pub use client::IatClient;
pub use recognizer::{IatRecognizer, SpeechRecognizer};
