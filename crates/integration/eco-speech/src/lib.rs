//! Text-to-speech
//!
//! Turns reply text into an MP3 clip on local temporary storage. Clips are
//! one-shot: [`AudioClip::take`] reads the bytes and deletes the file.

pub mod clip;
pub mod tts;

pub use clip::AudioClip;
pub use tts::{split_chunks, GoogleTts, SpeechSynthesizer, MAX_CHUNK_CHARS};

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://translate.google.com/translate_tts";
pub const DEFAULT_LANG: &str = "en";

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Nothing to speak")]
    EmptyText,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Speech service returned HTTP {0}")]
    Status(u16),

    #[error("Audio file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SpeechError>;
