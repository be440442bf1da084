//! Google Translate TTS
//!
//! Long text is cut into chunks of at most [`MAX_CHUNK_CHARS`] characters on
//! word boundaries; each chunk is one request and the MP3 frames are
//! concatenated.

use crate::{AudioClip, Result, SpeechError, DEFAULT_ENDPOINT, DEFAULT_LANG};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Longest chunk the endpoint accepts
pub const MAX_CHUNK_CHARS: usize = 100;

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into a clip on local storage
    async fn synthesize(&self, text: &str) -> Result<AudioClip>;
}

/// Split text into chunks of at most `max` characters, breaking on
/// whitespace. Words longer than `max` are cut.
pub fn split_chunks(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max);
            chunks.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() { word.len() } else { word.len() + 1 };
        if current_len + needed > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

pub struct GoogleTts {
    endpoint: String,
    lang: String,
    out_dir: PathBuf,
    client: reqwest::Client,
}

impl GoogleTts {
    pub fn new(timeout: Duration) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            lang: DEFAULT_LANG.to_string(),
            out_dir: std::env::temp_dir(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Directory clips are written to
    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    fn chunk_query(&self, chunk: &str, idx: usize, total: usize) -> Vec<(&'static str, String)> {
        vec![
            ("ie", "UTF-8".to_string()),
            ("client", "tw-ob".to_string()),
            ("tl", self.lang.clone()),
            ("q", chunk.to_string()),
            ("total", total.to_string()),
            ("idx", idx.to_string()),
            ("textlen", chunk.chars().count().to_string()),
        ]
    }

    async fn fetch_chunk(&self, chunk: &str, idx: usize, total: usize) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.chunk_query(chunk, idx, total))
            .send()
            .await
            .map_err(|e| SpeechError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SpeechError::Status(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::ConnectionFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str) -> Result<AudioClip> {
        let chunks = split_chunks(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let total = chunks.len();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, idx, total).await?);
        }

        tracing::info!(chunks = total, bytes = audio.len(), "speech synthesized");
        AudioClip::write(&self.out_dir, &audio).await
    }
}
