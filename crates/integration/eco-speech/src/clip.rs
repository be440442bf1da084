//! One-shot audio clips

use crate::{Result, SpeechError};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub id: Uuid,
    pub path: PathBuf,
}

impl AudioClip {
    /// Write MP3 bytes to `<dir>/eco-tts-<id>.mp3`
    pub async fn write(dir: &Path, bytes: &[u8]) -> Result<Self> {
        let id = Uuid::new_v4();
        let path = dir.join(format!("eco-tts-{}.mp3", id));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| SpeechError::Io {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(%id, path = %path.display(), size = bytes.len(), "audio clip written");
        Ok(Self { id, path })
    }

    /// Read the clip and delete the file
    pub async fn take(self) -> Result<Vec<u8>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SpeechError::Io {
                path: self.path.clone(),
                source,
            })?;
        self.discard().await;
        Ok(bytes)
    }

    /// Delete the file without reading it
    pub async fn discard(&self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!(path = %self.path.display(), "failed to remove audio clip: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("eco_speech_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_take_reads_then_deletes() {
        let dir = temp_dir();
        let clip = AudioClip::write(&dir, b"ID3fake").await.unwrap();
        let path = clip.path.clone();
        assert!(path.exists());
        assert!(path.extension().is_some_and(|e| e == "mp3"));

        assert_eq!(clip.take().await.unwrap(), b"ID3fake");
        assert!(!path.exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_take_missing_file() {
        let clip = AudioClip {
            id: Uuid::new_v4(),
            path: std::env::temp_dir().join(format!("eco_missing_{}.mp3", Uuid::new_v4())),
        };
        assert!(matches!(clip.take().await, Err(SpeechError::Io { .. })));
    }
}
