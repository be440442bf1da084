//! Application state for the dashboard

use chrono::NaiveDate;
use eco_config::EcoConfig;
use eco_core::EmissionEstimator;
use eco_ollama::{AdviceProvider, OllamaProvider};
use eco_search::SearchClient;
use eco_session::SessionStore;
use eco_speech::{AudioClip, GoogleTts, SpeechSynthesizer};
use eco_weather::WeatherClient;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// How long an unplayed clip is kept before its file is deleted
pub const DEFAULT_CLIP_TTL: Duration = Duration::from_secs(60);

/// Shared by every handler
pub struct AppState {
    pub config: EcoConfig,
    pub estimator: EmissionEstimator,
    pub weather: WeatherClient,
    pub search: SearchClient,
    pub advisor: Arc<dyn AdviceProvider>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    /// Per-cookie tasks, quiz and rewards
    pub sessions: SessionStore,
    /// Synthesized clips waiting to be played once
    pub clips: RwLock<HashMap<Uuid, AudioClip>>,
    pub clip_ttl: Duration,
    /// Server start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Build clients and the estimator from configuration
    pub fn new(config: EcoConfig) -> Self {
        let http_timeout = config.http_timeout();

        let weather = WeatherClient::new(http_timeout).with_endpoint(&config.weather_url);
        let search = SearchClient::new(http_timeout).with_endpoint(&config.search_url);
        let advisor = OllamaProvider::new(config.llm_timeout())
            .with_endpoint(&config.ollama_url)
            .with_model(&config.ollama_model);
        let speech = GoogleTts::new(http_timeout)
            .with_endpoint(&config.tts_url)
            .with_lang(&config.tts_lang);

        Self {
            estimator: EmissionEstimator::new(config.factor_table()),
            weather,
            search,
            advisor: Arc::new(advisor),
            speech: Arc::new(speech),
            sessions: SessionStore::new(),
            clips: RwLock::new(HashMap::new()),
            clip_ttl: DEFAULT_CLIP_TTL,
            started_at: chrono::Utc::now(),
            config,
        }
    }

    /// Swap the advice backend
    pub fn with_advisor(mut self, advisor: Arc<dyn AdviceProvider>) -> Self {
        self.advisor = advisor;
        self
    }

    /// Swap the speech backend
    pub fn with_speech(mut self, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = speech;
        self
    }

    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }

    /// Calendar date used for the daily task and quiz reset
    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    pub fn with_clip_ttl(mut self, ttl: Duration) -> Self {
        self.clip_ttl = ttl;
        self
    }

    /// Park a clip until the browser fetches it. A clip still parked after
    /// `clip_ttl` is dropped and its file deleted.
    pub async fn stash_clip(self: &Arc<Self>, clip: AudioClip) -> Uuid {
        let id = clip.id;
        self.clips.write().await.insert(id, clip);

        let state: Weak<Self> = Arc::downgrade(self);
        let ttl = self.clip_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let Some(state) = state.upgrade() else {
                return;
            };
            if let Some(clip) = state.take_clip(id).await {
                tracing::debug!(%id, "audio clip expired unplayed");
                clip.discard().await;
            }
        });
        id
    }

    /// Remove a parked clip; a second call for the same id yields `None`
    pub async fn take_clip(&self, id: Uuid) -> Option<AudioClip> {
        self.clips.write().await.remove(&id)
    }

    pub async fn pending_clips(&self) -> usize {
        self.clips.read().await.len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EcoConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_core::Activity;
    use std::collections::BTreeMap;

    #[test]
    fn test_state_from_config() {
        let mut config = EcoConfig::default();
        config.ollama_model = "llama3".into();
        config.emission_factors = Some(BTreeMap::from([(Activity::Bus, 0.05)]));

        let state = AppState::new(config);
        assert_eq!(state.advisor.model(), "llama3");
        assert_eq!(state.estimator.factors().factor(Activity::Bus), 0.05);
        assert_eq!(state.estimator.factors().factor(Activity::Cng), 0.055);
        assert_eq!(state.weather.endpoint(), "https://wttr.in/");
        assert!(state.uptime_secs() >= 0);
    }

    #[tokio::test]
    async fn test_clip_is_taken_once() {
        let state = Arc::new(AppState::default());
        let clip = AudioClip {
            id: Uuid::new_v4(),
            path: std::env::temp_dir().join("eco-unused.mp3"),
        };
        let id = state.stash_clip(clip).await;
        assert_eq!(state.pending_clips().await, 1);
        assert!(state.take_clip(id).await.is_some());
        assert!(state.take_clip(id).await.is_none());
    }

    #[tokio::test]
    async fn test_unplayed_clip_expires() {
        let state = Arc::new(AppState::default().with_clip_ttl(Duration::from_millis(20)));
        let clip = AudioClip::write(&std::env::temp_dir(), b"ID3expire").await.unwrap();
        let path = clip.path.clone();

        let id = state.stash_clip(clip).await;
        assert!(path.exists());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(state.pending_clips().await, 0);
        assert!(state.take_clip(id).await.is_none());
        assert!(!path.exists());
    }
}
