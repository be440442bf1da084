//! Advice providers

use crate::{OllamaError, Result, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Anything that can answer an environmental question
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    /// Provider identifier
    fn name(&self) -> &str;

    /// Model answering the questions
    fn model(&self) -> &str;

    /// Check if provider is reachable
    async fn health_check(&self) -> ProviderStatus;

    /// Answer a question
    async fn advise(&self, question: &str) -> Result<Advice>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ProviderStatus {
    Healthy,
    Unavailable(String),
}

impl ProviderStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// A trimmed, non-empty reply
#[derive(Debug, Clone, Serialize)]
pub struct Advice {
    pub text: String,
    pub model: String,
    pub latency_ms: u64,
}

/// Wrap a user question in the assistant framing
pub fn frame_prompt(question: &str) -> String {
    format!(
        "You are a helpful AI environmental assistant in Bangladesh.\n\nQuestion: {}\n\nAnswer:",
        question
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Pull the reply text out of a `/api/generate` body
pub(crate) fn extract_reply(body: &str) -> Result<String> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| OllamaError::Parse(e.to_string()))?;
    let reply = parsed.response.trim();
    if reply.is_empty() {
        return Err(OllamaError::EmptyReply);
    }
    Ok(reply.to_string())
}

/// Ollama Provider
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(timeout: Duration) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Set the full `/api/generate` URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Model listing URL on the same server
    pub fn tags_url(&self) -> String {
        let base = self
            .endpoint
            .trim_end_matches('/')
            .trim_end_matches("/api/generate");
        format!("{}/api/tags", base)
    }
}

#[async_trait]
impl AdviceProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> ProviderStatus {
        match self.client.get(self.tags_url()).send().await {
            Ok(resp) if resp.status().is_success() => ProviderStatus::Healthy,
            Ok(resp) => ProviderStatus::Unavailable(format!("HTTP {}", resp.status())),
            Err(e) => ProviderStatus::Unavailable(e.to_string()),
        }
    }

    async fn advise(&self, question: &str) -> Result<Advice> {
        let question = question.trim();
        if question.is_empty() {
            return Err(OllamaError::EmptyQuestion);
        }

        let start = Instant::now();
        let request = GenerateRequest {
            model: &self.model,
            prompt: frame_prompt(question),
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| OllamaError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "ollama rejected request");
            return Err(OllamaError::ServerStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OllamaError::ConnectionFailed(e.to_string()))?;
        let text = extract_reply(&body)?;
        let latency_ms = start.elapsed().as_millis() as u64;

        tracing::info!(model = %self.model, latency_ms, "advice generated");
        Ok(Advice {
            text,
            model: self.model.clone(),
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_framing() {
        assert_eq!(
            frame_prompt("How can I save water?"),
            "You are a helpful AI environmental assistant in Bangladesh.\n\nQuestion: How can I save water?\n\nAnswer:"
        );
    }

    #[test]
    fn test_request_body() {
        let request = GenerateRequest {
            model: "mistral",
            prompt: frame_prompt("q"),
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "mistral");
        assert_eq!(json["stream"], false);
        assert!(json["prompt"].as_str().unwrap().ends_with("Question: q\n\nAnswer:"));
    }

    #[test]
    fn test_extract_reply() {
        let body = r#"{"model":"mistral","response":"  Plant trees.\n","done":true}"#;
        assert_eq!(extract_reply(body).unwrap(), "Plant trees.");
    }

    #[test]
    fn test_empty_reply() {
        assert!(matches!(
            extract_reply(r#"{"response":"   "}"#),
            Err(OllamaError::EmptyReply)
        ));
        assert!(matches!(extract_reply(r#"{"done":true}"#), Err(OllamaError::EmptyReply)));
    }

    #[test]
    fn test_malformed_reply() {
        assert!(matches!(extract_reply("<html>"), Err(OllamaError::Parse(_))));
    }

    #[test]
    fn test_builder_and_tags_url() {
        let provider = OllamaProvider::new(Duration::from_secs(1))
            .with_endpoint("http://10.0.0.5:11434/api/generate")
            .with_model("llama3");
        assert_eq!(provider.model(), "llama3");
        assert_eq!(provider.tags_url(), "http://10.0.0.5:11434/api/tags");

        let default = OllamaProvider::new(Duration::from_secs(1));
        assert_eq!(default.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(default.tags_url(), "http://localhost:11434/api/tags");
    }

    #[tokio::test]
    async fn test_blank_question_skips_network() {
        let provider = OllamaProvider::new(Duration::from_millis(10))
            .with_endpoint("http://127.0.0.1:9/api/generate");
        assert!(matches!(
            provider.advise("  \n ").await,
            Err(OllamaError::EmptyQuestion)
        ));
    }

    #[test]
    fn test_status_json() {
        let json = serde_json::to_value(ProviderStatus::Unavailable("down".into())).unwrap();
        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["detail"], "down");
    }
}
