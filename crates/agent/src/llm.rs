//! Text-completion collaborator. Both workflow prompts (extraction
//! and recommendation) go through the same [`LlmClient`] trait so
//! tests can substitute a scripted double.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use roomscout_core::config::{LlmConfig, LlmProvider};

const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("llm request failed: {0}")]
    Request(String),
    #[error("llm returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("llm returned an empty completion")]
    EmptyResponse,
}

/// Given a system instruction and a user message, returns free-form
/// completion text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

/// Builds the configured client. The reqwest client carries the
/// configured timeout so a hung collaborator cannot stall a turn
/// indefinitely.
pub fn build_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|error| LlmError::Request(error.to_string()))?;

    match config.provider {
        LlmProvider::Gemini => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| LlmError::Request("gemini api key is not configured".to_string()))?;
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| GEMINI_DEFAULT_BASE_URL.to_string());
            Ok(Arc::new(GeminiClient { http, base_url, model: config.model.clone(), api_key }))
        }
        LlmProvider::Ollama => {
            let base_url = config
                .base_url
                .clone()
                .ok_or_else(|| LlmError::Request("ollama base url is not configured".to_string()))?;
            Ok(Arc::new(OllamaClient { http, base_url, model: config.model.clone() }))
        }
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let body = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: system.to_string() }],
            },
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: user.to_string() }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|error| LlmError::Request(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status: status.as_u16(), body });
        }

        let payload: GeminiResponse =
            response.json().await.map_err(|error| LlmError::Request(error.to_string()))?;

        let text = payload
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let body =
            OllamaRequest { model: &self.model, system, prompt: user, stream: false };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|error| LlmError::Request(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status: status.as_u16(), body });
        }

        let payload: OllamaResponse =
            response.json().await.map_err(|error| LlmError::Request(error.to_string()))?;

        if payload.response.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(payload.response)
    }
}

#[cfg(test)]
mod tests {
    use roomscout_core::config::{LlmConfig, LlmProvider};

    use super::build_client;

    #[test]
    fn gemini_client_requires_an_api_key() {
        let config = LlmConfig {
            provider: LlmProvider::Gemini,
            api_key: None,
            base_url: None,
            model: "gemini-2.0-flash-001".to_string(),
            timeout_secs: 30,
        };
        assert!(build_client(&config).is_err());
    }

    #[test]
    fn ollama_client_requires_a_base_url() {
        let config = LlmConfig {
            provider: LlmProvider::Ollama,
            api_key: None,
            base_url: None,
            model: "llama3.1".to_string(),
            timeout_secs: 30,
        };
        assert!(build_client(&config).is_err());
    }

    #[test]
    fn configured_clients_build() {
        let gemini = LlmConfig {
            provider: LlmProvider::Gemini,
            api_key: Some("test-key".to_string().into()),
            base_url: None,
            model: "gemini-2.0-flash-001".to_string(),
            timeout_secs: 30,
        };
        assert!(build_client(&gemini).is_ok());

        let ollama = LlmConfig {
            provider: LlmProvider::Ollama,
            api_key: None,
            base_url: Some("http://localhost:11434".to_string()),
            model: "llama3.1".to_string(),
            timeout_secs: 30,
        };
        assert!(build_client(&ollama).is_ok());
    }
}
