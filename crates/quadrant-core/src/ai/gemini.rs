//! HTTP implementation of the AI boundary for the Gemini REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{truncate, AiBoundary, AiError};
use crate::error::{QuadrantError, Result};

/// Default REST endpoint of the Generative Language API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default model name.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    pub endpoint: String,
    pub model: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
        }
    }
}

/// Talks to `POST {endpoint}/models/{model}:generateContent`.
pub struct GeminiClient {
    config: AiConfig,
    http_client: reqwest::Client,
}

impl GeminiClient {
    /// Creates a client with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns `QuadrantError::Configuration` if the HTTP client cannot be
    /// built.
    pub fn new(config: AiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QuadrantError::Configuration {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Maps a non-success HTTP answer to an [`AiError`].
///
/// 401/403 and 400s mentioning an invalid key are credential failures; every
/// other status is an ordinary, per-request failure.
pub(crate) fn classify_status(status: u16, body: &str) -> AiError {
    let key_problem = body.contains("API_KEY_INVALID")
        || body.contains("API key not valid")
        || body.contains("PERMISSION_DENIED");
    if status == 401 || status == 403 || (status == 400 && key_problem) {
        AiError::InvalidCredential(truncate(body.trim(), 100))
    } else {
        AiError::Status {
            status,
            body: truncate(body.trim(), 200),
        }
    }
}

#[async_trait]
impl AiBoundary for GeminiClient {
    async fn generate(&self, credential: &str, prompt: &str) -> std::result::Result<String, AiError> {
        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {"responseMimeType": "application/json"}
        });

        log::debug!("Sending {} byte prompt to {}", prompt.len(), self.config.model);
        let response = self
            .http_client
            .post(self.url())
            .header("x-goog-api-key", credential)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), &text));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiError::Transport(format!("unreadable response envelope: {e}")))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().map(|part| part.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AiError::EmptyResponse(
                "the model returned no text".to_string(),
            ));
        }
        Ok(text)
    }
}
