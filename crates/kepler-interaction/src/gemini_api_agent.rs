//! GeminiApiAgent - Direct REST API implementation for Gemini.
//!
//! The REST endpoint is stateless, so [`GeminiChatSession`] carries the
//! running conversation history client-side and resends it every turn.
//! The API key is resolved once, when a session is opened.

use async_trait::async_trait;
use kepler_core::agent::{ConversationBackend, ConversationSession, SafetySetting, SessionConfig};
use kepler_core::config::GeminiSettings;
use kepler_core::error::GatewayError;
use kepler_core::secret::CredentialService;
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Backend implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiAgent {
    client: Client,
    credentials: Arc<dyn CredentialService>,
    model: String,
    base_url: String,
}

impl GeminiApiAgent {
    /// Creates an agent using the given credential source and settings.
    ///
    /// # Errors
    ///
    /// Returns `GatewayUnavailable` if the HTTP client cannot be built.
    pub fn new(
        credentials: Arc<dyn CredentialService>,
        settings: &GeminiSettings,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|err| GatewayError::unavailable(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            credentials,
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    async fn resolve_api_key(&self) -> Result<String, GatewayError> {
        match self.credentials.api_key().await {
            Ok(Some(key)) => Ok(key),
            Ok(None) => {
                tracing::warn!("[Gemini] API key is not set. API calls will fail.");
                Err(GatewayError::credentials_missing(
                    "Gemini API Key is not configured",
                ))
            }
            Err(err) => Err(GatewayError::unavailable(format!(
                "Failed to load credentials: {err}"
            ))),
        }
    }

    /// Checks the key against the model metadata endpoint so an invalid key
    /// is caught when the session is opened.
    async fn validate_api_key(&self, api_key: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .get(self.model_url())
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|err| {
                GatewayError::unavailable(format!("Gemini API request failed: {}", err.without_url()))
            })?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
        match map_http_error(status, body_text, None) {
            err @ GatewayError::CredentialsMissing(_) => Err(err),
            other => Err(GatewayError::unavailable(other.to_string())),
        }
    }

    async fn send_request(
        &self,
        api_key: &str,
        body: &GenerateContentRequest,
    ) -> Result<ContentResponse, GatewayError> {
        let url = format!("{}:generateContent", self.model_url());

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                GatewayError::failure(format!("Gemini API request failed: {}", err.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::failure(format!("Failed to parse Gemini response: {err}")))?;

        extract_reply(parsed)
    }
}

#[async_trait]
impl ConversationBackend for GeminiApiAgent {
    async fn open_session(
        &self,
        config: SessionConfig,
    ) -> Result<Arc<dyn ConversationSession>, GatewayError> {
        let api_key = self.resolve_api_key().await?;
        self.validate_api_key(&api_key).await?;

        tracing::info!("[Gemini] Chat session opened (model: {})", self.model);
        Ok(Arc::new(GeminiChatSession {
            agent: self.clone(),
            api_key,
            config,
            history: Mutex::new(Vec::new()),
        }))
    }

    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let api_key = self.resolve_api_key().await?;
        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: None,
            safety_settings: None,
            generation_config: GenerationConfig::without_thinking(),
        };
        let reply = self.send_request(&api_key, &request).await?;
        reply.text()
    }
}

/// A conversation whose history is replayed on every request.
pub struct GeminiChatSession {
    agent: GeminiApiAgent,
    api_key: String,
    config: SessionConfig,
    /// Completed turns. Held for the whole exchange so turns never interleave.
    history: Mutex<Vec<Content>>,
}

#[async_trait]
impl ConversationSession for GeminiChatSession {
    async fn send_message(&self, text: &str) -> Result<String, GatewayError> {
        let mut history = self.history.lock().await;

        let mut contents = history.clone();
        contents.push(Content::user(text));

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(SystemInstruction {
                parts: vec![Part {
                    text: self.config.system_instruction.clone(),
                }],
            }),
            safety_settings: Some(self.config.safety_settings.clone()),
            generation_config: GenerationConfig {
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: self.config.thinking_budget,
                }),
            },
        };

        let reply = self.agent.send_request(&self.api_key, &request).await?;
        let reply_text = reply.text()?;

        // Only completed turns enter the history
        history.push(Content::user(text));
        history.push(Content {
            role: "model".to_string(),
            parts: vec![Part {
                text: reply_text.clone(),
            }],
        });

        Ok(reply_text)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    safety_settings: Option<Vec<SafetySetting>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Clone, Debug)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn user(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize, Clone, Debug)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

impl GenerationConfig {
    fn without_thinking() -> Self {
        Self {
            thinking_config: Some(ThinkingConfig { thinking_budget: 0 }),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

impl ContentResponse {
    fn text(&self) -> Result<String, GatewayError> {
        let text: String = self
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            return Err(GatewayError::failure(
                "Gemini API returned no text in the response candidates",
            ));
        }
        Ok(text)
    }
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<i32>,
    message: Option<String>,
    status: Option<String>,
}

fn extract_reply(response: GenerateContentResponse) -> Result<ContentResponse, GatewayError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(GatewayError::failure(format!(
            "Message blocked by safety filter: {reason}"
        )));
    }

    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .ok_or_else(|| {
            GatewayError::failure("Gemini API returned no text in the response candidates")
        })
}

/// Maps a non-success response to the gateway taxonomy.
fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> GatewayError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let lower = message.to_lowercase();

    if status == StatusCode::TOO_MANY_REQUESTS || lower.contains("quota") {
        return match retry_after {
            Some(delay) => GatewayError::rate_limited(format!(
                "{message} (retry after {}s)",
                delay.as_secs()
            )),
            None => GatewayError::rate_limited(message),
        };
    }

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || lower.contains("api key not valid")
    {
        return GatewayError::credentials_missing(message);
    }

    GatewayError::failure(format!("HTTP {}: {message}", status.as_u16()))
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // HTTP-date values are ignored
    value.parse::<u64>().ok().map(Duration::from_secs)
}
