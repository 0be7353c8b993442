//! Conversation collaborator interfaces.
//!
//! The hosted chat service is reached only through these traits. The
//! interaction crate provides the Gemini implementation; tests substitute
//! fakes.

use crate::error::GatewayError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Harm categories understood by the safety filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    HarmCategoryHarassment,
    HarmCategoryHateSpeech,
    HarmCategorySexuallyExplicit,
    HarmCategoryDangerousContent,
}

/// Blocking threshold for a harm category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// Fixed configuration supplied when a conversation is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// System-level instruction for the whole conversation.
    pub system_instruction: String,
    pub safety_settings: Vec<SafetySetting>,
    /// Reasoning token budget; zero disables thinking.
    pub thinking_budget: u32,
}

impl SessionConfig {
    /// Creates a configuration with the mission's fixed safety thresholds.
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            safety_settings: Self::mission_safety_settings(),
            thinking_budget: 0,
        }
    }

    /// Blocks medium-and-above for every category. Not configurable.
    pub fn mission_safety_settings() -> Vec<SafetySetting> {
        [
            HarmCategory::HarmCategoryHarassment,
            HarmCategory::HarmCategoryHateSpeech,
            HarmCategory::HarmCategorySexuallyExplicit,
            HarmCategory::HarmCategoryDangerousContent,
        ]
        .into_iter()
        .map(|category| SafetySetting {
            category,
            threshold: HarmBlockThreshold::BlockMediumAndAbove,
        })
        .collect()
    }
}

/// A live conversation with running history.
#[async_trait]
pub trait ConversationSession: Send + Sync {
    /// Sends one turn and returns the reply text.
    ///
    /// Fails with `CredentialsMissing`, `RateLimited` or `GatewayFailure`.
    async fn send_message(&self, text: &str) -> Result<String, GatewayError>;
}

/// Factory for conversations with the hosted service.
#[async_trait]
pub trait ConversationBackend: Send + Sync {
    /// Opens a conversation.
    ///
    /// Fails with `CredentialsMissing` when the credential is absent or
    /// rejected, `GatewayUnavailable` otherwise.
    async fn open_session(
        &self,
        config: SessionConfig,
    ) -> Result<Arc<dyn ConversationSession>, GatewayError>;

    /// Answers a single prompt without any conversation history.
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError>;
}
