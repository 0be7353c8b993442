//! Error types for the Kepler explorer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for configuration, storage and catalog access.
///
/// Failures of the remote conversation service are modelled separately by
/// [`GatewayError`] because callers must tell its variants apart.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum KeplerError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl KeplerError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

impl From<std::io::Error> for KeplerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for KeplerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for KeplerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, KeplerError>`.
pub type Result<T> = std::result::Result<T, KeplerError>;

/// Failures reported by the conversation gateway and its backends.
///
/// The gateway never retries. Each variant maps to one user-facing notice,
/// see [`GatewayError::user_message`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The access credential is absent or was rejected as invalid.
    #[error("credentials missing or invalid: {0}")]
    CredentialsMissing(String),

    /// The remote service signalled throttling or an exhausted quota.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Session construction failed for a reason other than credentials.
    #[error("gateway unavailable: {0}")]
    GatewayUnavailable(String),

    /// Any other failure while exchanging a message.
    #[error("gateway failure: {0}")]
    GatewayFailure(String),
}

impl GatewayError {
    pub fn credentials_missing(message: impl Into<String>) -> Self {
        Self::CredentialsMissing(message.into())
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::GatewayUnavailable(message.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::GatewayFailure(message.into())
    }

    pub fn is_credentials_missing(&self) -> bool {
        matches!(self, Self::CredentialsMissing(_))
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    /// Returns the wording shown to the student for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::CredentialsMissing(_) => {
                "Gemini API Key is not configured or not valid. Please check your API key setup."
            }
            Self::RateLimited(_) => {
                "Mission Command is currently overwhelmed (Rate limit or quota exceeded). Please try again shortly."
            }
            Self::GatewayUnavailable(_) => "Could not establish communication with Mission Command.",
            Self::GatewayFailure(_) => "Mission Command communication failed. Please try again.",
        }
    }
}
