//! Credential service implementation.
//!
//! Resolves the Gemini API key from the environment first and falls back to
//! `secret.json` in the config directory.

use crate::paths::KeplerPaths;
use kepler_core::config::SecretConfig;
use kepler_core::secret::CredentialService;
use std::sync::{Arc, RwLock};

/// Environment variables checked in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Credential service backed by environment variables and `secret.json`.
///
/// The parsed file is cached so repeated lookups do not touch the disk.
#[derive(Clone)]
pub struct SecretServiceImpl {
    paths: KeplerPaths,
    env_vars: Vec<String>,
    /// Cached secret config loaded from disk.
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    pub fn new(paths: KeplerPaths) -> Self {
        Self {
            paths,
            env_vars: API_KEY_ENV_VARS.iter().map(|v| v.to_string()).collect(),
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    /// Replaces the environment variables consulted before the file.
    pub fn with_env_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env_vars = vars.into_iter().map(Into::into).collect();
        self
    }

    fn key_from_env(&self) -> Option<String> {
        self.env_vars.iter().find_map(|name| {
            std::env::var(name)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
    }

    /// Loads the secrets from disk if not already cached.
    fn load_secrets_internal(&self) -> Result<SecretConfig, String> {
        {
            let read_lock = self
                .secrets
                .read()
                .map_err(|_| "secret cache poisoned".to_string())?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let path = self.paths.secret_file().map_err(|e| e.to_string())?;
        let loaded = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            serde_json::from_str::<SecretConfig>(&content)
                .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?
        } else {
            SecretConfig::default()
        };

        {
            let mut write_lock = self
                .secrets
                .write()
                .map_err(|_| "secret cache poisoned".to_string())?;
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }
}

#[async_trait::async_trait]
impl CredentialService for SecretServiceImpl {
    async fn api_key(&self) -> Result<Option<String>, String> {
        if let Some(key) = self.key_from_env() {
            return Ok(Some(key));
        }

        let secrets = self.load_secrets_internal()?;
        Ok(secrets
            .gemini
            .map(|gemini| gemini.api_key.trim().to_string())
            .filter(|key| !key.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service_in(dir: &TempDir, env_var: &str) -> SecretServiceImpl {
        SecretServiceImpl::new(KeplerPaths::new(Some(dir.path()))).with_env_vars([env_var])
    }

    #[tokio::test]
    async fn test_missing_everywhere_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let service = service_in(&temp_dir, "KEPLER_TEST_KEY_UNSET");

        assert_eq!(service.api_key().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reads_secret_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("secret.json"),
            r#"{"gemini": {"api_key": "from-file"}}"#,
        )
        .unwrap();
        let service = service_in(&temp_dir, "KEPLER_TEST_KEY_FILE_ONLY");

        assert_eq!(service.api_key().await.unwrap().as_deref(), Some("from-file"));
    }

    #[tokio::test]
    async fn test_blank_key_in_template_counts_as_missing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KeplerPaths::new(Some(temp_dir.path()));
        paths.ensure_secret_file().unwrap();
        let service = service_in(&temp_dir, "KEPLER_TEST_KEY_TEMPLATE");

        assert_eq!(service.api_key().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_environment_takes_precedence() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("secret.json"),
            r#"{"gemini": {"api_key": "from-file"}}"#,
        )
        .unwrap();
        // Unique name, no other test reads it
        unsafe { std::env::set_var("KEPLER_TEST_KEY_PRECEDENCE", "from-env") };
        let service = service_in(&temp_dir, "KEPLER_TEST_KEY_PRECEDENCE");

        assert_eq!(service.api_key().await.unwrap().as_deref(), Some("from-env"));
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("secret.json"), "{not json").unwrap();
        let service = service_in(&temp_dir, "KEPLER_TEST_KEY_MALFORMED");

        let err = service.api_key().await.unwrap_err();
        assert!(err.contains("Failed to parse"));
        assert!(!err.contains("api_key\":"));
    }
}
