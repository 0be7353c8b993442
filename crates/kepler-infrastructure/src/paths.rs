//! Path management for explorer configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/kepler-explorer/   # Config directory
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API key
//! └── logs/                    # Application logs
//!     └── kepler.log.YYYY-MM-DD
//! ```

use kepler_core::config::{GeminiSecret, SecretConfig};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "kepler-explorer";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves the files used by the explorer.
///
/// A base path replaces the platform config directory, which keeps tests
/// inside a temporary directory.
#[derive(Debug, Clone)]
pub struct KeplerPaths {
    base: Option<PathBuf>,
}

impl KeplerPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/kepler-explorer/`
    /// - `Err(PathError::ConfigDirNotFound)`: no platform config directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }

    /// Ensures the secret file exists, creating an empty template if it doesn't.
    ///
    /// On Unix the file is created with mode 600.
    pub fn ensure_secret_file(&self) -> Result<PathBuf, std::io::Error> {
        let secret_path = self
            .secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template_config = SecretConfig {
            gemini: Some(GeminiSecret {
                api_key: String::new(),
            }),
        };
        let template_json = serde_json::to_string_pretty(&template_config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}

impl Default for KeplerPaths {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_config_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = KeplerPaths::new(Some(temp_dir.path()));

        let config_dir = paths.config_dir().unwrap();
        assert_eq!(config_dir, temp_dir.path());
        assert!(paths.config_file().unwrap().ends_with("config.toml"));
        assert!(paths.secret_file().unwrap().starts_with(&config_dir));
        assert!(paths.logs_dir().unwrap().ends_with("logs"));
    }

    #[test]
    fn test_default_dir_is_app_specific() {
        if let Ok(dir) = KeplerPaths::default().config_dir() {
            assert!(dir.ends_with(APP_DIR_NAME));
        }
    }

    #[test]
    fn test_ensure_secret_file_writes_template_once() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = KeplerPaths::new(Some(temp_dir.path()));

        let path = paths.ensure_secret_file().unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("api_key"));

        std::fs::write(&path, r#"{"gemini":{"api_key":"kept"}}"#).unwrap();
        paths.ensure_secret_file().unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("kept"));
    }
}
