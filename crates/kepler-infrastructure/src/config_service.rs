//! Loads `config.toml`.

use crate::paths::KeplerPaths;
use kepler_core::config::AppConfig;
use kepler_core::error::{KeplerError, Result};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Reads application settings and caches them after the first load.
#[derive(Clone)]
pub struct ConfigService {
    paths: KeplerPaths,
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    pub fn new(paths: KeplerPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, loading it on first access.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns a `Serialization` error when the file exists but is malformed,
    /// or `Io` when it cannot be read.
    pub fn get_config(&self) -> Result<AppConfig> {
        if let Some(cached) = self.read_cache()? {
            return Ok(cached);
        }

        let path = self
            .paths
            .config_file()
            .map_err(|e| KeplerError::config(e.to_string()))?;
        let loaded = Self::load_from(&path)?;

        let mut write_lock = self
            .config
            .write()
            .map_err(|e| KeplerError::internal(format!("config cache poisoned: {e}")))?;
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn read_cache(&self) -> Result<Option<AppConfig>> {
        let read_lock = self
            .config
            .read()
            .map_err(|e| KeplerError::internal(format!("config cache poisoned: {e}")))?;
        Ok(read_lock.clone())
    }

    fn load_from(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            tracing::debug!("[Config] {} not found, using defaults", path.display());
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        tracing::info!(
            "[Config] Loaded {} (model: {})",
            path.display(),
            config.gemini.model
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(KeplerPaths::new(Some(temp_dir.path())));

        let config = service.get_config().unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_loads_and_caches_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KeplerPaths::new(Some(temp_dir.path()));
        std::fs::write(
            paths.config_file().unwrap(),
            "[gemini]\nmodel = \"gemini-2.5-flash-lite\"\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let service = ConfigService::new(paths.clone());
        let config = service.get_config().unwrap();
        assert_eq!(config.gemini.model, "gemini-2.5-flash-lite");
        assert_eq!(config.logging.level, "debug");

        // Cached until invalidated
        std::fs::write(paths.config_file().unwrap(), "").unwrap();
        assert_eq!(service.get_config().unwrap().gemini.model, "gemini-2.5-flash-lite");
        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KeplerPaths::new(Some(temp_dir.path()));
        std::fs::write(paths.config_file().unwrap(), "[gemini\nmodel = 3").unwrap();

        let err = ConfigService::new(paths).get_config().unwrap_err();
        assert!(err.is_serialization());
    }
}
