//! Filesystem-backed services: paths, `config.toml` loading and credential
//! resolution.

pub mod config_service;
pub mod paths;
pub mod secret_service;

pub use crate::config_service::ConfigService;
pub use crate::paths::KeplerPaths;
pub use crate::secret_service::SecretServiceImpl;
