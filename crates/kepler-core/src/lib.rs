//! Domain layer of the Kepler-x187 explorer.
//!
//! Holds the compiled-in catalog, transcript and view-state models, the error
//! taxonomy, configuration models and the collaborator traits the interaction
//! layer is written against. This crate performs no I/O.

pub mod agent;
pub mod catalog;
pub mod config;
pub mod error;
pub mod secret;
pub mod session;

// Re-export common error types
pub use error::{GatewayError, KeplerError};
