//! # AXIOMA API
//!
//! HTTP backend of the AXIOMA reporting platform. Serves the grouped legal reserve
//! report, indicator search and detail lookups, and per-user favorite indicators.
//!
//! ## Modules
//!
//! - [`config`]: Settings from the environment and dependency initialization
//! - [`auth`]: Identity token verification and authentication middleware
//! - [`server`]: Router, handlers and error responses

pub mod auth;
pub mod config;
pub mod server;

pub use config::{AppConfig, Dependencies};

use axioma_repository::RepositoryError;
use thiserror::Error;

/// Errors that can occur while starting or running the service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Database connection or migration error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Failed to bind or serve the HTTP listener.
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
