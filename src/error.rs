//! Error types for Daybrief
//!
//! This module defines all error types used throughout the pipeline,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Daybrief operations
///
/// This enum encompasses all possible errors that can occur while loading
/// settings, querying the configuration store, talking to the external data
/// sources, generating advice, and dispatching email.
#[derive(Error, Debug)]
pub enum DaybriefError {
    /// Settings-related errors (missing credentials, malformed file)
    #[error("Settings error: {0}")]
    Settings(String),

    /// Configuration-store errors (the per-user config database)
    #[error("Config store error: {0}")]
    ConfigStore(String),

    /// Source-store query errors (task/event databases)
    #[error("Notion query error: {0}")]
    Notion(String),

    /// Text-generation backend errors (API calls, malformed responses)
    #[error("Generation error: {0}")]
    Generation(String),

    /// Email dispatch errors
    #[error("Email error: {0}")]
    Email(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Daybrief operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
