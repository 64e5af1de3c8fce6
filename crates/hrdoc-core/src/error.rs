//! Error types for the hrdoc-core library.
//!
//! Field extraction itself never fails: malformed or missing evidence is
//! reported through empty-string sentinels and the `Diversos` document type.
//! These errors only cover the I/O around the engine (configuration files and
//! batch inputs).

use thiserror::Error;

/// Main error type for the hrdoc library.
#[derive(Error, Debug)]
pub enum HrdocError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid batch or document input.
    #[error("invalid input: {0}")]
    Input(String),
}

/// Result type for the hrdoc library.
pub type Result<T> = std::result::Result<T, HrdocError>;
