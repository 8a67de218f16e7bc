//! Unified error type hierarchy for pprof Dashboard
//!
//! Provides structured error handling with FetchError, ConfigError, CommandError
//! and AppError.

use std::io;
use thiserror::Error;

/// Backend request failures.
///
/// Transport, status and decode failures are kept apart so the results view
/// can show the backend's own body for status errors and a message otherwise.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Request to backend failed: {0}")]
    Transport(String),

    #[error("Backend returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Unexpected response from backend: {0}")]
    Decode(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),
}

impl FetchError {
    /// Text shown in the results view for a failed request.
    ///
    /// Status errors surface the response body verbatim, the rest their message.
    pub fn display_body(&self) -> String {
        match self {
            FetchError::Status { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// Configuration file parsing and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Prompt command parse errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Commands start with ':' (got '{0}')")]
    MissingPrefix(String),

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Invalid filter regex: {0}")]
    InvalidFilter(String),
}

/// Errors from user-triggered actions in the UI
///
/// Provides unified error categorization and user-facing messages.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// File I/O error (read/write/delete)
    #[error("I/O error: {0}")]
    Io(String),

    /// Action not possible in the current state (e.g., nothing to export)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Get a user-facing error message suitable for UI display
    pub fn user_message(&self) -> String {
        match self {
            AppError::Io(msg) => format!("File operation failed: {}", msg),
            AppError::InvalidInput(msg) => format!("Invalid input: {}", msg),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

/// Top-level result type for operations that may fail.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
