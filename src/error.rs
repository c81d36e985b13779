// src/error.rs

//! Unified error handling for the asset hunter.

use std::fmt;

use thiserror::Error;

/// Result type alias for asset hunter operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
///
/// Per-call failures of the remote search (transport, protocol, remote code)
/// are not represented here: they are arms of
/// [`QueryOutcome`](crate::services::QueryOutcome) and degrade to an empty
/// result at the client boundary.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV reading/writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Interrupt handler could not be installed
    #[error("Signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The API key was rejected by the permission probe
    #[error("Permission check failed: {message}")]
    Auth { message: String },

    /// A query expression could not be encoded for transport
    #[error("Query encoding failed: {message}")]
    Encoding { message: String },

    /// An output file could not be opened or saved
    #[error("Sink error for {target}: {message}")]
    Sink { target: String, message: String },

    /// The company list could not be read
    #[error("Company source error: {0}")]
    Source(String),

    /// The batch stopped on an unhandled failure
    #[error("Batch aborted after {completed}/{total} companies: {message}")]
    Fatal {
        message: String,
        completed: usize,
        total: usize,
    },
}

impl AppError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a permission error.
    pub fn auth(message: impl fmt::Display) -> Self {
        Self::Auth {
            message: message.to_string(),
        }
    }

    /// Create a query encoding error.
    pub fn encoding(message: impl fmt::Display) -> Self {
        Self::Encoding {
            message: message.to_string(),
        }
    }

    /// Create a sink error with the file it concerns.
    pub fn sink(target: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Sink {
            target: target.into(),
            message: message.to_string(),
        }
    }

    /// Create a company source error.
    pub fn company_source(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }
}
