//! Error types for the case-document dashboard
//!
//! This module defines the error taxonomy for every component of the data layer.
//! Fetch failures, decode failures and missing render targets are kept apart so
//! that each artifact cycle can apply its own degradation policy.

use std::path::PathBuf;
use thiserror::Error;

use crate::app::models::ArtifactKind;

/// Artifact fetch errors (network, HTTP status or local file access)
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status
    #[error("Server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Artifact file not found in the data directory
    #[error("Artifact not found: {path}")]
    NotFound { path: PathBuf },

    /// I/O error while reading a local artifact
    #[error("File I/O error")]
    Io(#[from] std::io::Error),

    /// Invalid URL built from the configured base
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Maximum retries exceeded
    #[error("Maximum retry attempts ({max_retries}) exceeded for {url}")]
    MaxRetriesExceeded { max_retries: u32, url: String },
}

impl FetchError {
    /// HTTP status code, when the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Artifact decode errors
///
/// The CSV decoder never raises; only the JSON parser report can fail to decode.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// JSON parsing error
    #[error("JSON parsing error in parser report")]
    Json(#[from] serde_json::Error),
}

/// Failure of a single artifact cycle
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Fetch stage failed
    #[error("failed to fetch artifact: {0}")]
    Fetch(#[from] FetchError),

    /// Decode stage failed
    #[error("failed to decode artifact: {0}")]
    Decode(#[from] DecodeError),

    /// The cycle task terminated without reporting
    #[error("artifact cycle terminated unexpectedly: {reason}")]
    Aborted { reason: String },
}

/// Render surface errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Expected render anchor is absent
    #[error("Render target missing: {target}")]
    TargetMissing { target: String },
}

/// Artifact cycle state machine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CycleError {
    /// Invalid cycle state transition
    #[error("Invalid {kind} cycle transition from {from} to {to}")]
    InvalidTransition {
        kind: ArtifactKind,
        from: String,
        to: String,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// I/O error reading configuration
    #[error("Failed to read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<String> },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Decode error
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Artifact cycle error
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// Render error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Cycle state error
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (a later reload may succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Fetch(FetchError::Http(_))
            | AppError::Fetch(FetchError::MaxRetriesExceeded { .. })
            | AppError::Artifact(ArtifactError::Fetch(FetchError::Http(_)))
            | AppError::Artifact(ArtifactError::Fetch(FetchError::MaxRetriesExceeded {
                ..
            })) => true,

            AppError::Fetch(FetchError::Status { status, .. })
            | AppError::Artifact(ArtifactError::Fetch(FetchError::Status { status, .. })) => {
                *status == 429 || *status >= 500
            }

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => "fetch",
            AppError::Decode(_) => "decode",
            AppError::Artifact(_) => "artifact",
            AppError::Render(_) => "render",
            AppError::Cycle(_) => "cycle",
            AppError::Config(_) => "config",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Decode result type alias
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Render result type alias
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Config result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
