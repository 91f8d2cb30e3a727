//! Error taxonomy for tool invocations
//!
//! Every failure a caller can observe is one of four kinds. Each maps to a
//! serialisable [`ErrorPayload`] that the protocol adapter returns as the
//! structured part of an error tool result.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for gateway operations
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed or missing input, detected before any network call
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Upstream answered with a non-success status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// No upstream response was available
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Structured error descriptor returned to callers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl GatewayError {
    /// Create validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create upstream error
    pub fn upstream<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Create transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Validation { .. } => "validation_error",
            GatewayError::Upstream { .. } => "upstream_error",
            GatewayError::Transport { .. } => "transport_error",
            GatewayError::Configuration(_) => "configuration_error",
        }
    }

    /// Upstream HTTP status, if the error came from an upstream response
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message without the kind prefix that `Display` adds
    pub fn message(&self) -> String {
        match self {
            GatewayError::Validation { message }
            | GatewayError::Upstream { message, .. }
            | GatewayError::Transport { message } => message.clone(),
            GatewayError::Configuration(e) => e.to_string(),
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            kind: self.kind().to_string(),
            message: self.message(),
            status: self.status(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::transport(e.without_url().to_string())
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
