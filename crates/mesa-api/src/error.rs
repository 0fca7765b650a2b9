//! Error taxonomy shared by every crate in the workspace.
//!
//! Each failure is scoped to the user action that triggered it; none of these
//! are fatal to the process.

use serde::{Deserialize, Serialize};

/// Failure reported by the places provider.
///
/// Zero results is never an error; gateways return an empty list instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum GatewayError {
    #[error("Places API error: {status}{}", detail(.message))]
    Status {
        status: String,
        message: Option<String>,
    },

    #[error("Places request failed: {message}")]
    Transport { message: String },

    #[error("Unexpected Places response: {message}")]
    Decode { message: String },

    #[error("Places gateway is not configured")]
    NotConfigured,
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" ({m})"))
        .unwrap_or_default()
}

/// Failure reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AuthError {
    #[error("Sign-in cancelled")]
    Cancelled,

    #[error("Identity provider error: {message}")]
    Provider { message: String },

    #[error("Identity provider is not configured")]
    Unavailable,
}

/// Failure reading or writing favorites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum PersistenceError {
    #[error("Cloud store unreachable: {message}")]
    Unreachable { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Storage backend error: {message}")]
    Backend { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Local storage error: {message}")]
    Local { message: String },
}

impl PersistenceError {
    pub fn backend(message: impl Into<String>) -> Self {
        PersistenceError::Backend {
            message: message.into(),
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        PersistenceError::Unreachable {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Local {
            message: err.to_string(),
        }
    }
}
