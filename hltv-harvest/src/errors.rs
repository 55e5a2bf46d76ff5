//! Error types for hltv-harvest.
//!
//! Two failure families matter to the pipeline: transport failures (the site
//! did not hand us a page) and extraction failures (the page did not have the
//! shape we expect). Forfeits, voided maps and unplayed deciders are data,
//! not errors, and never show up here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Convenience result alias.
pub type Result<T, E = HarvestError> = std::result::Result<T, E>;

/// The main error type for harvest operations.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// A page could not be fetched.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// A page did not have the expected structure.
    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarvestError {
    /// Returns the failure kind used in failure records and logs.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::Transport,
            Self::Extraction(_) => FailureKind::Extraction,
            Self::Config(_) | Self::Serialization(_) | Self::Io(_) => FailureKind::Internal,
        }
    }
}

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Non-success HTTP outcome or connection failure.
    Transport,
    /// Missing or malformed page structure.
    Extraction,
    /// Local failure (IO, serialization, config).
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::Extraction => write!(f, "extraction"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Error raised when a page fetch does not succeed.
#[derive(Debug, Clone, Error)]
#[error("Transport error for {url}: {message}")]
pub struct TransportError {
    /// The requested URL.
    pub url: String,
    /// HTTP status if a response was received.
    pub status: Option<u16>,
    /// Human readable reason.
    pub message: String,
}

impl TransportError {
    /// Creates a transport error without a status code.
    #[must_use]
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Creates a transport error for a non-success HTTP status.
    #[must_use]
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status: Some(status),
            message: format!("HTTP status {status}"),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("TransportError"));
        map.insert("url".to_string(), serde_json::json!(self.url));
        if let Some(status) = self.status {
            map.insert("status".to_string(), serde_json::json!(status));
        }
        map.insert("message".to_string(), serde_json::json!(self.message));
        map
    }
}

/// Error raised when an expected structural element is missing or malformed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// A required element was not found.
    #[error("Element not found: {context}")]
    Missing {
        /// What was being looked for.
        context: String,
    },

    /// An element was found but its content could not be interpreted.
    #[error("Invalid value for {context}: '{value}'")]
    Invalid {
        /// What was being parsed.
        context: String,
        /// The offending text.
        value: String,
    },

    /// A CSS selector failed to compile.
    #[error("Invalid selector '{selector}'")]
    Selector {
        /// The selector source.
        selector: String,
    },
}

impl ExtractionError {
    /// Creates a missing element error.
    #[must_use]
    pub fn missing(context: impl Into<String>) -> Self {
        Self::Missing {
            context: context.into(),
        }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid(context: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Invalid {
            context: context.into(),
            value: value.into(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        match self {
            Self::Missing { context } => {
                map.insert("type".to_string(), serde_json::json!("ElementMissing"));
                map.insert("context".to_string(), serde_json::json!(context));
            }
            Self::Invalid { context, value } => {
                map.insert("type".to_string(), serde_json::json!("InvalidValue"));
                map.insert("context".to_string(), serde_json::json!(context));
                map.insert("value".to_string(), serde_json::json!(value));
            }
            Self::Selector { selector } => {
                map.insert("type".to_string(), serde_json::json!("InvalidSelector"));
                map.insert("selector".to_string(), serde_json::json!(selector));
            }
        }
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}
