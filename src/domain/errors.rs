//! Domain error types
//!
//! This module defines the error hierarchy for classroll. Only
//! [`ClassrollError::SourceUnavailable`] and the "no data" outcomes are
//! allowed to reach a caller; malformed join rows and renderer failures are
//! absorbed where they happen. All errors are domain-specific and don't
//! expose third-party types.

use std::fmt;
use thiserror::Error;

/// One of the three logical record stores
///
/// The stores may or may not live on the same physical database server;
/// nothing in the core assumes they do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Store {
    /// Student identity and enrollment status
    Registrar,
    /// Classes, enrollments, attendance marks, grades and submissions
    Teacher,
    /// Accounts and roles
    Login,
}

impl Store {
    /// All stores, in configuration order
    pub const ALL: [Store; 3] = [Store::Registrar, Store::Teacher, Store::Login];

    /// Lowercase store name as used in configuration and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Store::Registrar => "registrar",
            Store::Teacher => "teacher",
            Store::Login => "login",
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main classroll error type
#[derive(Debug, Error)]
pub enum ClassrollError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A record store could not be reached or rejected a query
    #[error("The {store} store is unavailable: {message}")]
    SourceUnavailable { store: Store, message: String },

    /// Request parameters failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// The caller is not allowed to use the portal
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ClassrollError {
    /// Shorthand for a [`ClassrollError::SourceUnavailable`]
    pub fn source_unavailable(store: Store, message: impl Into<String>) -> Self {
        ClassrollError::SourceUnavailable {
            store,
            message: message.into(),
        }
    }

    /// Message safe to show to an end user
    ///
    /// Store errors carry driver details that belong in the logs, not in a
    /// response body.
    pub fn user_message(&self) -> String {
        match self {
            ClassrollError::SourceUnavailable { .. } => {
                "The records service is temporarily unavailable. Please try again later."
                    .to_string()
            }
            ClassrollError::Validation(msg) => msg.clone(),
            ClassrollError::Forbidden(_) => "Only teachers can access this page.".to_string(),
            _ => "An unexpected error occurred.".to_string(),
        }
    }
}

/// Failure of the document-rendering collaborator
///
/// Never surfaced to a caller: the exporter falls back to delimited text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderFailure {
    /// The document description could not be laid out
    #[error("Document layout failed: {0}")]
    Layout(String),

    /// The renderer produced no output
    #[error("Renderer produced an empty document")]
    Empty,

    /// The renderer is not available in this deployment
    #[error("Renderer unavailable: {0}")]
    Unavailable(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for ClassrollError {
    fn from(err: std::io::Error) -> Self {
        ClassrollError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ClassrollError {
    fn from(err: serde_json::Error) -> Self {
        ClassrollError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ClassrollError {
    fn from(err: toml::de::Error) -> Self {
        ClassrollError::Configuration(format!("TOML parse error: {err}"))
    }
}
