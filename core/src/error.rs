//! Error types for the docs API client.
//!
//! # Design
//! `Api` covers every response whose status differs from the one the caller
//! expected; its message comes from the status table in `status.rs`.
//! `Configuration` is a programming error (an unknown schema type name), not
//! a network condition. Body and envelope problems are reported as-is and
//! never retried.

use thiserror::Error;

/// Errors returned by `DocsClient` and its collaborators.
#[derive(Debug, Error)]
pub enum DocsError {
    /// The server answered with a status other than the expected one.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: &'static str },

    /// No schema type is registered under this name.
    #[error("unknown schema type `{0}`")]
    Configuration(String),

    /// The body was not valid JSON or did not fit the target schema.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The parsed body has no object under the expected envelope key.
    #[error("response has no `{0}` envelope")]
    MissingEnvelope(String),

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// Client configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DocsError {
    /// HTTP status carried by an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            DocsError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DocsError {
    fn from(err: serde_json::Error) -> Self {
        DocsError::Deserialization(err.to_string())
    }
}

pub type Result<T, E = DocsError> = std::result::Result<T, E>;
