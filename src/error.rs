//! Error types surfaced to the user. None of them is fatal.

use std::fmt;

/// Local validation failures. The request is never sent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),
}

/// Category of a failed send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connection,
    Ssl,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransportErrorKind::Timeout => "Timeout",
            TransportErrorKind::Connection => "Connection error",
            TransportErrorKind::Ssl => "SSL error",
            TransportErrorKind::Other => "Request failed",
        };
        f.write_str(label)
    }
}

/// The request was attempted but no response came back
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        TransportError {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PresetError {
    #[error("Preset not found: {0}")]
    NotFound(String),
}
