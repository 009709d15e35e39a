//! Error types for the terminal core.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("{operation}: {source}")]
    TerminalConfig {
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("getWindowSize: {reason}")]
    ViewportDiscovery { reason: String },

    #[error("malformed cursor position report: {0:?}")]
    MalformedResponse(String),

    #[error("read: {0}")]
    Read(#[source] io::Error),

    #[error("write: {0}")]
    Write(#[source] io::Error),
}

impl EditorError {
    /// Name of the operation that failed, as shown to the user on exit.
    pub fn operation(&self) -> &'static str {
        match self {
            EditorError::TerminalConfig { operation, .. } => operation,
            EditorError::ViewportDiscovery { .. } | EditorError::MalformedResponse(_) => {
                "getWindowSize"
            }
            EditorError::Read(_) => "read",
            EditorError::Write(_) => "write",
        }
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
