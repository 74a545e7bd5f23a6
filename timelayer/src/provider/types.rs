//! Provider error types.

use std::fmt;

/// Errors that can occur while fetching tile bytes.
///
/// Any variant is fatal to the run: the archive offers no retry or
/// backoff semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The request could not be sent or its body could not be read.
    Request(String),

    /// The server answered with a non-success status.
    HttpStatus { status: u16, url: String },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Request(msg) => write!(f, "Request failed: {}", msg),
            ProviderError::HttpStatus { status, url } => {
                write!(f, "HTTP {} from {}", status, url)
            }
        }
    }
}

impl std::error::Error for ProviderError {}
