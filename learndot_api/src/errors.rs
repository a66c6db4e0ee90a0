//! Error types for the API client.

use std::time::Duration;

/// Errors that can occur when configuring the client or making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No API token could be obtained from the environment or the token file.
    #[error("Credential error: {0}")]
    Credential(String),
    /// The request never produced a response (DNS, connection refused, timeout).
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The backend answered with a status other than 200.
    #[error("Request failed with status {status}: {message}")]
    Backend { status: u16, message: String },
    /// The stage or base URL could not be resolved.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// A caller-supplied entity name or record id cannot form a valid endpoint.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A search or count response was not a JSON page object.
    #[error("Failed to decode response: {0}")]
    Decode(String),
    /// The operation deadline elapsed before the backend finished answering.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(Box::new(e))
    }
}

impl Error {
    /// Returns the HTTP status for backend errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}
