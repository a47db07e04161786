//! Error types shared by the server and client halves.

use crate::fragment::FragmentName;
use crate::lifecycle::FetchPhase;

/// Failure reported by the transport collaborator.
///
/// These are passed through to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Request error: {0}")]
    Request(String),
}

/// Error delivered to the caller of a fetch operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Network or transport failure, unchanged from the collaborator.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Status code >= 400, or a missing status code (reported as 500).
    #[error("Status: {0}")]
    Status(u16),

    /// The renderer dropped its completion handle without signalling.
    #[error("Render of pagelet '{0}' was abandoned before completion")]
    RenderAbandoned(FragmentName),

    #[error("Illegal fetch transition from {from:?} to {to:?}")]
    IllegalTransition { from: FetchPhase, to: FetchPhase },
}

impl FetchError {
    /// Status code carried by a status error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// Error writing to a fragment's response stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("Response already ended")]
    AlreadyEnded,

    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Streaming error: {0}")]
    Sink(String),
}

/// Error from `Fragment::plain`.
#[derive(Debug, thiserror::Error)]
pub enum PlainError {
    #[error("Pagelet class '{0}' has no plain capability installed")]
    NotInstalled(String),

    #[error("Pagelet '{0}' has no active response")]
    NoResponse(FragmentName),

    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Error signalled by a host hook listener.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Listener on '{channel}' failed: {message}")]
pub struct HookError {
    pub channel: String,
    pub message: String,
}

impl HookError {
    /// Create a new hook error.
    pub fn new(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        assert_eq!(FetchError::Status(500).to_string(), "Status: 500");
        assert_eq!(FetchError::Status(404).to_string(), "Status: 404");
    }

    #[test]
    fn test_transport_error_is_transparent() {
        let error = FetchError::from(TransportError::Timeout("30s".to_string()));
        assert_eq!(error.to_string(), "Timeout: 30s");
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(FetchError::Status(503).status(), Some(503));
    }

    #[test]
    fn test_hook_error_display() {
        let error = HookError::new("create", "boom");
        assert_eq!(error.to_string(), "Listener on 'create' failed: boom");
    }
}
