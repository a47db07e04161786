//! The server-side response a fragment writes to.

use async_trait::async_trait;

use crate::error::StreamError;

/// An in-flight HTTP response owned by one fragment instance.
///
/// Headers may be set until the response is ended. Ending writes the body
/// and terminates the response; no further writes are accepted.
#[async_trait]
pub trait ResponseStream: Send {
    /// Set a response header.
    fn set_header(&mut self, name: &str, value: &str) -> Result<(), StreamError>;

    /// Write `body` and terminate the response.
    ///
    /// Once the body has been written the response is ended, even when a
    /// later step such as closing the connection reports an error.
    async fn end(&mut self, body: Vec<u8>) -> Result<(), StreamError>;

    /// Whether the response has been terminated.
    fn is_ended(&self) -> bool;
}
