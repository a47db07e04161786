//! Sink-backed response stream.

use std::collections::HashMap;
use std::fmt::Display;

use async_trait::async_trait;
use futures::{Sink, SinkExt};
use pagelet_core::{ResponseStream, StreamError};

/// State of the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResponseState {
    /// Headers may still be set.
    Open,
    /// Body written, response terminated.
    Ended,
}

/// A fragment response written to an underlying byte sink.
///
/// Headers are collected until the response is ended; the host reads them
/// with [`PlainResponse::headers`] when it commits the status line.
pub struct PlainResponse<S> {
    inner: S,
    state: ResponseState,
    headers: HashMap<String, String>,
}

impl<S, E> PlainResponse<S>
where
    S: Sink<Vec<u8>, Error = E> + Unpin + Send,
    E: Display,
{
    /// Create a new response over `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            inner: sink,
            state: ResponseState::Open,
            headers: HashMap::new(),
        }
    }
}

impl<S> PlainResponse<S> {
    /// Headers set so far.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Get mutable access to the underlying sink for advanced use.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consume the response and return the inner sink.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[async_trait]
impl<S, E> ResponseStream for PlainResponse<S>
where
    S: Sink<Vec<u8>, Error = E> + Unpin + Send,
    E: Display,
{
    fn set_header(&mut self, name: &str, value: &str) -> Result<(), StreamError> {
        if self.state == ResponseState::Ended {
            return Err(StreamError::AlreadyEnded);
        }
        self.headers.insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn end(&mut self, body: Vec<u8>) -> Result<(), StreamError> {
        if self.state == ResponseState::Ended {
            return Err(StreamError::AlreadyEnded);
        }

        self.inner
            .send(body)
            .await
            .map_err(|e| StreamError::Sink(e.to_string()))?;
        // The body is out; a failed close must not reopen the response.
        self.state = ResponseState::Ended;
        self.inner
            .close()
            .await
            .map_err(|e| StreamError::Sink(e.to_string()))
    }

    fn is_ended(&self) -> bool {
        self.state == ResponseState::Ended
    }
}
