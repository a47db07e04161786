//! The HTTP transport collaborator.

use async_trait::async_trait;
use pagelet_core::{RequestDescriptor, Response, TransportError};

/// Performs one HTTP round trip per call.
///
/// Timeouts, if any, are the transport's concern and surface as
/// [`TransportError::Timeout`]. No retries happen above this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `descriptor` and return the server's response.
    async fn request(&self, descriptor: RequestDescriptor) -> Result<Response, TransportError>;
}

