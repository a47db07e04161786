//! The system-provided `plain` capability.

use async_trait::async_trait;
use pagelet_core::{
    Payload, Renderable, RenderableKind, ResponseStream, StreamError, PLAIN_HEADER,
    PLAIN_HEADER_VALUE,
};

/// Sets `plain: true` on the response, then ends it with the given data.
#[derive(Debug, Clone)]
pub struct DefaultRenderable {
    header: String,
}

impl DefaultRenderable {
    /// Create a renderable that marks responses with `header`.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }

    /// The header this renderable sets.
    pub fn header(&self) -> &str {
        &self.header
    }
}

impl Default for DefaultRenderable {
    fn default() -> Self {
        Self::new(PLAIN_HEADER)
    }
}

#[async_trait]
impl Renderable for DefaultRenderable {
    async fn plain(
        &self,
        response: &mut dyn ResponseStream,
        data: Payload,
    ) -> Result<(), StreamError> {
        let body = data.into_bytes()?;
        response.set_header(&self.header, PLAIN_HEADER_VALUE)?;
        response.end(body).await
    }

    fn kind(&self) -> RenderableKind {
        RenderableKind::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::PlainResponse;

    #[tokio::test]
    async fn test_sets_plain_header_and_ends() {
        let mut response = PlainResponse::new(Vec::<Vec<u8>>::new());

        DefaultRenderable::default()
            .plain(&mut response, "test".into())
            .await
            .unwrap();

        assert_eq!(response.header("plain"), Some("true"));
        assert!(response.is_ended());
        assert_eq!(response.into_inner(), vec![b"test".to_vec()]);
    }

    #[tokio::test]
    async fn test_structured_data_is_json_encoded() {
        let mut response = PlainResponse::new(Vec::<Vec<u8>>::new());

        DefaultRenderable::default()
            .plain(&mut response, serde_json::json!({ "ok": true }).into())
            .await
            .unwrap();

        assert_eq!(response.into_inner(), vec![br#"{"ok":true}"#.to_vec()]);
    }

    #[tokio::test]
    async fn test_custom_header_name() {
        let mut response = PlainResponse::new(Vec::<Vec<u8>>::new());

        DefaultRenderable::new("x-plain")
            .plain(&mut response, "x".into())
            .await
            .unwrap();

        assert_eq!(response.header("x-plain"), Some("true"));
        assert_eq!(response.header("plain"), None);
    }

    #[test]
    fn test_kind_is_default() {
        assert_eq!(DefaultRenderable::default().kind(), RenderableKind::Default);
    }
}
