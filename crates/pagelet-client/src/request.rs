//! Request bodies for POST and PUT.

use pagelet_core::{Method, Payload, RequestDescriptor};
use serde_json::Value;

/// Data supplied to a POST or PUT call.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// Sent verbatim as the request body.
    Raw(String),
    /// Sent as a structured (JSON) payload.
    Structured(Value),
    /// No data supplied. Sent as an empty structured payload (`{}`).
    #[default]
    Empty,
}

impl RequestBody {
    /// Resolve into the payload carried by the request descriptor.
    ///
    /// `Empty` still produces a `json` field; servers may rely on its
    /// presence.
    pub fn into_payload(self) -> Payload {
        match self {
            Self::Raw(text) => Payload::Raw(text),
            Self::Structured(value) => Payload::Structured(value),
            Self::Empty => Payload::empty_structured(),
        }
    }

    /// Build the descriptor for a call with this body.
    pub fn into_descriptor(self, method: Method, uri: impl Into<String>) -> RequestDescriptor {
        RequestDescriptor::new(method, uri).with_payload(self.into_payload())
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        Self::Raw(text.to_string())
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::Raw(text)
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

impl From<()> for RequestBody {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

impl<T: Into<RequestBody>> From<Option<T>> for RequestBody {
    fn from(data: Option<T>) -> Self {
        data.map_or(Self::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_body_sets_body_only() {
        let descriptor = RequestBody::from("search").into_descriptor(Method::Post, "/test");
        assert_eq!(descriptor.body(), Some("search"));
        assert!(descriptor.json().is_none());
    }

    #[test]
    fn test_structured_body_sets_json() {
        let descriptor =
            RequestBody::from(json!({ "data": "query" })).into_descriptor(Method::Put, "/test");
        assert_eq!(descriptor.json(), Some(&json!({ "data": "query" })));
        assert!(descriptor.body().is_none());
    }

    #[test]
    fn test_empty_body_sends_empty_json() {
        let descriptor = RequestBody::Empty.into_descriptor(Method::Post, "/items");
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            json!({ "method": "post", "uri": "/items", "json": {} })
        );
    }

    #[test]
    fn test_json_string_value_is_structured() {
        // A JSON string value is structured data, not a raw body.
        let descriptor =
            RequestBody::from(json!("search")).into_descriptor(Method::Post, "/test");
        assert_eq!(descriptor.json(), Some(&json!("search")));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(RequestBody::from(None::<&str>), RequestBody::Empty);
        assert_eq!(
            RequestBody::from(Some("q")),
            RequestBody::Raw("q".to_string())
        );
        assert_eq!(RequestBody::from(()), RequestBody::default());
    }
}
