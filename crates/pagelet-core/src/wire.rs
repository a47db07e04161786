//! Request and response types exchanged with the transport collaborator.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the response header that marks a response as plain.
pub const PLAIN_HEADER: &str = "plain";

/// The only header value that selects raw passthrough.
pub const PLAIN_HEADER_VALUE: &str = "true";

/// Status reported when a response carries no status code.
pub const MISSING_STATUS: u16 = 500;

/// HTTP methods exposed on the `xhr` namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload. Serialized as either a `body` or a `json` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    /// Raw string sent verbatim.
    #[serde(rename = "body")]
    Raw(String),
    /// Structured payload sent as JSON.
    #[serde(rename = "json")]
    Structured(Value),
}

impl Payload {
    /// An empty structured payload (`{}`).
    pub fn empty_structured() -> Self {
        Self::Structured(Value::Object(serde_json::Map::new()))
    }

    /// Encode the payload for writing to a response or socket.
    pub fn into_bytes(self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Self::Raw(text) => Ok(text.into_bytes()),
            Self::Structured(value) => serde_json::to_vec(&value),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Raw(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Raw(text)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

/// A single HTTP request handed to the transport. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: Method,
    /// Target URI.
    pub uri: String,
    /// Either a raw body or a structured payload, never both.
    #[serde(flatten)]
    pub payload: Option<Payload>,
}

impl RequestDescriptor {
    /// Create a descriptor without a payload.
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            payload: None,
        }
    }

    /// Attach a payload.
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// The raw string body, if any.
    pub fn body(&self) -> Option<&str> {
        match &self.payload {
            Some(Payload::Raw(text)) => Some(text),
            _ => None,
        }
    }

    /// The structured payload, if any.
    pub fn json(&self) -> Option<&Value> {
        match &self.payload {
            Some(Payload::Structured(value)) => Some(value),
            _ => None,
        }
    }
}

/// Response body, passed through uninterpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Text(String),
    Json(Value),
}

impl ResponseBody {
    /// The body as text, if it was delivered as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// Decode the body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Self::Text(text) => serde_json::from_str(text),
            Self::Json(value) => T::deserialize(value),
        }
    }
}

impl Default for ResponseBody {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for ResponseBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// An HTTP response as reported by the transport. Read-only to this system.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// The HTTP status code, if the transport reported one.
    pub status: Option<u16>,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: ResponseBody,
}

impl Response {
    /// Create a response with a status code and body.
    pub fn new(status: u16, body: impl Into<ResponseBody>) -> Self {
        Self {
            status: Some(status),
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Create a response that carries no status code.
    pub fn without_status(body: impl Into<ResponseBody>) -> Self {
        Self {
            status: None,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// The status code, with a missing one treated as 500.
    pub fn status_or_default(&self) -> u16 {
        self.status.unwrap_or(MISSING_STATUS)
    }

    /// Check if the status is below 400 (and present).
    pub fn is_ok_status(&self) -> bool {
        matches!(self.status, Some(code) if code < 400)
    }

    /// Get a header value.
    pub fn header(&self, key: &str) -> Option<&str> {
        // Case-insensitive header lookup
        let key_lower = key.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == key_lower)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether the server marked this response as plain.
    pub fn is_plain(&self, header: &str) -> bool {
        self.header(header) == Some(PLAIN_HEADER_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === Descriptor Tests ===

    #[test]
    fn test_descriptor_without_payload() {
        let descriptor = RequestDescriptor::new(Method::Get, "/items");
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value, json!({ "method": "get", "uri": "/items" }));
    }

    #[test]
    fn test_descriptor_raw_payload_uses_body_field() {
        let descriptor =
            RequestDescriptor::new(Method::Post, "/items").with_payload("search".into());
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(
            value,
            json!({ "method": "post", "uri": "/items", "body": "search" })
        );
        assert_eq!(descriptor.body(), Some("search"));
        assert!(descriptor.json().is_none());
    }

    #[test]
    fn test_descriptor_structured_payload_uses_json_field() {
        let descriptor = RequestDescriptor::new(Method::Put, "/items")
            .with_payload(json!({ "data": "query" }).into());
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(
            value,
            json!({ "method": "put", "uri": "/items", "json": { "data": "query" } })
        );
        assert!(descriptor.body().is_none());
    }

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    // === Payload Tests ===

    #[test]
    fn test_payload_into_bytes() {
        assert_eq!(Payload::from("abc").into_bytes().unwrap(), b"abc");
        assert_eq!(
            Payload::from(json!({ "a": 1 })).into_bytes().unwrap(),
            br#"{"a":1}"#
        );
        assert_eq!(Payload::empty_structured().into_bytes().unwrap(), b"{}");
    }

    // === Response Tests ===

    #[test]
    fn test_missing_status_defaults_to_500() {
        let response = Response::without_status("x");
        assert_eq!(response.status_or_default(), 500);
        assert!(!response.is_ok_status());
    }

    #[test]
    fn test_is_ok_status() {
        assert!(Response::new(200, "").is_ok_status());
        assert!(Response::new(399, "").is_ok_status());
        assert!(!Response::new(400, "").is_ok_status());
    }

    #[test]
    fn test_plain_header_requires_exact_true() {
        assert!(Response::new(200, "").with_header("plain", "true").is_plain("plain"));
        assert!(Response::new(200, "").with_header("Plain", "true").is_plain("plain"));
        assert!(!Response::new(200, "").with_header("plain", "TRUE").is_plain("plain"));
        assert!(!Response::new(200, "").with_header("plain", "1").is_plain("plain"));
        assert!(!Response::new(200, "").is_plain("plain"));
    }

    #[test]
    fn test_response_body_json() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Item {
            id: u32,
        }

        let text = ResponseBody::from(r#"{"id": 7}"#);
        assert_eq!(text.json::<Item>().unwrap(), Item { id: 7 });

        let parsed = ResponseBody::from(json!({ "id": 8 }));
        assert_eq!(parsed.json::<Item>().unwrap(), Item { id: 8 });
        assert!(parsed.as_text().is_none());
    }
}
