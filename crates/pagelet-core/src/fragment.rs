//! Pagelet classes, instances and the `plain` capability.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use http::Extensions;
use serde::{Deserialize, Serialize};

use crate::error::{PlainError, StreamError};
use crate::stream::ResponseStream;
use crate::wire::Payload;

/// Suffix of the per-pagelet render completion channel.
pub const RENDER_CHANNEL_SUFFIX: &str = ":render";

/// Stable pagelet name, used as an event channel key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FragmentName(String);

impl FragmentName {
    /// Create a fragment name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bus channel on which the host announces render completion.
    pub fn render_channel(&self) -> String {
        format!("{}{}", self.0, RENDER_CHANNEL_SUFFIX)
    }
}

impl fmt::Display for FragmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FragmentName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FragmentName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Process-unique identity of a fragment class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u64);

impl ClassId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Which variant of the `plain` capability a class carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderableKind {
    /// Provided by the response shaper.
    Default,
    /// Defined by the pagelet author.
    Custom,
}

/// The `plain` capability: answer a request with raw data, skipping the
/// host's templating and flush step.
#[async_trait]
pub trait Renderable: Send + Sync {
    /// Answer `response` with `data`.
    async fn plain(
        &self,
        response: &mut dyn ResponseStream,
        data: Payload,
    ) -> Result<(), StreamError>;

    /// The variant this capability represents.
    fn kind(&self) -> RenderableKind {
        RenderableKind::Custom
    }
}

/// A template from which fragment instances are created.
#[derive(Clone)]
pub struct FragmentClass {
    id: ClassId,
    name: String,
    plain: Option<Arc<dyn Renderable>>,
}

impl FragmentClass {
    /// Define a new class without a `plain` capability.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ClassId::next(),
            name: name.into(),
            plain: None,
        }
    }

    /// Derive a subclass. It inherits the parent's `plain` capability.
    pub fn extend(&self, name: impl Into<String>) -> Self {
        Self {
            id: ClassId::next(),
            name: name.into(),
            plain: self.plain.clone(),
        }
    }

    /// Supply an author-defined `plain` capability.
    pub fn with_plain(mut self, plain: Arc<dyn Renderable>) -> Self {
        self.plain = Some(plain);
        self
    }

    /// Class identity.
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The installed `plain` capability, if any.
    pub fn plain(&self) -> Option<&Arc<dyn Renderable>> {
        self.plain.as_ref()
    }

    /// Install `plain` unless the class already has one.
    ///
    /// Returns `true` if the capability was installed.
    pub fn install_plain_if_absent(&mut self, plain: Arc<dyn Renderable>) -> bool {
        if self.plain.is_some() {
            return false;
        }
        self.plain = Some(plain);
        true
    }
}

impl fmt::Debug for FragmentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentClass")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("plain", &self.plain.as_ref().map(|p| p.kind()))
            .finish()
    }
}

/// A live pagelet instance.
pub struct Fragment {
    name: FragmentName,
    class: Arc<FragmentClass>,
    response: Option<Box<dyn ResponseStream>>,
    extensions: Extensions,
}

impl Fragment {
    /// Instantiate a pagelet from `class`.
    pub fn new(name: impl Into<FragmentName>, class: Arc<FragmentClass>) -> Self {
        Self {
            name: name.into(),
            class,
            response: None,
            extensions: Extensions::new(),
        }
    }

    /// Attach the in-flight response this instance answers.
    pub fn with_response(mut self, response: Box<dyn ResponseStream>) -> Self {
        self.response = Some(response);
        self
    }

    /// Pagelet name.
    pub fn name(&self) -> &FragmentName {
        &self.name
    }

    /// The class this instance was created from.
    pub fn class(&self) -> &Arc<FragmentClass> {
        &self.class
    }

    /// The active response, if any.
    pub fn response(&self) -> Option<&dyn ResponseStream> {
        self.response.as_deref()
    }

    /// Detach the active response.
    pub fn take_response(&mut self) -> Option<Box<dyn ResponseStream>> {
        self.response.take()
    }

    /// Typed per-instance extensions (e.g. the `xhr` namespace).
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable access to the per-instance extensions.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Answer the active response with `data`, bypassing the render step.
    pub async fn plain(&mut self, data: impl Into<Payload>) -> Result<(), PlainError> {
        let plain = self
            .class
            .plain()
            .cloned()
            .ok_or_else(|| PlainError::NotInstalled(self.class.name().to_string()))?;
        let response = self
            .response
            .as_deref_mut()
            .ok_or_else(|| PlainError::NoResponse(self.name.clone()))?;

        plain.plain(response, data.into()).await?;
        Ok(())
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fragment")
            .field("name", &self.name)
            .field("class", &self.class)
            .field("has_response", &self.response.is_some())
            .finish()
    }
}
