//! Per-pagelet `xhr` namespace.

use std::sync::Arc;

use pagelet_core::{FetchTrace, Fragment, FragmentName, Method, RequestDescriptor};

use crate::classifier::{FetchResult, ResponseClassifier};
use crate::render::Renderer;
use crate::request::RequestBody;
use crate::transport::Transport;

/// Asynchronous HTTP operations bound to one pagelet.
///
/// Each operation performs exactly one transport round trip and resolves
/// exactly once: with an error, with the raw response when the server
/// marked it plain, or with the response after the body has been rendered
/// into the pagelet.
#[derive(Clone)]
pub struct XhrClient {
    transport: Arc<dyn Transport>,
    classifier: ResponseClassifier,
}

impl XhrClient {
    /// Create the namespace for `fragment`.
    pub fn new(
        fragment: FragmentName,
        transport: Arc<dyn Transport>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            transport,
            classifier: ResponseClassifier::new(fragment, renderer),
        }
    }

    /// Use a different plain header name.
    pub fn with_plain_header(mut self, header: impl Into<String>) -> Self {
        self.classifier = self.classifier.with_plain_header(header);
        self
    }

    /// The pagelet this namespace belongs to.
    pub fn fragment(&self) -> &FragmentName {
        self.classifier.fragment()
    }

    /// GET `uri`.
    pub async fn get(&self, uri: impl Into<String>) -> FetchResult {
        self.send(RequestDescriptor::new(Method::Get, uri)).await
    }

    /// DELETE `uri`.
    pub async fn delete(&self, uri: impl Into<String>) -> FetchResult {
        self.send(RequestDescriptor::new(Method::Delete, uri)).await
    }

    /// POST `data` to `uri`. Pass `()` to send an empty structured payload.
    pub async fn post(&self, uri: impl Into<String>, data: impl Into<RequestBody>) -> FetchResult {
        let descriptor = data.into().into_descriptor(Method::Post, uri);
        self.send(descriptor).await
    }

    /// PUT `data` to `uri`. Pass `()` to send an empty structured payload.
    pub async fn put(&self, uri: impl Into<String>, data: impl Into<RequestBody>) -> FetchResult {
        let descriptor = data.into().into_descriptor(Method::Put, uri);
        self.send(descriptor).await
    }

    /// Send a prepared descriptor and settle the response.
    pub async fn send(&self, descriptor: RequestDescriptor) -> FetchResult {
        let mut trace = FetchTrace::start(
            self.fragment().clone(),
            descriptor.method,
            descriptor.uri.clone(),
        );
        let result = self.transport.request(descriptor).await;
        self.classifier.settle(&mut trace, result).await
    }
}

impl std::fmt::Debug for XhrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XhrClient")
            .field("fragment", self.fragment())
            .finish()
    }
}

/// Access to the `xhr` namespace attached to a pagelet instance.
pub trait FragmentXhrExt {
    /// The attached namespace, if the instance was created with the plugin.
    fn xhr(&self) -> Option<&XhrClient>;

    /// Attach `client` unless a namespace is already present.
    ///
    /// Returns `true` if `client` was attached.
    fn attach_xhr(&mut self, client: XhrClient) -> bool;
}

impl FragmentXhrExt for Fragment {
    fn xhr(&self) -> Option<&XhrClient> {
        self.extensions().get::<XhrClient>()
    }

    fn attach_xhr(&mut self, client: XhrClient) -> bool {
        if self.xhr().is_some() {
            return false;
        }
        self.extensions_mut().insert(client);
        true
    }
}
