//! Decides whether a fetched response is handed back raw or rendered first.

use std::sync::Arc;

use pagelet_core::{
    FetchError, FetchPhase, FetchTrace, FragmentName, Response, ResponseBody, TransportError,
    PLAIN_HEADER,
};

use crate::render::{RenderCompletion, Renderer};

/// How a successful response reached the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Server marked the response plain; no render happened.
    Plain,
    /// Body was rendered into the pagelet before the caller was notified.
    Rendered,
}

/// A successfully completed fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// The transport's response, unchanged.
    pub response: Response,
    /// How it was delivered.
    pub mode: DeliveryMode,
}

impl Delivery {
    /// The response body.
    pub fn body(&self) -> &ResponseBody {
        &self.response.body
    }
}

/// Result of a fetch operation.
pub type FetchResult = Result<Delivery, FetchError>;

/// Outcome of inspecting a transport result, before any render happens.
#[derive(Debug, PartialEq)]
pub enum Verdict {
    /// Transport error or bad status.
    Failed(FetchError),
    /// Hand the response to the caller as-is.
    Plain(Response),
    /// Render the body, then hand the response to the caller.
    Render(Response),
}

/// Classify a transport result.
///
/// Errors pass through unchanged. A missing status or one >= 400 becomes
/// `FetchError::Status` (a missing status reports 500). Otherwise the
/// response is plain iff `plain_header` is exactly `"true"`.
pub fn classify(result: Result<Response, TransportError>, plain_header: &str) -> Verdict {
    let response = match result {
        Ok(response) => response,
        Err(error) => return Verdict::Failed(error.into()),
    };

    if !response.is_ok_status() {
        return Verdict::Failed(FetchError::Status(response.status_or_default()));
    }

    if response.is_plain(plain_header) {
        Verdict::Plain(response)
    } else {
        Verdict::Render(response)
    }
}

/// Routes transport results for one pagelet.
#[derive(Clone)]
pub struct ResponseClassifier {
    fragment: FragmentName,
    renderer: Arc<dyn Renderer>,
    plain_header: String,
}

impl ResponseClassifier {
    /// Create a classifier for `fragment`.
    pub fn new(fragment: FragmentName, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            fragment,
            renderer,
            plain_header: PLAIN_HEADER.to_string(),
        }
    }

    /// Use a different plain header name.
    pub fn with_plain_header(mut self, header: impl Into<String>) -> Self {
        self.plain_header = header.into();
        self
    }

    /// The pagelet this classifier serves.
    pub fn fragment(&self) -> &FragmentName {
        &self.fragment
    }

    /// Settle a call: fail, deliver raw, or render and then deliver.
    pub async fn settle(
        &self,
        trace: &mut FetchTrace,
        result: Result<Response, TransportError>,
    ) -> FetchResult {
        match classify(result, &self.plain_header) {
            Verdict::Failed(error) => {
                trace.advance(FetchPhase::Failed)?;
                tracing::warn!(pagelet = %self.fragment, error = %error, "fetch failed");
                Err(error)
            }
            Verdict::Plain(response) => {
                trace.advance(FetchPhase::PlainDelivered)?;
                Ok(Delivery {
                    response,
                    mode: DeliveryMode::Plain,
                })
            }
            Verdict::Render(response) => {
                trace.advance(FetchPhase::Rendering)?;

                // The completion exists before the render is triggered, so
                // a synchronous render cannot finish unobserved.
                let (completion, wait) = RenderCompletion::channel(self.fragment.clone());
                self.renderer
                    .render(&self.fragment, response.body.clone(), completion);

                if let Err(error) = wait.wait().await {
                    tracing::warn!(pagelet = %self.fragment, error = %error, "render abandoned");
                    return Err(error);
                }

                trace.advance(FetchPhase::Rendered)?;
                Ok(Delivery {
                    response,
                    mode: DeliveryMode::Rendered,
                })
            }
        }
    }
}
