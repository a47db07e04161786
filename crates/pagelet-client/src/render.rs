//! Hand-off between fetched responses and the host render pipeline.

use std::sync::Arc;

use futures::channel::oneshot;
use pagelet_core::{EventBus, FetchError, FragmentName, ResponseBody};

/// Signals that a render started by the classifier has finished.
///
/// One completion is created per fetch call, before the render is
/// triggered. Dropping it without calling [`complete`](Self::complete)
/// resolves the call with [`FetchError::RenderAbandoned`].
#[derive(Debug)]
pub struct RenderCompletion {
    fragment: FragmentName,
    tx: oneshot::Sender<()>,
}

impl RenderCompletion {
    /// Create a completion and the handle that waits for it.
    pub fn channel(fragment: FragmentName) -> (Self, RenderWait) {
        let (tx, rx) = oneshot::channel();
        let wait = RenderWait {
            fragment: fragment.clone(),
            rx,
        };
        (Self { fragment, tx }, wait)
    }

    /// The pagelet being rendered.
    pub fn fragment(&self) -> &FragmentName {
        &self.fragment
    }

    /// Mark the render as complete.
    pub fn complete(self) {
        // The waiting call may already be gone; nothing to notify then.
        let _ = self.tx.send(());
    }
}

/// Waits for the matching [`RenderCompletion`].
#[derive(Debug)]
pub struct RenderWait {
    fragment: FragmentName,
    rx: oneshot::Receiver<()>,
}

impl RenderWait {
    /// Resolve once the render completes.
    pub async fn wait(self) -> Result<(), FetchError> {
        self.rx
            .await
            .map_err(|_| FetchError::RenderAbandoned(self.fragment))
    }
}

/// The host's render operation.
pub trait Renderer: Send + Sync {
    /// Render `body` into `fragment`, calling `completion.complete()` when done.
    fn render(&self, fragment: &FragmentName, body: ResponseBody, completion: RenderCompletion);
}

/// Function that starts a render on the host.
pub type RenderTrigger = Arc<dyn Fn(&FragmentName, ResponseBody) + Send + Sync>;

/// Renderer for hosts that announce completion on the `<name>:render` bus
/// channel instead of completing a per-call handle.
///
/// A one-time listener is registered on the channel before the render is
/// triggered. The channel is shared by every fetch on the same pagelet, so
/// two overlapping renders of one pagelet may complete each other's calls;
/// serialize fetches per pagelet when both can take the render path.
pub struct BusRenderer {
    bus: Arc<dyn EventBus>,
    trigger: RenderTrigger,
}

impl BusRenderer {
    /// Create a renderer that starts renders with `trigger` and waits on `bus`.
    pub fn new(bus: Arc<dyn EventBus>, trigger: RenderTrigger) -> Self {
        Self { bus, trigger }
    }
}

impl Renderer for BusRenderer {
    fn render(&self, fragment: &FragmentName, body: ResponseBody, completion: RenderCompletion) {
        let mut completion = Some(completion);
        self.bus.once(
            &fragment.render_channel(),
            Box::new(move |event| {
                tracing::trace!(?event, "render completion received");
                if let Some(completion) = completion.take() {
                    completion.complete();
                }
                Ok(())
            }),
        );
        (self.trigger)(fragment, body);
    }
}
