//! Asynchronous fetch plugin for streamed pagelets.
//!
//! The plugin has two halves, wired to the host through its event bus:
//!
//! - **server**: on every class transformation, install a `plain` capability
//!   unless the class already has one. `plain(data)` answers the request
//!   with `data` and marks the response so the client skips rendering.
//! - **client**: on every instance creation, attach an `xhr` namespace with
//!   `get`, `post`, `put` and `delete`. Responses marked plain are handed
//!   back raw; everything else is rendered into the pagelet first.
//!
//! ```ignore
//! use pagelet_xhr::prelude::*;
//!
//! let plugin = XhrPlugin::default();
//! plugin.server(&*bus);
//! plugin.client(&*bus, transport, renderer);
//!
//! // later, for a created pagelet
//! let delivery = pagelet.xhr().unwrap().post("/items", json!({ "q": 1 })).await?;
//! ```

use std::sync::Arc;

use pagelet_client::{FragmentXhrExt, Renderer, Transport, XhrClient};
use pagelet_core::{EventBus, HostEvent, XhrConfig};
use pagelet_server::ResponseShaper;

pub use pagelet_client;
pub use pagelet_core;
pub use pagelet_server;

/// The xhr plugin.
#[derive(Debug, Clone, Default)]
pub struct XhrPlugin {
    config: XhrConfig,
}

impl XhrPlugin {
    /// Plugin name.
    pub const NAME: &'static str = "xhr";

    /// Create a plugin with the given configuration.
    pub fn new(config: XhrConfig) -> Self {
        Self { config }
    }

    /// Plugin configuration.
    pub fn config(&self) -> &XhrConfig {
        &self.config
    }

    /// Install the server half: add `plain` to every transformed class.
    ///
    /// The returned shaper records which classes were seen.
    pub fn server(&self, bus: &dyn EventBus) -> Arc<ResponseShaper> {
        let shaper = Arc::new(ResponseShaper::new(self.config.plain_header.clone()));

        let hook = shaper.clone();
        bus.on(
            &self.config.transform_event,
            Box::new(move |event| {
                if let HostEvent::Transform(class) = event {
                    hook.install(class);
                }
                Ok(())
            }),
        );

        tracing::debug!(plugin = Self::NAME, event = %self.config.transform_event, "server half registered");
        shaper
    }

    /// Install the client half: attach an `xhr` namespace to every created
    /// instance.
    pub fn client(
        &self,
        bus: &dyn EventBus,
        transport: Arc<dyn Transport>,
        renderer: Arc<dyn Renderer>,
    ) {
        let plain_header = self.config.plain_header.clone();

        bus.on(
            &self.config.create_event,
            Box::new(move |event| {
                if let HostEvent::Create(fragment) = event {
                    let client =
                        XhrClient::new(fragment.name().clone(), transport.clone(), renderer.clone())
                            .with_plain_header(plain_header.clone());
                    if !fragment.attach_xhr(client) {
                        tracing::debug!(pagelet = %fragment.name(), "xhr namespace already attached");
                    }
                }
                Ok(())
            }),
        );

        tracing::debug!(plugin = Self::NAME, event = %self.config.create_event, "client half registered");
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::XhrPlugin;
    pub use pagelet_client::*;
    pub use pagelet_core::*;
    pub use pagelet_server::*;
}
