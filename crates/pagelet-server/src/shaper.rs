//! Install-if-absent registry for the `plain` capability.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use pagelet_core::{ClassId, FragmentClass, Renderable, RenderableKind, PLAIN_HEADER};

use crate::renderable::DefaultRenderable;

/// Installs the `plain` capability on fragment classes.
///
/// Installation never fails and never replaces a capability a class
/// already carries. The variant selected for each class is recorded
/// against its [`ClassId`].
pub struct ResponseShaper {
    default: Arc<DefaultRenderable>,
    installed: Mutex<HashMap<ClassId, RenderableKind>>,
}

impl ResponseShaper {
    /// Create a shaper whose default capability marks responses with `header`.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            default: Arc::new(DefaultRenderable::new(header)),
            installed: Mutex::new(HashMap::new()),
        }
    }

    /// Ensure `class` has a `plain` capability and report which variant it has.
    pub fn install(&self, class: &mut FragmentClass) -> RenderableKind {
        let default: Arc<dyn Renderable> = self.default.clone();
        let kind = if class.install_plain_if_absent(default) {
            RenderableKind::Default
        } else {
            class
                .plain()
                .map_or(RenderableKind::Custom, |plain| plain.kind())
        };

        if self.lock().insert(class.id(), kind).is_none() {
            tracing::debug!(class = class.name(), ?kind, "plain capability selected");
        }
        kind
    }

    /// The variant recorded for a class, if it has been installed.
    pub fn kind_of(&self, id: ClassId) -> Option<RenderableKind> {
        self.lock().get(&id).copied()
    }

    /// Number of classes seen.
    pub fn installed(&self) -> usize {
        self.lock().len()
    }

    /// The capability installed on classes that lack one.
    pub fn default_renderable(&self) -> &Arc<DefaultRenderable> {
        &self.default
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ClassId, RenderableKind>> {
        self.installed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ResponseShaper {
    fn default() -> Self {
        Self::new(PLAIN_HEADER)
    }
}
