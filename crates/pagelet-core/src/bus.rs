//! Host extension points: hook registration and a pub/sub event bus.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::HookError;
use crate::fragment::{Fragment, FragmentClass, FragmentName};

/// Event emitted by the host on a bus channel.
#[derive(Debug)]
pub enum HostEvent<'a> {
    /// A fragment class finished its transformation pass.
    Transform(&'a mut FragmentClass),
    /// A fragment instance was created.
    Create(&'a mut Fragment),
    /// A fragment finished rendering fetched content.
    Rendered(&'a FragmentName),
}

/// Listener registered on a bus channel.
///
/// Returning an error is the listener's way of failing the host's
/// continuation.
pub type Listener = Box<dyn FnMut(&mut HostEvent<'_>) -> Result<(), HookError> + Send>;

/// The capability interface the plugin needs from the host.
pub trait EventBus: Send + Sync {
    /// Register a listener that runs on every emit of `channel`.
    fn on(&self, channel: &str, listener: Listener);

    /// Register a listener that runs on the next emit of `channel` only.
    fn once(&self, channel: &str, listener: Listener);

    /// Run the listeners registered on `channel`.
    ///
    /// Every listener runs; the first error is returned. On success the
    /// number of listeners invoked is returned.
    fn emit(&self, channel: &str, event: &mut HostEvent<'_>) -> Result<usize, HookError>;
}

struct Registration {
    listener: Listener,
    once: bool,
}

/// In-process event bus.
///
/// Listeners are taken out of the table while they run, so a listener may
/// register further listeners or emit on the bus without deadlocking.
#[derive(Default)]
pub struct LocalBus {
    channels: Mutex<HashMap<String, Vec<Registration>>>,
}

impl LocalBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of listeners currently registered on `channel`.
    pub fn listener_count(&self, channel: &str) -> usize {
        self.lock().get(channel).map_or(0, Vec::len)
    }

    fn register(&self, channel: &str, listener: Listener, once: bool) {
        self.lock()
            .entry(channel.to_string())
            .or_default()
            .push(Registration { listener, once });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Registration>>> {
        // Listeners never run under the lock.
        self.channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventBus for LocalBus {
    fn on(&self, channel: &str, listener: Listener) {
        self.register(channel, listener, false);
    }

    fn once(&self, channel: &str, listener: Listener) {
        self.register(channel, listener, true);
    }

    fn emit(&self, channel: &str, event: &mut HostEvent<'_>) -> Result<usize, HookError> {
        let registrations = match self.lock().get_mut(channel) {
            Some(registrations) => std::mem::take(registrations),
            None => return Ok(0),
        };

        let invoked = registrations.len();
        let mut first_error = None;
        let mut kept = Vec::with_capacity(invoked);

        for mut registration in registrations {
            if let Err(error) = (registration.listener)(event) {
                tracing::warn!(channel, error = %error, "bus listener failed");
                first_error.get_or_insert(error);
            }
            if !registration.once {
                kept.push(registration);
            }
        }

        {
            let mut channels = self.lock();
            let slot = channels.entry(channel.to_string()).or_default();
            // Listeners added while emitting go after the surviving ones.
            let added = std::mem::replace(slot, kept);
            slot.extend(added);
            if slot.is_empty() {
                channels.remove(channel);
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(invoked),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn counter(count: &Arc<AtomicUsize>) -> Listener {
        let count = count.clone();
        Box::new(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn rendered(bus: &LocalBus, channel: &str) -> Result<usize, HookError> {
        let name = FragmentName::new("local");
        bus.emit(channel, &mut HostEvent::Rendered(&name))
    }

    // === Registration Tests ===

    #[test]
    fn test_emit_without_listeners() {
        let bus = LocalBus::new();
        assert_eq!(rendered(&bus, "nothing").unwrap(), 0);
    }

    #[test]
    fn test_on_fires_every_time() {
        let bus = LocalBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        bus.on("create", counter(&count));

        rendered(&bus, "create").unwrap();
        rendered(&bus, "create").unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(bus.listener_count("create"), 1);
    }

    #[test]
    fn test_once_fires_a_single_time() {
        let bus = LocalBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        bus.once("local:render", counter(&count));

        assert_eq!(rendered(&bus, "local:render").unwrap(), 1);
        assert_eq!(rendered(&bus, "local:render").unwrap(), 0);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.listener_count("local:render"), 0);
    }

    #[test]
    fn test_channels_are_isolated() {
        let bus = LocalBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        bus.on("a:render", counter(&count));

        rendered(&bus, "b:render").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    // === Error Tests ===

    #[test]
    fn test_error_is_returned_after_all_listeners_ran() {
        let bus = LocalBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        bus.on("create", Box::new(|_| Err(HookError::new("create", "first"))));
        bus.on("create", counter(&count));

        let err = rendered(&bus, "create").unwrap_err();
        assert_eq!(err.message, "first");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    // === Re-entrancy Tests ===

    #[test]
    fn test_listener_can_register_during_emit() {
        let bus = Arc::new(LocalBus::new());
        let count = Arc::new(AtomicUsize::new(0));

        let inner_bus = bus.clone();
        let inner_count = count.clone();
        bus.once(
            "create",
            Box::new(move |_| {
                inner_bus.once("create", counter(&inner_count));
                Ok(())
            }),
        );

        // The listener added during the first emit only runs on the second.
        assert_eq!(rendered(&bus, "create").unwrap(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(rendered(&bus, "create").unwrap(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_transform_event_mutates_class() {
        let bus = LocalBus::new();
        bus.on(
            "transform",
            Box::new(|event| {
                if let HostEvent::Transform(class) = event {
                    assert_eq!(class.name(), "local");
                }
                Ok(())
            }),
        );

        let mut class = FragmentClass::new("local");
        assert_eq!(bus.emit("transform", &mut HostEvent::Transform(&mut class)).unwrap(), 1);
    }
}
