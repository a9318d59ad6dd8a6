//! User interaction signals and scoped listener registration.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Interaction signals that count as user activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    PointerDown,
    KeyDown,
    Scroll,
}

impl SignalKind {
    pub const ALL: [SignalKind; 3] = [
        SignalKind::PointerDown,
        SignalKind::KeyDown,
        SignalKind::Scroll,
    ];
}

pub type SignalHandler = Arc<dyn Fn(SignalKind) + Send + Sync>;

/// Host facility that delivers interaction signals.
pub trait SignalSource: Send + Sync {
    /// Registers `handler` for `kind`. The handler stays attached until the
    /// returned [`Disposer`] is disposed or dropped.
    fn subscribe(&self, kind: SignalKind, handler: SignalHandler) -> Disposer;
}

/// Runs a cleanup action exactly once, on [`Disposer::dispose`] or on drop.
#[must_use = "dropping a Disposer runs its cleanup immediately"]
pub struct Disposer {
    cleanup: Option<Box<dyn FnOnce() + Send>>,
}

impl Disposer {
    pub fn new(cleanup: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// A disposer with nothing to clean up.
    pub fn noop() -> Self {
        Self { cleanup: None }
    }

    /// Runs the cleanup. Returns `false` if it had already run.
    pub fn dispose(&mut self) -> bool {
        match self.cleanup.take() {
            Some(cleanup) => {
                cleanup();
                true
            }
            None => false,
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.cleanup.is_none()
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// In-process [`SignalSource`] driven by [`LocalSignals::emit`].
#[derive(Clone, Default)]
pub struct LocalSignals {
    registry: Arc<Mutex<Registry>>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<SignalKind, Vec<(u64, SignalHandler)>>,
}

impl LocalSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `kind` to every attached handler and returns how many ran.
    ///
    /// Handlers run outside the registry lock, so they may dispose
    /// registrations, including their own. A handler detached by an earlier
    /// handler of the same emit is skipped. Handlers attached during the
    /// emit first hear the next one.
    pub fn emit(&self, kind: SignalKind) -> usize {
        let handlers: Vec<(u64, SignalHandler)> = self
            .registry
            .lock()
            .listeners
            .get(&kind)
            .map(|list| list.iter().map(|(id, h)| (*id, Arc::clone(h))).collect())
            .unwrap_or_default();

        let mut delivered = 0;
        for (id, handler) in &handlers {
            if !self.is_attached(kind, *id) {
                continue;
            }
            handler(kind);
            delivered += 1;
        }
        delivered
    }

    fn is_attached(&self, kind: SignalKind, id: u64) -> bool {
        self.registry
            .lock()
            .listeners
            .get(&kind)
            .is_some_and(|list| list.iter().any(|(other, _)| *other == id))
    }

    pub fn listener_count(&self, kind: SignalKind) -> usize {
        self.registry
            .lock()
            .listeners
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Attached handlers across all kinds.
    pub fn total_listeners(&self) -> usize {
        self.registry.lock().listeners.values().map(Vec::len).sum()
    }
}

impl SignalSource for LocalSignals {
    fn subscribe(&self, kind: SignalKind, handler: SignalHandler) -> Disposer {
        let id = {
            let mut registry = self.registry.lock();
            registry.next_id += 1;
            let id = registry.next_id;
            registry.listeners.entry(kind).or_default().push((id, handler));
            id
        };

        let registry: Weak<Mutex<Registry>> = Arc::downgrade(&self.registry);
        Disposer::new(move || {
            let Some(registry) = registry.upgrade() else {
                return;
            };
            let mut registry = registry.lock();
            if let Some(list) = registry.listeners.get_mut(&kind) {
                list.retain(|(other, _)| *other != id);
            }
        })
    }
}

impl fmt::Debug for LocalSignals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSignals")
            .field("listeners", &self.total_listeners())
            .finish()
    }
}
