//! One-shot activation on first user interaction or timeout.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::signals::{Disposer, SignalHandler, SignalKind, SignalSource};

/// Timeout used when the host has no preference.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(12);

const IDLE: u8 = 0;
const ACTIVE: u8 = 1;
const DISPOSED: u8 = 2;

/// Flips from inactive to active on the first interaction signal or when the
/// timeout elapses, whichever comes first.
///
/// Activation and disposal are both terminal. Either one detaches every
/// signal handler and cancels the timer exactly once. Dropping the value
/// disposes it.
#[derive(Debug)]
pub struct IdleActivation {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    state: AtomicU8,
    active: watch::Sender<bool>,
    disposers: Mutex<Vec<Disposer>>,
}

impl Shared {
    fn activate(&self, cause: &str) {
        if self
            .state
            .compare_exchange(IDLE, ACTIVE, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        debug!("Activated by {}", cause);
        self.active.send_replace(true);
        self.release();
    }

    fn release(&self) {
        let disposers = std::mem::take(&mut *self.disposers.lock());
        drop(disposers);
    }
}

impl IdleActivation {
    /// Attaches handlers for every [`SignalKind`] and starts the timer.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new<S: SignalSource + ?Sized>(signals: &S, timeout: Duration) -> Self {
        let (active, _) = watch::channel(false);
        let shared = Arc::new(Shared {
            state: AtomicU8::new(IDLE),
            active,
            disposers: Mutex::new(Vec::new()),
        });

        let mut disposers: Vec<Disposer> = SignalKind::ALL
            .into_iter()
            .map(|kind| signals.subscribe(kind, signal_handler(Arc::downgrade(&shared))))
            .collect();

        let timer_target = Arc::downgrade(&shared);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(shared) = timer_target.upgrade() {
                shared.activate("timeout");
            }
        });
        disposers.push(Disposer::new(move || timer.abort()));

        shared.disposers.lock().extend(disposers);
        // A signal may have won before the disposers were stored.
        if shared.state.load(Ordering::Acquire) != IDLE {
            shared.release();
        }

        Self { shared }
    }

    pub fn is_active(&self) -> bool {
        self.shared.state.load(Ordering::Acquire) == ACTIVE
    }

    /// Receiver that observes the transition to active.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shared.active.subscribe()
    }

    /// Detaches everything without activating. No-op once active.
    pub fn dispose(&self) {
        if self
            .shared
            .state
            .compare_exchange(IDLE, DISPOSED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            debug!("Idle activation disposed before activating");
            self.shared.release();
        }
    }
}

impl Drop for IdleActivation {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn signal_handler(target: Weak<Shared>) -> SignalHandler {
    Arc::new(move |kind| {
        if let Some(shared) = target.upgrade() {
            shared.activate(match kind {
                SignalKind::PointerDown => "pointer down",
                SignalKind::KeyDown => "key down",
                SignalKind::Scroll => "scroll",
            });
        }
    })
}
