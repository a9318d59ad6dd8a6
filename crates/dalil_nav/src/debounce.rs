//! Settling of rapidly changing values.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Quiet period used when the host has no preference.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Publishes the latest source value once it has stayed unchanged for the
/// configured delay.
///
/// Every change cancels the pending timer and schedules a new one, so a burst
/// of changes produces a single settled update carrying the last value.
/// Dropping the debouncer cancels any pending update.
pub struct Debouncer<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    settled: watch::Sender<T>,
}

struct State<T> {
    source: T,
    delay: Duration,
    version: u64,
    pending: Option<JoinHandle<()>>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Starts settled at `initial`.
    pub fn new(initial: T, delay: Duration) -> Self {
        let (settled, _) = watch::channel(initial.clone());
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    source: initial,
                    delay,
                    version: 0,
                    pending: None,
                }),
                settled,
            }),
        }
    }

    /// Feeds a new source value. Equal values are ignored.
    ///
    /// # Panics
    ///
    /// Panics when a timer must be scheduled outside a tokio runtime.
    pub fn set(&self, value: T) {
        let mut state = self.shared.state.lock();
        if state.source == value {
            return;
        }
        state.source = value.clone();
        schedule(&self.shared, &mut state, value);
    }

    /// Changes the quiet period and restarts the wait for the current value.
    pub fn set_delay(&self, delay: Duration) {
        let mut state = self.shared.state.lock();
        if state.delay == delay {
            return;
        }
        state.delay = delay;
        let value = state.source.clone();
        schedule(&self.shared, &mut state, value);
    }

    /// Last settled value.
    pub fn get(&self) -> T {
        self.shared.settled.borrow().clone()
    }

    /// Last value fed to [`Debouncer::set`].
    pub fn source(&self) -> T {
        self.shared.state.lock().source.clone()
    }

    pub fn delay(&self) -> Duration {
        self.shared.state.lock().delay
    }

    /// Whether an update is scheduled but has not settled yet.
    pub fn is_pending(&self) -> bool {
        self.shared.state.lock().pending.is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.shared.settled.subscribe()
    }
}

fn schedule<T>(shared: &Arc<Shared<T>>, state: &mut State<T>, value: T)
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    state.version += 1;
    let version = state.version;
    let delay = state.delay;
    if let Some(previous) = state.pending.take() {
        previous.abort();
    }

    let target: Weak<Shared<T>> = Arc::downgrade(shared);
    state.pending = Some(tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let Some(shared) = target.upgrade() else {
            return;
        };

        let mut state = shared.state.lock();
        // Superseded while waiting for the lock.
        if state.version != version {
            return;
        }
        state.pending = None;
        shared.settled.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
        debug!("Debounced value settled after {:?}", delay);
    }));
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.shared.state.lock().pending.take() {
            pending.abort();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("Debouncer")
            .field("source", &state.source)
            .field("settled", &*self.shared.settled.borrow())
            .field("delay", &state.delay)
            .finish()
    }
}
