//! # dalil_nav
//!
//! Primitives that warm and gate navigation without blocking the current
//! interaction.
//!
//! - [`ModulePreloader`] triggers each route's module load at most once.
//! - [`IdleActivation`] flips to active on the first [`SignalKind`] or after a
//!   timeout, and never leaks its handlers.
//! - [`Debouncer`] settles rapidly changing values such as search text.
//!
//! All timers and loads run on the ambient tokio runtime.
//!
//! ```rust,ignore
//! let signals = LocalSignals::new();
//! let idle = IdleActivation::new(&signals, DEFAULT_IDLE_TIMEOUT);
//! let mut active = idle.subscribe();
//! active.wait_for(|a| *a).await?;
//! ```

mod debounce;
mod error;
mod idle;
mod preload;
mod signals;

pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use error::{LoadError, PreloadError};
pub use idle::{DEFAULT_IDLE_TIMEOUT, IdleActivation};
pub use preload::{ModuleLoader, ModulePreloader, PreloadHandler, PreloadHandlers, RouteKey};
pub use signals::{Disposer, LocalSignals, SignalHandler, SignalKind, SignalSource};
