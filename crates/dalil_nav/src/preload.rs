//! Session-once module preloading for likely-next routes.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{LoadError, PreloadError};

/// Routes whose code can be warmed ahead of navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKey {
    ToolDetails,
    Settings,
    Admin,
    Install,
    Index,
}

impl RouteKey {
    pub const ALL: [RouteKey; 5] = [
        RouteKey::ToolDetails,
        RouteKey::Settings,
        RouteKey::Admin,
        RouteKey::Install,
        RouteKey::Index,
    ];

    /// Name of the module that renders this route.
    pub fn module_name(self) -> &'static str {
        match self {
            RouteKey::ToolDetails => "tool-details",
            RouteKey::Settings => "settings",
            RouteKey::Admin => "admin",
            RouteKey::Install => "install",
            RouteKey::Index => "index",
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.module_name())
    }
}

impl FromStr for RouteKey {
    type Err = PreloadError;

    /// Parses a module name such as `tool-details`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.module_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| PreloadError::UnknownRoute(s.to_string()))
    }
}

/// Host facility that loads a code module by name.
pub trait ModuleLoader: Send + Sync + 'static {
    fn load(&self, module: &'static str) -> impl Future<Output = Result<(), LoadError>> + Send;
}

/// Triggers each route's module load at most once per preloader.
///
/// Loads run on the ambient tokio runtime and their outcome is only logged.
/// Cloning shares the set of already-triggered routes.
pub struct ModulePreloader<L> {
    inner: Arc<Inner<L>>,
}

struct Inner<L> {
    loader: L,
    preloaded: Mutex<HashSet<RouteKey>>,
}

impl<L> Clone for ModulePreloader<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L> fmt::Debug for ModulePreloader<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModulePreloader")
            .field("preloaded", &*self.inner.preloaded.lock())
            .finish_non_exhaustive()
    }
}

impl<L: ModuleLoader> ModulePreloader<L> {
    pub fn new(loader: L) -> Self {
        Self {
            inner: Arc::new(Inner {
                loader,
                preloaded: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Starts loading the module for `key` unless it was already triggered.
    ///
    /// Returns whether a load was started. The key is marked before the load
    /// is spawned, so racing calls start exactly one load. A failed load is
    /// not retried here.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn trigger(&self, key: RouteKey) -> bool {
        if !self.inner.preloaded.lock().insert(key) {
            debug!("Module '{}' already preloaded", key);
            return false;
        }

        debug!("Preloading module '{}'", key);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            match inner.loader.load(key.module_name()).await {
                Ok(()) => debug!("Preloaded module '{}'", key),
                Err(e) => warn!("Preload failed, ignoring: {}", e),
            }
        });
        true
    }

    pub fn is_preloaded(&self, key: RouteKey) -> bool {
        self.inner.preloaded.lock().contains(&key)
    }

    /// Handlers for hover and focus hints that warm `key`.
    pub fn preload_handlers(&self, key: RouteKey) -> PreloadHandlers {
        let on_hover = self.clone();
        let on_focus = self.clone();
        PreloadHandlers {
            on_pointer_enter: Box::new(move || {
                on_hover.trigger(key);
            }),
            on_focus: Box::new(move || {
                on_focus.trigger(key);
            }),
        }
    }
}

pub type PreloadHandler = Box<dyn Fn() + Send + Sync>;

/// Event handlers returned by [`ModulePreloader::preload_handlers`].
pub struct PreloadHandlers {
    pub on_pointer_enter: PreloadHandler,
    pub on_focus: PreloadHandler,
}

impl fmt::Debug for PreloadHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreloadHandlers").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tokio::sync::mpsc;

    struct ChannelLoader {
        tx: mpsc::UnboundedSender<&'static str>,
    }

    impl ModuleLoader for ChannelLoader {
        async fn load(&self, module: &'static str) -> Result<(), LoadError> {
            let _ = self.tx.send(module);
            Ok(())
        }
    }

    fn preloader() -> (
        ModulePreloader<ChannelLoader>,
        mpsc::UnboundedReceiver<&'static str>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ModulePreloader::new(ChannelLoader { tx }), rx)
    }

    #[rstest]
    #[case("tool-details", RouteKey::ToolDetails)]
    #[case("Settings", RouteKey::Settings)]
    #[case(" index ", RouteKey::Index)]
    fn route_key_parses_module_names(#[case] input: &str, #[case] expected: RouteKey) {
        assert_eq!(input.parse::<RouteKey>().unwrap(), expected);
    }

    #[test]
    fn unknown_route_is_an_error() {
        assert_eq!(
            "pricing".parse::<RouteKey>(),
            Err(PreloadError::UnknownRoute("pricing".to_string()))
        );
    }

    #[tokio::test]
    async fn trigger_marks_key_synchronously() {
        let (preloader, mut rx) = preloader();

        assert!(preloader.trigger(RouteKey::Admin));
        assert!(preloader.is_preloaded(RouteKey::Admin));
        assert!(!preloader.is_preloaded(RouteKey::Install));

        assert_eq!(rx.recv().await, Some("admin"));
    }

    #[tokio::test]
    async fn handlers_share_the_preloaded_set() {
        let (preloader, mut rx) = preloader();
        let handlers = preloader.preload_handlers(RouteKey::Install);

        (handlers.on_pointer_enter)();
        (handlers.on_focus)();
        (handlers.on_pointer_enter)();

        assert_eq!(rx.recv().await, Some("install"));
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert!(preloader.is_preloaded(RouteKey::Install));
    }
}
