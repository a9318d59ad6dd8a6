//! Error types for navigation primitives.

use thiserror::Error;

/// Errors raised when resolving a route to preload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreloadError {
    /// The name does not match any configured route.
    #[error("Unknown route: {0}")]
    UnknownRoute(String),
}

/// Failure reported by a [`ModuleLoader`](crate::ModuleLoader).
#[derive(Debug, Clone, Error)]
#[error("Failed to load module '{module}': {message}")]
pub struct LoadError {
    pub module: String,
    pub message: String,
}

impl LoadError {
    pub fn new(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            message: message.into(),
        }
    }
}
