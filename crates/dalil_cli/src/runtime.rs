//! Bridges the synchronous command handlers onto tokio.

use std::future::Future;

use miette::{IntoDiagnostic, Result};

/// Runs `future` to completion on a fresh single-threaded runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;
    Ok(runtime.block_on(future))
}
