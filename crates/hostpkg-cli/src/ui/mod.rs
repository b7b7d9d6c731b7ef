//! The `Reporter` abstraction: decouples engine-level events from how they
//! are printed. Formatting (and any colour, which is explicitly out of
//! scope here) is entirely the implementation's responsibility.

use std::fmt;
use std::sync::Arc;

/// A sink for the four message levels the engine and CLI commands emit.
///
/// `error` is the only level expected to route to the error stream; the
/// other three go to the standard stream (§6).
pub trait Reporter: fmt::Debug + Send + Sync {
    /// A neutral status update.
    fn info(&self, message: &str);
    /// A completed operation.
    fn success(&self, message: &str);
    /// A recoverable condition the user should know about (a cut cycle, a
    /// shadowed dependency, an orphan removed).
    fn warning(&self, message: &str);
    /// A failure. Does not itself terminate the process.
    fn error(&self, message: &str);
}

/// The default [`Reporter`]: routes through `tracing` at matching levels
/// and additionally echoes to stdout/stderr for interactive use, since the
/// CLI is meant to be read without `RUST_LOG` set.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdioReporter;

impl Reporter for StdioReporter {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
        println!("{message}");
    }

    fn success(&self, message: &str) {
        tracing::info!("{message}");
        println!("{message}");
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{message}");
        println!("warning: {message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
        eprintln!("error: {message}");
    }
}

/// Construct the default reporter as a trait object, for storing on [`crate::ops::Context`].
#[must_use]
pub fn default_reporter() -> Arc<dyn Reporter> {
    Arc::new(StdioReporter)
}
