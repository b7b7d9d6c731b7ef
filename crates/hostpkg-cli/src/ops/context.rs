//! Shared command context.
//!
//! Groups the state every subcommand needs -- the blocking HTTP client and
//! the output sink -- so commands take one argument instead of threading
//! each piece through separately.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::ui::{self, Reporter};

/// Groups state shared across subcommands.
#[derive(Clone)]
pub struct Context {
    /// The blocking HTTP client used for every network fetch in this process.
    pub client: reqwest::blocking::Client,
    /// Where info/success/warning/error messages are sent.
    pub reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").finish_non_exhaustive()
    }
}

impl Context {
    /// Build the context used by `main`: a fresh HTTP client and the
    /// default stdio-routed reporter.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: hostpkg_core::fetch::client()?,
            reporter: ui::default_reporter(),
        })
    }
}
