//! Shared state bundled and threaded through every `cmd` implementation.

/// The `Context` struct bundling per-invocation shared state.
pub mod context;

pub use context::Context;
