//! # rgscan common
//!
//! Shared vocabulary for the scanner workspace.
//!
//! * **[`scan`]**: Targets, check kinds, per-target results and the derived summary.
//! * **[`window`]**: The single "since" boundary shared by every check of a run.
//! * **[`config`]**: Run configuration assembled by the CLI.
//! * **[`error`]**: Fatal error taxonomy.
//!
//! Logging macros ([`info!`], [`success!`], [`warn!`], [`error!`]) wrap `tracing`
//! so every crate emits events the CLI formatter knows how to render.

pub mod config;
pub mod error;
pub mod macros;
pub mod scan;
pub mod window;

#[doc(hidden)]
pub use tracing;
