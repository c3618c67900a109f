//! # rgscan core
//!
//! * [`scanner`]: The scan engine and its stop signal.
//! * [`ports`]: Traits the engine needs from a cloud provider.
//! * [`azure`]: Port implementations backed by the `az` CLI.
//! * [`targets`]: Loading the resource group list.
//! * [`export`]: CSV report writer.

pub mod azure;
pub mod export;
pub mod ports;
pub mod scanner;
pub mod targets;

pub use scanner::{ScanEngine, ScanReport, StopSignal};
