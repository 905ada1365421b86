// Library root; exposes the alert queue and the pieces the demo binary
// wires together so integration tests in `tests/` can reach them.

pub mod alerts;
pub mod metrics;

// Demo harness: configuration, scripted producers and a console renderer.
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod renderer;
pub mod script;

pub use alerts::{AlertManager, ManagerConfig};
