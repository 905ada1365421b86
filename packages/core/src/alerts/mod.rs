//! Alert queue.
//!
//! Serialises modal alerts so that at most one is visible while any part
//! of the application may request new ones at any time.
//!
//! - [`factory`] builds normalised requests
//! - [`queue`] holds the active slot and the FIFO of waiting requests
//! - [`listeners`] notifies subscribers of active-slot changes
//! - [`scheduler`] delays promotion after a dismissal
//! - [`manager`] ties them together behind [`AlertManager`]

pub mod factory;
pub mod listeners;
pub mod manager;
pub mod queue;
pub mod scheduler;
pub mod types;

pub use factory::NewAlert;
pub use listeners::Subscription;
pub use manager::{AlertManager, ManagerConfig, QueueSnapshot, WeakAlertManager};
pub use scheduler::DEFAULT_DISMISS_DELAY;
pub use types::*;
