//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod backing_store;
pub mod config;

// Re-export common types
pub use backing_store::{StoreBackend, StoreHandle};
pub use config::ConfigStore;
