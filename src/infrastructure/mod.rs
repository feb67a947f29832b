//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces:
//! settings stores and the tool configuration file.

pub mod config;
pub mod store;

// Re-export adapters
pub use config::XdgConfigStore;
pub use store::{KeyfileBackend, KeyfileHandle, MemoryBackend, MemoryHandle};
