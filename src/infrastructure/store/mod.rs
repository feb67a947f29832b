//! Settings store adapters

pub mod keyfile;
pub mod memory;
mod overlay;

pub use keyfile::{KeyfileBackend, KeyfileHandle};
pub use memory::{MemoryBackend, MemoryHandle};
