//! Application layer - Settings facade and port interfaces
//!
//! Contains the settings facade and the trait definitions
//! for the stores it talks to.

pub mod ports;
pub mod settings;

pub use settings::Settings;
