//! DeskPrefs - deferred-write settings for desktop applications
//!
//! This crate keeps a handful of UI preferences (window size, maximized
//! state, last seen version) in a typed key/value store. Reads are
//! immediate; writes are staged and committed together on an explicit
//! save or when the settings value is torn down.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Store values, schema, geometry, identity and errors
//! - **Application**: The settings facade and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (TOML keyfile, in-memory, XDG config)
//! - **CLI**: Command-line interface for inspecting and editing settings

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

pub use application::Settings;
