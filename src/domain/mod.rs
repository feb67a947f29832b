//! Domain layer - Core value types
//!
//! Contains store values, the settings schema, window geometry,
//! the application identity and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod geometry;
pub mod identity;
pub mod schema;
pub mod value;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use geometry::WindowGeometry;
pub use identity::{AppIdentity, APP_ID, PACKAGE_VERSION};
pub use schema::{keys, Schema};
pub use value::{StoreValue, ValueType};
