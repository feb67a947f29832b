//! Settings schema
//!
//! A schema names the keys a store handle may hold, their types and
//! their default values. Backends must have the schema installed before
//! a handle can be opened for it.

use std::collections::BTreeMap;

use crate::domain::identity::APP_ID;
use crate::domain::value::{StoreValue, ValueType};

/// Keys of the application schema
pub mod keys {
    /// Last package version that ran to completion
    pub const VERSION: &str = "version";
    /// Whether the main window was maximized
    pub const WINDOW_MAXIMIZED: &str = "window-maximized";
    /// Last non-maximized window size as `(width, height)`
    pub const WINDOW_SIZE: &str = "window-size";
}

/// Default window size for a fresh install
pub const DEFAULT_WINDOW_SIZE: (i32, i32) = (800, 600);

/// Key/type/default declarations for one schema id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    id: String,
    defaults: BTreeMap<String, StoreValue>,
}

impl Schema {
    /// Create an empty schema
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            defaults: BTreeMap::new(),
        }
    }

    /// Declare a key; its type is the type of `default`
    pub fn with_key(mut self, key: impl Into<String>, default: StoreValue) -> Self {
        self.defaults.insert(key.into(), default);
        self
    }

    /// The schema of this application, bound to [`APP_ID`]
    pub fn application() -> Self {
        Self::application_for(APP_ID)
    }

    /// The application schema installed under a different id
    pub fn application_for(id: impl Into<String>) -> Self {
        let (width, height) = DEFAULT_WINDOW_SIZE;
        Self::new(id)
            .with_key(keys::VERSION, StoreValue::String(String::new()))
            .with_key(keys::WINDOW_MAXIMIZED, StoreValue::Bool(false))
            .with_key(keys::WINDOW_SIZE, StoreValue::Int32Pair(width, height))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Default value of `key`, if declared
    pub fn default_value(&self, key: &str) -> Option<&StoreValue> {
        self.defaults.get(key)
    }

    /// Declared type of `key`, if declared
    pub fn value_type(&self, key: &str) -> Option<ValueType> {
        self.defaults.get(key).map(StoreValue::value_type)
    }

    /// Declared keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.defaults.keys().map(String::as_str)
    }
}
