//! Domain error types

use thiserror::Error;

use super::value::ValueType;

/// Error when parsing command-line text into a store value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value \"{input}\" for type {expected}. {hint}")]
pub struct ValueParseError {
    pub input: String,
    pub expected: ValueType,
    pub hint: &'static str,
}

/// Error reported by a backing store adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Settings schema \"{0}\" is not installed")]
    SchemaNotInstalled(String),

    #[error("Settings store unavailable: {0}")]
    Unavailable(String),

    #[error("Key '{key}' is not defined by schema \"{schema}\"")]
    UnknownKey { schema: String, key: String },

    #[error("Key '{key}' holds a value of type {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("Key '{key}' holds an unreadable value: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to commit settings: {0}")]
    WriteFailed(String),
}

/// Error reported by the settings facade
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The backing handle could not be opened.
    #[error("Cannot open settings store: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// Staged writes could not be committed. They are still staged.
    #[error("Cannot save settings: {0}")]
    StoreWriteFailed(#[source] StoreError),

    /// A stored value does not have the shape the schema declares.
    #[error("Settings schema violation: {0}")]
    SchemaViolation(#[source] StoreError),
}

impl SettingsError {
    /// Classify an error raised by a read or a staged write.
    pub fn from_access(err: StoreError) -> Self {
        match err {
            StoreError::UnknownKey { .. }
            | StoreError::TypeMismatch { .. }
            | StoreError::InvalidValue { .. } => Self::SchemaViolation(err),
            StoreError::WriteFailed(_) => Self::StoreWriteFailed(err),
            StoreError::SchemaNotInstalled(_) | StoreError::Unavailable(_) => {
                Self::StoreUnavailable(err)
            }
        }
    }
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
