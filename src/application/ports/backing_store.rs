//! Backing store port interface
//!
//! A backend opens handles scoped to one schema id. A handle reads and
//! writes typed values and can be switched into delay mode, where writes
//! are staged in an overlay until [`StoreHandle::apply`] commits them.

use crate::domain::error::StoreError;
use crate::domain::value::{StoreValue, ValueType};

/// Port for opening settings handles
pub trait StoreBackend {
    type Handle: StoreHandle;

    /// Open a handle for the schema registered under `schema_id`.
    ///
    /// # Errors
    /// `SchemaNotInstalled` if no such schema was installed,
    /// `Unavailable` if the store cannot be read.
    fn open(&self, schema_id: &str) -> Result<Self::Handle, StoreError>;

    /// Human-readable location of the store (file path, `memory`, ...)
    fn location(&self) -> String;
}

/// Port for one open settings handle
pub trait StoreHandle {
    /// Schema id this handle is scoped to
    fn schema_id(&self) -> &str;

    /// Read `key`: the staged value if any, else the committed value,
    /// else the schema default.
    fn value(&self, key: &str) -> Result<StoreValue, StoreError>;

    /// Write `key`. Staged in delay mode, committed immediately otherwise.
    fn set_value(&mut self, key: &str, value: StoreValue) -> Result<(), StoreError>;

    /// Return `key` to its schema default, with the same staging rules
    /// as [`StoreHandle::set_value`].
    fn reset(&mut self, key: &str) -> Result<(), StoreError>;

    /// Switch to delay mode. Subsequent writes are staged until `apply`.
    fn delay(&mut self);

    fn is_delayed(&self) -> bool;

    /// Commit every staged write as one batch.
    ///
    /// On failure the staged writes are kept so the caller may retry.
    /// With nothing staged this performs no write.
    fn apply(&mut self) -> Result<(), StoreError>;

    /// Discard every staged write.
    fn revert(&mut self);

    /// Whether staged writes are waiting for `apply`
    fn has_unapplied(&self) -> bool;

    fn string(&self, key: &str) -> Result<String, StoreError> {
        match self.value(key)? {
            StoreValue::String(s) => Ok(s),
            other => Err(mismatch(key, ValueType::String, &other)),
        }
    }

    fn boolean(&self, key: &str) -> Result<bool, StoreError> {
        match self.value(key)? {
            StoreValue::Bool(b) => Ok(b),
            other => Err(mismatch(key, ValueType::Bool, &other)),
        }
    }

    fn int_pair(&self, key: &str) -> Result<(i32, i32), StoreError> {
        match self.value(key)? {
            StoreValue::Int32Pair(a, b) => Ok((a, b)),
            other => Err(mismatch(key, ValueType::Int32Pair, &other)),
        }
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_value(key, StoreValue::String(value.to_string()))
    }

    fn set_boolean(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.set_value(key, StoreValue::Bool(value))
    }

    fn set_int_pair(&mut self, key: &str, value: (i32, i32)) -> Result<(), StoreError> {
        self.set_value(key, StoreValue::Int32Pair(value.0, value.1))
    }
}

fn mismatch(key: &str, expected: ValueType, found: &StoreValue) -> StoreError {
    StoreError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.value_type(),
    }
}
