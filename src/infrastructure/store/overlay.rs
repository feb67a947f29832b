//! Staged-write overlay shared by the store adapters

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::error::StoreError;
use crate::domain::schema::Schema;
use crate::domain::value::StoreValue;

/// One pending assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staged {
    Set(StoreValue),
    /// Return to the schema default
    Reset,
}

impl fmt::Display for Staged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set(value) => value.fmt(f),
            Self::Reset => f.write_str("<default>"),
        }
    }
}

/// Pending writes keyed by key; a later stage replaces an earlier one.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    delayed: bool,
    staged: BTreeMap<String, Staged>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(&mut self) {
        self.delayed = true;
    }

    pub fn is_delayed(&self) -> bool {
        self.delayed
    }

    pub fn stage(&mut self, key: &str, write: Staged) {
        self.staged.insert(key.to_string(), write);
    }

    pub fn get(&self, key: &str) -> Option<&Staged> {
        self.staged.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Staged)> {
        self.staged.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn clear(&mut self) {
        self.staged.clear();
    }
}

/// Check that `schema` declares `key`, and with the type of `value` if given.
pub fn validate(schema: &Schema, key: &str, value: Option<&StoreValue>) -> Result<(), StoreError> {
    let declared = schema
        .value_type(key)
        .ok_or_else(|| StoreError::UnknownKey {
            schema: schema.id().to_string(),
            key: key.to_string(),
        })?;

    match value {
        Some(v) if v.value_type() != declared => Err(StoreError::TypeMismatch {
            key: key.to_string(),
            expected: declared,
            found: v.value_type(),
        }),
        _ => Ok(()),
    }
}

/// Schema default of `key`, or `UnknownKey`
pub fn default_of(schema: &Schema, key: &str) -> Result<StoreValue, StoreError> {
    schema
        .default_value(key)
        .cloned()
        .ok_or_else(|| StoreError::UnknownKey {
            schema: schema.id().to_string(),
            key: key.to_string(),
        })
}
