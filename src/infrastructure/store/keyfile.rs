//! TOML keyfile settings store adapter
//!
//! All schemas share one file, with a table per schema id:
//!
//! ```toml
//! ["io.github.deskprefs.DeskPrefs"]
//! version = "0.1.0"
//! window-maximized = true
//! window-size = [1024, 768]
//! ```
//!
//! Keys absent from the file read as their schema default.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use crate::application::ports::{StoreBackend, StoreHandle};
use crate::domain::error::StoreError;
use crate::domain::schema::Schema;
use crate::domain::value::{StoreValue, ValueType};
use crate::infrastructure::config::app_config_dir;

use super::overlay::{default_of, validate, Overlay, Staged};

/// File name of the settings store inside the config directory
pub const SETTINGS_FILE: &str = "settings.toml";

/// Settings store backed by a TOML file
#[derive(Debug, Clone)]
pub struct KeyfileBackend {
    path: PathBuf,
    schemas: BTreeMap<String, Schema>,
}

impl KeyfileBackend {
    /// Create a store at the default XDG location
    pub fn new() -> Self {
        Self::with_path(Self::default_path())
    }

    /// Create a store at a custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            schemas: BTreeMap::new(),
        }
    }

    /// `$XDG_CONFIG_HOME/deskprefs/settings.toml`
    pub fn default_path() -> PathBuf {
        app_config_dir().join(SETTINGS_FILE)
    }

    /// Install (or replace) a schema
    pub fn install(&mut self, schema: Schema) {
        self.schemas.insert(schema.id().to_string(), schema);
    }

    /// Builder form of [`KeyfileBackend::install`]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.install(schema);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for KeyfileBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreBackend for KeyfileBackend {
    type Handle = KeyfileHandle;

    fn open(&self, schema_id: &str) -> Result<KeyfileHandle, StoreError> {
        let schema = self
            .schemas
            .get(schema_id)
            .cloned()
            .ok_or_else(|| StoreError::SchemaNotInstalled(schema_id.to_string()))?;

        let document = read_document(&self.path).map_err(StoreError::Unavailable)?;
        let committed = section(&document, schema_id).map_err(StoreError::Unavailable)?;

        debug!(
            schema = schema_id,
            path = %self.path.display(),
            keys = committed.len(),
            "opened keyfile settings handle"
        );
        Ok(KeyfileHandle {
            path: self.path.clone(),
            schema,
            committed,
            overlay: Overlay::new(),
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Handle onto one schema table of a [`KeyfileBackend`]
#[derive(Debug)]
pub struct KeyfileHandle {
    path: PathBuf,
    schema: Schema,
    committed: Table,
    overlay: Overlay,
}

impl KeyfileHandle {
    fn write(&mut self, key: &str, write: Staged) -> Result<(), StoreError> {
        debug!(
            schema = self.schema.id(),
            key,
            value = %write,
            delayed = self.overlay.is_delayed(),
            "setting written"
        );
        if self.overlay.is_delayed() {
            self.overlay.stage(key, write);
            return Ok(());
        }
        self.committed = commit(&self.path, self.schema.id(), std::iter::once((key, &write)))?;
        Ok(())
    }
}

impl StoreHandle for KeyfileHandle {
    fn schema_id(&self) -> &str {
        self.schema.id()
    }

    fn value(&self, key: &str) -> Result<StoreValue, StoreError> {
        validate(&self.schema, key, None)?;
        match self.overlay.get(key) {
            Some(Staged::Set(value)) => return Ok(value.clone()),
            Some(Staged::Reset) => return default_of(&self.schema, key),
            None => {}
        }

        match self.committed.get(key) {
            Some(raw) => decode(key, raw),
            None => default_of(&self.schema, key),
        }
    }

    fn set_value(&mut self, key: &str, value: StoreValue) -> Result<(), StoreError> {
        validate(&self.schema, key, Some(&value))?;
        self.write(key, Staged::Set(value))
    }

    fn reset(&mut self, key: &str) -> Result<(), StoreError> {
        validate(&self.schema, key, None)?;
        self.write(key, Staged::Reset)
    }

    fn delay(&mut self) {
        self.overlay.delay();
    }

    fn is_delayed(&self) -> bool {
        self.overlay.is_delayed()
    }

    fn apply(&mut self) -> Result<(), StoreError> {
        if self.overlay.is_empty() {
            return Ok(());
        }
        self.committed = commit(&self.path, self.schema.id(), self.overlay.entries())?;
        debug!(
            schema = self.schema.id(),
            staged = self.overlay.len(),
            path = %self.path.display(),
            "applied staged settings"
        );
        self.overlay.clear();
        Ok(())
    }

    fn revert(&mut self) {
        self.overlay.clear();
    }

    fn has_unapplied(&self) -> bool {
        !self.overlay.is_empty()
    }
}

/// Read the whole file; a missing file is an empty document
fn read_document(path: &Path) -> Result<Table, String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Table::new()),
        Err(e) => return Err(format!("{}: {}", path.display(), e)),
    };
    content
        .parse::<Table>()
        .map_err(|e| format!("{}: {}", path.display(), e))
}

fn section(document: &Table, schema_id: &str) -> Result<Table, String> {
    match document.get(schema_id) {
        None => Ok(Table::new()),
        Some(Value::Table(table)) => Ok(table.clone()),
        Some(_) => Err(format!("entry \"{}\" is not a table", schema_id)),
    }
}

/// Merge `writes` into the schema's table on disk and return the new table.
///
/// The file is re-read first so keys of other schemas, and keys this
/// handle did not touch, keep whatever another writer stored there.
fn commit<'a>(
    path: &Path,
    schema_id: &str,
    writes: impl Iterator<Item = (&'a str, &'a Staged)>,
) -> Result<Table, StoreError> {
    let mut document = read_document(path).map_err(StoreError::WriteFailed)?;
    let mut table = section(&document, schema_id).map_err(StoreError::WriteFailed)?;

    for (key, write) in writes {
        match write {
            Staged::Set(value) => {
                table.insert(key.to_string(), encode(value));
            }
            Staged::Reset => {
                table.remove(key);
            }
        }
    }
    document.insert(schema_id.to_string(), Value::Table(table.clone()));

    let content = toml::to_string_pretty(&document)
        .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
    write_atomically(path, &content)
        .map_err(|e| StoreError::WriteFailed(format!("{}: {}", path.display(), e)))?;

    Ok(table)
}

fn write_atomically(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("toml.tmp");
    {
        let mut file = File::create(&tmp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)
}

fn encode(value: &StoreValue) -> Value {
    match value {
        StoreValue::String(s) => Value::String(s.clone()),
        StoreValue::Bool(b) => Value::Boolean(*b),
        StoreValue::Int32Pair(a, b) => {
            Value::Array(vec![Value::Integer(i64::from(*a)), Value::Integer(i64::from(*b))])
        }
    }
}

fn decode(key: &str, raw: &Value) -> Result<StoreValue, StoreError> {
    let invalid = |message: String| StoreError::InvalidValue {
        key: key.to_string(),
        message,
    };

    match raw {
        Value::String(s) => Ok(StoreValue::String(s.clone())),
        Value::Boolean(b) => Ok(StoreValue::Bool(*b)),
        Value::Array(items) => match items.as_slice() {
            [Value::Integer(a), Value::Integer(b)] => {
                let a = i32::try_from(*a).map_err(|e| invalid(e.to_string()))?;
                let b = i32::try_from(*b).map_err(|e| invalid(e.to_string()))?;
                Ok(StoreValue::Int32Pair(a, b))
            }
            _ => Err(invalid(format!(
                "expected {} as two integers",
                ValueType::Int32Pair
            ))),
        },
        other => Err(invalid(format!("unsupported {} value", other.type_str()))),
    }
}
