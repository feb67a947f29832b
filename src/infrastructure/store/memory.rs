//! In-memory settings store adapter
//!
//! Clones of a [`MemoryBackend`] share one store, so a value committed
//! through one handle is visible to handles opened later from any clone.
//! The backend also counts committed batches and can be told to fail
//! commits, which makes it the store of choice for exercising the
//! facade's batching behavior.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::application::ports::{StoreBackend, StoreHandle};
use crate::domain::error::StoreError;
use crate::domain::schema::Schema;
use crate::domain::value::StoreValue;

use super::overlay::{default_of, validate, Overlay, Staged};

#[derive(Debug, Default)]
struct MemoryState {
    schemas: BTreeMap<String, Schema>,
    values: BTreeMap<String, BTreeMap<String, StoreValue>>,
    commits: usize,
    failing_commits: usize,
    unavailable: bool,
}

impl MemoryState {
    fn commit<'a>(
        &mut self,
        schema_id: &str,
        writes: impl Iterator<Item = (&'a str, &'a Staged)>,
    ) -> Result<(), StoreError> {
        if self.failing_commits > 0 {
            self.failing_commits -= 1;
            return Err(StoreError::WriteFailed(
                "memory store rejected the commit".to_string(),
            ));
        }

        let values = self.values.entry(schema_id.to_string()).or_default();
        for (key, write) in writes {
            match write {
                Staged::Set(value) => {
                    values.insert(key.to_string(), value.clone());
                }
                Staged::Reset => {
                    values.remove(key);
                }
            }
        }
        self.commits += 1;
        Ok(())
    }
}

/// Process-local settings store
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    /// Create an empty store with no schemas installed
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with `schema` installed
    pub fn with_schema(schema: Schema) -> Self {
        let backend = Self::new();
        backend.install(schema);
        backend
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install (or replace) a schema
    pub fn install(&self, schema: Schema) {
        self.lock().schemas.insert(schema.id().to_string(), schema);
    }

    /// Store a committed value directly, bypassing handles and schema checks
    pub fn seed(&self, schema_id: &str, key: &str, value: StoreValue) {
        self.lock()
            .values
            .entry(schema_id.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Committed value of `key`, ignoring defaults
    pub fn committed(&self, schema_id: &str, key: &str) -> Option<StoreValue> {
        self.lock()
            .values
            .get(schema_id)
            .and_then(|values| values.get(key))
            .cloned()
    }

    /// Number of batches committed so far
    pub fn commit_count(&self) -> usize {
        self.lock().commits
    }

    /// Make the next `n` commits fail with `WriteFailed`
    pub fn fail_next_commits(&self, n: usize) {
        self.lock().failing_commits = n;
    }

    /// Make `open` fail with `Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }
}

impl StoreBackend for MemoryBackend {
    type Handle = MemoryHandle;

    fn open(&self, schema_id: &str) -> Result<MemoryHandle, StoreError> {
        let state = self.lock();
        if state.unavailable {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        let schema = state
            .schemas
            .get(schema_id)
            .cloned()
            .ok_or_else(|| StoreError::SchemaNotInstalled(schema_id.to_string()))?;

        debug!(schema = schema_id, "opened memory settings handle");
        Ok(MemoryHandle {
            state: Arc::clone(&self.state),
            schema,
            overlay: Overlay::new(),
        })
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// Handle onto a [`MemoryBackend`]
#[derive(Debug)]
pub struct MemoryHandle {
    state: Arc<Mutex<MemoryState>>,
    schema: Schema,
    overlay: Overlay,
}

impl MemoryHandle {
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

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
        self.lock()
            .commit(self.schema.id(), std::iter::once((key, &write)))
    }
}

impl StoreHandle for MemoryHandle {
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

        let committed = self
            .lock()
            .values
            .get(self.schema.id())
            .and_then(|values| values.get(key))
            .cloned();
        match committed {
            Some(value) => Ok(value),
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
        let staged = self.overlay.len();
        self.lock()
            .commit(self.schema.id(), self.overlay.entries())?;
        self.overlay.clear();
        debug!(schema = self.schema.id(), staged, "applied staged settings");
        Ok(())
    }

    fn revert(&mut self) {
        self.overlay.clear();
    }

    fn has_unapplied(&self) -> bool {
        !self.overlay.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::keys;

    const ID: &str = "org.example.Memory";

    fn backend() -> MemoryBackend {
        MemoryBackend::with_schema(Schema::application_for(ID))
    }

    #[test]
    fn open_unknown_schema_fails() {
        let backend = MemoryBackend::new();
        assert_eq!(
            backend.open(ID).unwrap_err(),
            StoreError::SchemaNotInstalled(ID.to_string())
        );
    }

    #[test]
    fn open_offline_store_fails() {
        let backend = backend();
        backend.set_unavailable(true);
        assert!(matches!(backend.open(ID), Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn reads_fall_back_to_defaults() {
        let handle = backend().open(ID).unwrap();
        assert_eq!(handle.string(keys::VERSION).unwrap(), "");
        assert!(!handle.boolean(keys::WINDOW_MAXIMIZED).unwrap());
        assert_eq!(handle.int_pair(keys::WINDOW_SIZE).unwrap(), (800, 600));
    }

    #[test]
    fn immediate_mode_commits_each_write() {
        let backend = backend();
        let mut handle = backend.open(ID).unwrap();
        handle.set_boolean(keys::WINDOW_MAXIMIZED, true).unwrap();
        assert_eq!(backend.commit_count(), 1);
        assert_eq!(
            backend.committed(ID, keys::WINDOW_MAXIMIZED),
            Some(StoreValue::Bool(true))
        );
        assert!(!handle.has_unapplied());
    }

    #[test]
    fn delayed_writes_are_visible_through_handle_only() {
        let backend = backend();
        let mut handle = backend.open(ID).unwrap();
        handle.delay();
        handle.set_int_pair(keys::WINDOW_SIZE, (1024, 768)).unwrap();

        assert_eq!(handle.int_pair(keys::WINDOW_SIZE).unwrap(), (1024, 768));
        assert_eq!(backend.committed(ID, keys::WINDOW_SIZE), None);
        assert_eq!(backend.commit_count(), 0);

        handle.apply().unwrap();
        assert_eq!(
            backend.committed(ID, keys::WINDOW_SIZE),
            Some(StoreValue::Int32Pair(1024, 768))
        );
        assert_eq!(backend.commit_count(), 1);
    }

    #[test]
    fn apply_with_nothing_staged_is_not_a_commit() {
        let backend = backend();
        let mut handle = backend.open(ID).unwrap();
        handle.delay();
        handle.apply().unwrap();
        assert_eq!(backend.commit_count(), 0);
    }

    #[test]
    fn failed_apply_keeps_staged_writes() {
        let backend = backend();
        let mut handle = backend.open(ID).unwrap();
        handle.delay();
        handle.set_boolean(keys::WINDOW_MAXIMIZED, true).unwrap();
        backend.fail_next_commits(1);

        assert!(matches!(handle.apply(), Err(StoreError::WriteFailed(_))));
        assert!(handle.has_unapplied());

        handle.apply().unwrap();
        assert!(!handle.has_unapplied());
        assert_eq!(
            backend.committed(ID, keys::WINDOW_MAXIMIZED),
            Some(StoreValue::Bool(true))
        );
    }

    #[test]
    fn reset_removes_committed_value() {
        let backend = backend();
        backend.seed(ID, keys::WINDOW_SIZE, StoreValue::Int32Pair(5, 5));
        let mut handle = backend.open(ID).unwrap();
        handle.delay();
        handle.reset(keys::WINDOW_SIZE).unwrap();

        assert_eq!(handle.int_pair(keys::WINDOW_SIZE).unwrap(), (800, 600));
        handle.apply().unwrap();
        assert_eq!(backend.committed(ID, keys::WINDOW_SIZE), None);
    }

    #[test]
    fn revert_discards_staged_writes() {
        let backend = backend();
        let mut handle = backend.open(ID).unwrap();
        handle.delay();
        handle.set_boolean(keys::WINDOW_MAXIMIZED, true).unwrap();
        handle.revert();
        assert!(!handle.boolean(keys::WINDOW_MAXIMIZED).unwrap());
        assert!(!handle.has_unapplied());
    }

    #[test]
    fn wrong_type_write_is_rejected() {
        let mut handle = backend().open(ID).unwrap();
        assert!(matches!(
            handle.set_boolean(keys::WINDOW_SIZE, true),
            Err(StoreError::TypeMismatch { .. })
        ));
        assert!(matches!(
            handle.set_boolean("window-position", true),
            Err(StoreError::UnknownKey { .. })
        ));
    }

    #[test]
    fn seeded_value_of_wrong_shape_is_a_mismatch() {
        let backend = backend();
        backend.seed(ID, keys::WINDOW_SIZE, StoreValue::String("big".into()));
        let handle = backend.open(ID).unwrap();
        assert!(matches!(
            handle.int_pair(keys::WINDOW_SIZE),
            Err(StoreError::TypeMismatch { .. })
        ));
    }
}
