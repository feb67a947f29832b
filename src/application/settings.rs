//! Settings facade
//!
//! Typed access to the application's UI preferences with deferred
//! writes. Reads go straight to the handle (staged values included);
//! every setter is staged and reaches the store only on [`Settings::save`]
//! or at teardown. Teardown runs once, either through [`Settings::close`]
//! or when the value is dropped, and records the running version as seen
//! before the final commit.

use tracing::{debug, info, warn};

use crate::domain::error::SettingsError;
use crate::domain::geometry::WindowGeometry;
use crate::domain::identity::AppIdentity;
use crate::domain::schema::keys;

use super::ports::{StoreBackend, StoreHandle};

/// Application settings bound to one store handle
#[derive(Debug)]
pub struct Settings<H: StoreHandle> {
    handle: H,
    identity: AppIdentity,
    last_seen_version: String,
    first_run: bool,
    closed: bool,
}

impl<H: StoreHandle> Settings<H> {
    /// Open the settings of the running binary.
    pub fn open<B>(backend: &B) -> Result<Self, SettingsError>
    where
        B: StoreBackend<Handle = H>,
    {
        Self::open_as(backend, AppIdentity::current())
    }

    /// Open settings for an explicit application identity.
    ///
    /// Reads the stored version to decide whether this is a first run and
    /// switches the handle into delay mode. Nothing is written here, so
    /// repeated opens keep reporting a first run until a save or teardown
    /// records the version.
    pub fn open_as<B>(backend: &B, identity: AppIdentity) -> Result<Self, SettingsError>
    where
        B: StoreBackend<Handle = H>,
    {
        let mut handle = backend
            .open(&identity.app_id)
            .map_err(SettingsError::StoreUnavailable)?;

        let last_seen_version = handle
            .string(keys::VERSION)
            .map_err(SettingsError::from_access)?;
        let first_run = last_seen_version != identity.version;

        if !handle.is_delayed() {
            handle.delay();
        }

        if first_run {
            info!(
                app_id = %identity.app_id,
                stored = %last_seen_version,
                current = %identity.version,
                "first run of this version"
            );
        }
        debug!(
            schema = handle.schema_id(),
            location = %backend.location(),
            "settings opened"
        );

        Ok(Self {
            handle,
            identity,
            last_seen_version,
            first_run,
            closed: false,
        })
    }

    /// Commit every staged write.
    ///
    /// On failure the staged writes are kept, so a later `save` (or the
    /// teardown) commits them.
    pub fn save(&mut self) -> Result<(), SettingsError> {
        debug_assert!(!self.closed, "settings used after teardown");
        self.handle
            .apply()
            .map_err(SettingsError::StoreWriteFailed)?;
        debug!(app_id = %self.identity.app_id, "settings saved");
        Ok(())
    }

    /// Whether the stored version differed from the running one at open
    pub fn is_first_run(&self) -> bool {
        debug_assert!(!self.closed, "settings used after teardown");
        self.first_run
    }

    /// Version recorded by the last completed run, empty on a fresh install
    pub fn last_seen_version(&self) -> &str {
        &self.last_seen_version
    }

    pub fn identity(&self) -> &AppIdentity {
        &self.identity
    }

    pub fn window_maximized(&self) -> Result<bool, SettingsError> {
        debug_assert!(!self.closed, "settings used after teardown");
        self.handle
            .boolean(keys::WINDOW_MAXIMIZED)
            .map_err(SettingsError::from_access)
    }

    pub fn set_window_maximized(&mut self, maximized: bool) -> Result<(), SettingsError> {
        debug_assert!(!self.closed, "settings used after teardown");
        self.handle
            .set_boolean(keys::WINDOW_MAXIMIZED, maximized)
            .map_err(SettingsError::from_access)
    }

    /// Saved window geometry. The position is not persisted and reads as `-1`.
    pub fn window_geometry(&self) -> Result<WindowGeometry, SettingsError> {
        debug_assert!(!self.closed, "settings used after teardown");
        let (width, height) = self
            .handle
            .int_pair(keys::WINDOW_SIZE)
            .map_err(SettingsError::from_access)?;
        Ok(WindowGeometry::from_size(width, height))
    }

    /// Stage the window size; `x` and `y` are ignored.
    pub fn set_window_geometry(&mut self, geometry: &WindowGeometry) -> Result<(), SettingsError> {
        debug_assert!(!self.closed, "settings used after teardown");
        if geometry.has_position() {
            debug!(x = geometry.x, y = geometry.y, "window position is not persisted");
        }
        self.handle
            .set_int_pair(keys::WINDOW_SIZE, geometry.size())
            .map_err(SettingsError::from_access)
    }

    /// Stage both window keys back to their schema defaults.
    pub fn reset_window_state(&mut self) -> Result<(), SettingsError> {
        debug_assert!(!self.closed, "settings used after teardown");
        self.handle
            .reset(keys::WINDOW_MAXIMIZED)
            .and_then(|()| self.handle.reset(keys::WINDOW_SIZE))
            .map_err(SettingsError::from_access)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.handle.has_unapplied()
    }

    /// Drop every staged write.
    pub fn revert(&mut self) {
        debug_assert!(!self.closed, "settings used after teardown");
        self.handle.revert();
    }

    /// Tear down now instead of at drop.
    pub fn close(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.handle.set_string(keys::VERSION, &self.identity.version) {
            warn!(
                schema = self.handle.schema_id(),
                error = %e,
                "could not record settings version"
            );
        }
        match self.handle.apply() {
            Ok(()) => debug!(schema = self.handle.schema_id(), "settings committed at teardown"),
            // TODO: retry once when the failure looks transient, instead of losing the session's state.
            Err(e) => warn!(
                schema = self.handle.schema_id(),
                error = %e,
                "settings could not be committed at teardown; changes are lost"
            ),
        }
    }
}

impl<H: StoreHandle> Drop for Settings<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
