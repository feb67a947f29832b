//! Settings command handler

use thiserror::Error;

use crate::application::ports::{StoreBackend, StoreHandle};
use crate::application::Settings;
use crate::domain::error::{SettingsError, ValueParseError};
use crate::domain::geometry::WindowGeometry;
use crate::domain::value::StoreValue;

use super::args::{PrefKey, PrefsAction};
use super::presenter::Presenter;

/// Errors from settings commands
#[derive(Debug, Error)]
pub enum PrefsCommandError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    InvalidValue(#[from] ValueParseError),

    #[error("'{0}' is read-only; it is recorded when the settings are closed")]
    ReadOnly(&'static str),
}

impl PrefsCommandError {
    /// Whether the error comes from bad user input
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::InvalidValue(_) | Self::ReadOnly(_))
    }
}

/// Handle a settings subcommand against `backend`.
///
/// Every action except `path` opens the settings once, which counts as
/// a launch: the running version is recorded when they close.
pub fn handle_prefs_command<B: StoreBackend>(
    action: PrefsAction,
    backend: &B,
    presenter: &Presenter,
) -> Result<(), PrefsCommandError> {
    if action == PrefsAction::Path {
        presenter.output(&backend.location());
        return Ok(());
    }

    let mut settings = Settings::open(backend)?;

    match action {
        PrefsAction::Status => handle_status(&settings, backend, presenter),
        PrefsAction::Get { key } => {
            let value = read(&settings, key)?;
            presenter.output(&presenter.format_value(&value));
        }
        PrefsAction::Set { key, value } => handle_set(&mut settings, presenter, key, &value)?,
        PrefsAction::List => {
            for key in PrefKey::ALL {
                let value = read(&settings, key)?;
                presenter.key_value(key.key(), &presenter.format_value(&value));
            }
        }
        PrefsAction::Reset => {
            settings.reset_window_state()?;
            settings.save()?;
            presenter.success("Window settings restored to defaults");
        }
        PrefsAction::Path => {}
    }

    settings.close();
    Ok(())
}

fn handle_status<B: StoreBackend>(
    settings: &Settings<B::Handle>,
    backend: &B,
    presenter: &Presenter,
) {
    let identity = settings.identity();
    let last_seen = StoreValue::String(settings.last_seen_version().to_string());

    presenter.key_value("app_id", &identity.app_id);
    presenter.key_value("version", &identity.version);
    presenter.key_value("last_seen_version", &presenter.format_value(&last_seen));
    presenter.key_value("first_run", &settings.is_first_run().to_string());
    presenter.key_value("store", &backend.location());

    if settings.is_first_run() {
        presenter.info(&format!(
            "First launch of {}; it is recorded when the settings close",
            identity.version
        ));
    }
}

fn handle_set<H: StoreHandle>(
    settings: &mut Settings<H>,
    presenter: &Presenter,
    key: PrefKey,
    input: &str,
) -> Result<(), PrefsCommandError> {
    if key.is_read_only() {
        return Err(PrefsCommandError::ReadOnly(key.key()));
    }

    match StoreValue::parse(key.value_type(), input)? {
        StoreValue::Bool(maximized) => settings.set_window_maximized(maximized)?,
        StoreValue::Int32Pair(width, height) => {
            settings.set_window_geometry(&WindowGeometry::from_size(width, height))?
        }
        StoreValue::String(_) => return Err(PrefsCommandError::ReadOnly(key.key())),
    }
    settings.save()?;

    let value = read(settings, key)?;
    presenter.success(&format!("{} = {}", key.key(), presenter.format_value(&value)));
    Ok(())
}

fn read<H: StoreHandle>(
    settings: &Settings<H>,
    key: PrefKey,
) -> Result<StoreValue, SettingsError> {
    Ok(match key {
        PrefKey::Version => StoreValue::String(settings.last_seen_version().to_string()),
        PrefKey::WindowMaximized => StoreValue::Bool(settings.window_maximized()?),
        PrefKey::WindowSize => {
            let (width, height) = settings.window_geometry()?.size();
            StoreValue::Int32Pair(width, height)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::APP_ID;
    use crate::domain::schema::{keys, Schema};
    use crate::infrastructure::MemoryBackend;

    fn backend() -> MemoryBackend {
        MemoryBackend::with_schema(Schema::application())
    }

    #[test]
    fn set_size_commits() {
        let backend = backend();
        handle_prefs_command(
            PrefsAction::Set {
                key: PrefKey::WindowSize,
                value: "1280x720".to_string(),
            },
            &backend,
            &Presenter::new(),
        )
        .unwrap();

        assert_eq!(
            backend.committed(APP_ID, keys::WINDOW_SIZE),
            Some(StoreValue::Int32Pair(1280, 720))
        );
    }

    #[test]
    fn set_flag_normalizes_integers() {
        let backend = backend();
        handle_prefs_command(
            PrefsAction::Set {
                key: PrefKey::WindowMaximized,
                value: "7".to_string(),
            },
            &backend,
            &Presenter::new(),
        )
        .unwrap();

        assert_eq!(
            backend.committed(APP_ID, keys::WINDOW_MAXIMIZED),
            Some(StoreValue::Bool(true))
        );
    }

    #[test]
    fn set_version_is_rejected() {
        let backend = backend();
        let err = handle_prefs_command(
            PrefsAction::Set {
                key: PrefKey::Version,
                value: "9.9.9".to_string(),
            },
            &backend,
            &Presenter::new(),
        )
        .unwrap_err();

        assert!(err.is_usage_error());
        assert_eq!(
            backend.committed(APP_ID, keys::VERSION),
            Some(StoreValue::String(env!("CARGO_PKG_VERSION").to_string()))
        );
    }

    #[test]
    fn bad_value_is_usage_error_and_nothing_is_staged() {
        let backend = backend();
        let err = handle_prefs_command(
            PrefsAction::Set {
                key: PrefKey::WindowSize,
                value: "huge".to_string(),
            },
            &backend,
            &Presenter::new(),
        )
        .unwrap_err();

        assert!(err.is_usage_error());
        assert_eq!(backend.committed(APP_ID, keys::WINDOW_SIZE), None);
    }

    #[test]
    fn path_does_not_open_settings() {
        let backend = backend();
        handle_prefs_command(PrefsAction::Path, &backend, &Presenter::new()).unwrap();
        assert_eq!(backend.commit_count(), 0);
    }

    #[test]
    fn status_marks_version_seen() {
        let backend = backend();
        handle_prefs_command(PrefsAction::Status, &backend, &Presenter::new()).unwrap();
        assert_eq!(
            backend.committed(APP_ID, keys::VERSION),
            Some(StoreValue::String(env!("CARGO_PKG_VERSION").to_string()))
        );
    }

    #[test]
    fn missing_schema_is_settings_error() {
        let backend = MemoryBackend::new();
        let err = handle_prefs_command(PrefsAction::List, &backend, &Presenter::new()).unwrap_err();
        assert!(matches!(
            err,
            PrefsCommandError::Settings(SettingsError::StoreUnavailable(_))
        ));
        assert!(!err.is_usage_error());
    }
}
