//! Settings lifecycle integration tests

use std::fs;
use std::panic::{self, AssertUnwindSafe};

use deskprefs::domain::schema::{keys, Schema};
use deskprefs::domain::value::{parse_flag, StoreValue};
use deskprefs::domain::{AppIdentity, SettingsError, WindowGeometry};
use deskprefs::infrastructure::{KeyfileBackend, MemoryBackend};
use deskprefs::Settings;
use tempfile::TempDir;

const APP: &str = "org.example.Lifecycle";

fn identity(version: &str) -> AppIdentity {
    AppIdentity::new(APP, version)
}

fn memory() -> MemoryBackend {
    MemoryBackend::with_schema(Schema::application_for(APP))
}

fn keyfile(dir: &TempDir) -> KeyfileBackend {
    KeyfileBackend::with_path(dir.path().join("settings.toml"))
        .with_schema(Schema::application_for(APP))
}

#[test]
fn fresh_install() {
    let backend = memory();

    let mut settings = Settings::open_as(&backend, identity("1.0.0")).unwrap();
    assert!(settings.is_first_run());
    assert_eq!(settings.last_seen_version(), "");
    settings.set_window_maximized(true).unwrap();
    drop(settings);

    assert_eq!(
        backend.committed(APP, keys::VERSION),
        Some(StoreValue::String("1.0.0".to_string()))
    );
    assert_eq!(
        backend.committed(APP, keys::WINDOW_MAXIMIZED),
        Some(StoreValue::Bool(true))
    );
}

#[test]
fn repeat_launch() {
    let backend = memory();
    backend.seed(APP, keys::VERSION, StoreValue::String("1.0.0".to_string()));

    let settings = Settings::open_as(&backend, identity("1.0.0")).unwrap();
    assert!(!settings.is_first_run());
}

#[test]
fn upgrade() {
    let backend = memory();
    backend.seed(APP, keys::VERSION, StoreValue::String("0.0.1".to_string()));

    let settings = Settings::open_as(&backend, identity("1.0.0")).unwrap();
    assert!(settings.is_first_run());
    assert_eq!(settings.last_seen_version(), "0.0.1");
    settings.close();

    assert_eq!(
        backend.committed(APP, keys::VERSION),
        Some(StoreValue::String("1.0.0".to_string()))
    );
}

#[test]
fn batching() {
    let backend = memory();
    let mut settings = Settings::open_as(&backend, identity("1.0.0")).unwrap();

    let geometry = WindowGeometry::new(10, 20, 800, 600);
    settings.set_window_geometry(&geometry).unwrap();
    settings.set_window_geometry(&geometry).unwrap();
    settings.set_window_maximized(false).unwrap();
    assert_eq!(backend.commit_count(), 0);

    settings.save().unwrap();
    assert_eq!(backend.commit_count(), 1);
}

#[test]
fn geometry_round_trip() {
    let backend = memory();

    let mut settings = Settings::open_as(&backend, identity("1.0.0")).unwrap();
    settings
        .set_window_geometry(&WindowGeometry::new(5, 5, 1024, 768))
        .unwrap();
    settings.save().unwrap();
    drop(settings);

    let settings = Settings::open_as(&backend, identity("1.0.0")).unwrap();
    assert_eq!(
        settings.window_geometry().unwrap(),
        WindowGeometry::new(-1, -1, 1024, 768)
    );
}

#[test]
fn save_failure_retains_state() {
    let backend = memory();
    let mut settings = Settings::open_as(&backend, identity("1.0.0")).unwrap();
    settings.set_window_maximized(true).unwrap();
    settings
        .set_window_geometry(&WindowGeometry::from_size(640, 480))
        .unwrap();

    backend.fail_next_commits(1);
    assert!(matches!(
        settings.save(),
        Err(SettingsError::StoreWriteFailed(_))
    ));
    assert!(settings.has_unsaved_changes());
    assert_eq!(backend.committed(APP, keys::WINDOW_MAXIMIZED), None);

    settings.save().unwrap();
    assert_eq!(
        backend.committed(APP, keys::WINDOW_MAXIMIZED),
        Some(StoreValue::Bool(true))
    );
    assert_eq!(
        backend.committed(APP, keys::WINDOW_SIZE),
        Some(StoreValue::Int32Pair(640, 480))
    );
}

#[test]
fn unavailable_store_fails_open() {
    let backend = memory();
    backend.set_unavailable(true);
    assert!(matches!(
        Settings::open_as(&backend, identity("1.0.0")),
        Err(SettingsError::StoreUnavailable(_))
    ));
}

#[test]
fn setters_leave_file_untouched_until_save() {
    let dir = TempDir::new().unwrap();
    let backend = keyfile(&dir);
    let path = dir.path().join("settings.toml");

    // Commit something first so there is a file to compare against.
    Settings::open_as(&backend, identity("1.0.0")).unwrap().close();
    let before = fs::read(&path).unwrap();

    let mut settings = Settings::open_as(&backend, identity("1.0.0")).unwrap();
    settings.set_window_maximized(true).unwrap();
    settings
        .set_window_geometry(&WindowGeometry::new(1, 2, 300, 200))
        .unwrap();
    settings.set_window_maximized(false).unwrap();
    assert_eq!(fs::read(&path).unwrap(), before);

    settings.save().unwrap();
    assert_ne!(fs::read(&path).unwrap(), before);
}

#[test]
fn save_is_visible_to_a_fresh_facade() {
    let dir = TempDir::new().unwrap();
    let backend = keyfile(&dir);

    let mut settings = Settings::open_as(&backend, identity("1.0.0")).unwrap();
    settings.set_window_maximized(true).unwrap();
    settings.save().unwrap();

    // Opened while the first facade is still alive; version not yet recorded.
    let other = Settings::open_as(&backend, identity("1.0.0")).unwrap();
    assert!(other.window_maximized().unwrap());
    assert!(other.is_first_run());
    drop(other);
    drop(settings);
}

#[test]
fn teardown_is_visible_to_next_launch() {
    let dir = TempDir::new().unwrap();
    let backend = keyfile(&dir);

    let mut settings = Settings::open_as(&backend, identity("2.1.0")).unwrap();
    assert!(settings.is_first_run());
    settings
        .set_window_geometry(&WindowGeometry::from_size(1440, 900))
        .unwrap();
    settings.set_window_maximized(true).unwrap();
    drop(settings);

    let settings = Settings::open_as(&backend, identity("2.1.0")).unwrap();
    assert!(!settings.is_first_run());
    assert_eq!(settings.last_seen_version(), "2.1.0");
    assert!(settings.window_maximized().unwrap());
    assert_eq!(settings.window_geometry().unwrap().size(), (1440, 900));
}

#[test]
fn first_run_survives_opens_without_teardown() {
    let backend = memory();
    let first = Settings::open_as(&backend, identity("1.0.0")).unwrap();
    let second = Settings::open_as(&backend, identity("1.0.0")).unwrap();
    assert!(first.is_first_run());
    assert!(second.is_first_run());
}

#[test]
fn idempotent_save() {
    let dir = TempDir::new().unwrap();
    let backend = keyfile(&dir);
    let path = dir.path().join("settings.toml");

    let mut settings = Settings::open_as(&backend, identity("1.0.0")).unwrap();
    settings.set_window_maximized(true).unwrap();
    settings.save().unwrap();
    let once = fs::read(&path).unwrap();
    settings.save().unwrap();
    assert_eq!(fs::read(&path).unwrap(), once);

    let store = memory();
    let mut settings = Settings::open_as(&store, identity("1.0.0")).unwrap();
    settings.set_window_maximized(true).unwrap();
    settings.save().unwrap();
    settings.save().unwrap();
    assert_eq!(store.commit_count(), 1);
}

#[test]
fn geometry_projection_drops_position() {
    let backend = memory();
    let cases = [
        WindowGeometry::new(0, 0, 1, 1),
        WindowGeometry::new(-50, 300, 1920, 1080),
        WindowGeometry::new(i32::MAX, i32::MIN, 640, 480),
    ];

    for geometry in cases {
        let mut settings = Settings::open_as(&backend, identity("1.0.0")).unwrap();
        settings.set_window_geometry(&geometry).unwrap();
        settings.save().unwrap();
        drop(settings);

        let settings = Settings::open_as(&backend, identity("1.0.0")).unwrap();
        let read = settings.window_geometry().unwrap();
        assert_eq!(read, WindowGeometry::new(-1, -1, geometry.width, geometry.height));
    }
}

#[test]
fn maximized_normalization() {
    let backend = memory();
    for (input, expected) in [("0", false), ("1", true), ("-3", true), ("255", true)] {
        let flag = parse_flag(input).unwrap();
        let mut settings = Settings::open_as(&backend, identity("1.0.0")).unwrap();
        settings.set_window_maximized(flag).unwrap();
        settings.save().unwrap();
        drop(settings);

        let settings = Settings::open_as(&backend, identity("1.0.0")).unwrap();
        assert_eq!(settings.window_maximized().unwrap(), expected, "input {}", input);
    }
}

#[test]
fn teardown_runs_while_unwinding() {
    let backend = memory();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut settings = Settings::open_as(&backend, identity("3.0.0")).unwrap();
        settings
            .set_window_geometry(&WindowGeometry::from_size(10, 20))
            .unwrap();
        panic!("window closed abnormally");
    }));

    assert!(result.is_err());
    assert_eq!(
        backend.committed(APP, keys::VERSION),
        Some(StoreValue::String("3.0.0".to_string()))
    );
    assert_eq!(
        backend.committed(APP, keys::WINDOW_SIZE),
        Some(StoreValue::Int32Pair(10, 20))
    );
}
