//! Compile-time application identity

/// Reverse-DNS application identifier; selects the schema namespace.
pub const APP_ID: &str = "io.github.deskprefs.DeskPrefs";

/// Package version baked in at compile time.
pub const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application id and version a settings facade is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    pub app_id: String,
    pub version: String,
}

impl AppIdentity {
    pub fn new(app_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            version: version.into(),
        }
    }

    /// Identity of the running binary
    pub fn current() -> Self {
        Self::new(APP_ID, PACKAGE_VERSION)
    }
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self::current()
    }
}
