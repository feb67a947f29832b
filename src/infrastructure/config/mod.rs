//! Tool configuration adapters

pub mod xdg;

use std::path::PathBuf;

pub use xdg::XdgConfigStore;

/// Directory holding every file the tool owns: `$XDG_CONFIG_HOME/deskprefs`
pub fn app_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("deskprefs")
}
