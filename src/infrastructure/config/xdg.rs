//! XDG config store adapter for the tool configuration
//!
//! The file sits next to the settings store and is replaced through a
//! synced temp file, the same way the keyfile store commits.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

use super::app_config_dir;

/// File name of the tool configuration
pub const CONFIG_FILE: &str = "config.toml";

/// Tool configuration in `$XDG_CONFIG_HOME/deskprefs/config.toml`
#[derive(Debug, Clone)]
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    pub fn new() -> Self {
        Self::with_path(app_config_dir().join(CONFIG_FILE))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn decode(&self, content: &str) -> Result<AppConfig, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", self.path.display(), e)))
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::empty()),
            Err(e) => {
                return Err(ConfigError::ReadError(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let config = self.decode(&content)?;
        debug!(path = %self.path.display(), "loaded tool config");
        Ok(config)
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        write_atomically(&self.path, &content)
            .await
            .map_err(|e| ConfigError::WriteError(format!("{}: {}", self.path.display(), e)))?;
        debug!(path = %self.path.display(), "saved tool config");
        Ok(())
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.display().to_string(),
            ));
        }
        self.save(&AppConfig::defaults()).await
    }
}

async fn write_atomically(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let tmp = path.with_extension("toml.tmp");
    let mut file = File::create(&tmp).await?;
    file.write_all(content.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(&tmp, path).await
}
