//! Infrastructure implementation of the `ConfigStore` port.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::{CvdConfig, default_control_dir};
use crate::infra::connections::ControlDirConnections;

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "CVDR_CONFIG";

/// Production implementation of `ConfigStore` that reads a YAML file on disk.
#[derive(Debug, Default)]
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Store reading an explicit file (used in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<CvdConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(CvdConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        config_path(std::env::var_os(CONFIG_ENV_VAR))
    }
}

/// Config file location: `env_override` when set, else the per-user default.
fn config_path(env_override: Option<OsString>) -> Result<PathBuf> {
    if let Some(val) = env_override {
        return Ok(PathBuf::from(val));
    }
    Ok(config_root()?.join("cvdr").join("config.yaml"))
}

fn config_root() -> Result<PathBuf> {
    dirs::config_dir().ok_or_else(|| anyhow::anyhow!("cannot determine config directory"))
}

/// Build the connection-status reader for the configured control directory.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or no default
/// control directory can be determined.
pub fn connections_from_config(store: &impl ConfigStore) -> Result<ControlDirConnections> {
    let config = store.load()?;
    let control_dir = match config.control_dir {
        Some(dir) => dir,
        None => default_control_dir(&config_root()?),
    };
    Ok(ControlDirConnections::new(control_dir))
}
