//! Configuration schema for the cvd core.
//!
//! Pure types only — no I/O, no async, no filesystem access.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Subdirectory of the control directory holding one JSON file per
/// connected instance.
pub const CONNECTIONS_SUBDIR: &str = "connections";

/// Top-level configuration, stored as YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvdConfig {
    /// Directory where local connection agents record their state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_dir: Option<PathBuf>,
}

/// Control directory used when none is configured.
#[must_use]
pub fn default_control_dir(config_root: &Path) -> PathBuf {
    config_root.join("cvdr")
}
