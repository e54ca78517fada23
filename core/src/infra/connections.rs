//! Control-directory reader — implements `ConnectionStatusSource`.
//!
//! Connection agents leave one JSON file per connected instance under
//! `<control_dir>/connections/`. This reader never writes to it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::application::ports::{ConnectionScope, ConnectionStatusSource, ConnectionStatuses};
use crate::domain::config::CONNECTIONS_SUBDIR;
use crate::domain::{ConnectionStatus, Cvd, MultiError};

#[derive(Debug, Deserialize)]
struct ConnectionRecord {
    cvd: Cvd,
    status: ConnectionStatus,
}

/// Reads connection statuses recorded under a control directory.
#[derive(Debug, Clone)]
pub struct ControlDirConnections {
    control_dir: PathBuf,
}

impl ControlDirConnections {
    #[must_use]
    pub fn new(control_dir: impl Into<PathBuf>) -> Self {
        Self {
            control_dir: control_dir.into(),
        }
    }

    fn connections_dir(&self) -> PathBuf {
        self.control_dir.join(CONNECTIONS_SUBDIR)
    }

    /// Synchronous load — used by `load` via `spawn_blocking`.
    fn load_sync(&self, scope: &ConnectionScope) -> ConnectionStatuses {
        let dir = self.connections_dir();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return ConnectionStatuses::default();
            }
            Err(e) => {
                return ConnectionStatuses {
                    statuses: HashMap::new(),
                    error: Some(
                        anyhow::Error::from(e)
                            .context(format!("reading connections dir {}", dir.display())),
                    ),
                };
            }
        };

        let mut statuses = HashMap::new();
        let mut errors = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    errors.push(anyhow!(e).context(format!("listing {}", dir.display())));
                    continue;
                }
            };
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match read_record(&path) {
                Ok(record) if scope.includes(&record.cvd.host) => {
                    statuses.insert(record.cvd, record.status);
                }
                Ok(_) => {}
                Err(e) => errors.push(e),
            }
        }

        ConnectionStatuses {
            statuses,
            error: MultiError::from_errors(errors).map(anyhow::Error::from),
        }
    }
}

fn read_record(path: &Path) -> Result<ConnectionRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading connection file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing connection file {}", path.display()))
}

impl ConnectionStatusSource for ControlDirConnections {
    async fn load(&self, scope: &ConnectionScope) -> ConnectionStatuses {
        let reader = self.clone();
        let scope = scope.clone();
        match tokio::task::spawn_blocking(move || reader.load_sync(&scope)).await {
            Ok(loaded) => loaded,
            Err(e) => ConnectionStatuses {
                statuses: HashMap::new(),
                error: Some(anyhow!(e).context("connection status load task panicked")),
            },
        }
    }
}
