//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;

use anyhow::Result;

use crate::domain::{
    ConnectionStatus, CreateCvdRequest, Cvd, CvdConfig, FetchArtifactsRequest, RemoteCvd,
};

// ── Cloud Orchestration Port ──────────────────────────────────────────────────

/// Remote cloud orchestration service fronting a fleet of hosts.
///
/// Returned futures are `Send` so fleet listing can run one task per host.
pub trait CloudService {
    /// Root URI of the service, used to stamp instance identities.
    fn root_uri(&self) -> String;

    /// Names of all hosts known to the service.
    fn list_hosts(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Instances currently present on `host`.
    fn list_cvds(&self, host: &str) -> impl Future<Output = Result<Vec<RemoteCvd>>> + Send;

    /// Create a fresh upload area on `host` and return its identifier.
    fn create_upload(&self, host: &str) -> impl Future<Output = Result<String>> + Send;

    /// Upload local files into an upload area on `host`.
    fn upload_files(
        &self,
        host: &str,
        upload_dir: &str,
        files: &[PathBuf],
    ) -> impl Future<Output = Result<()>> + Send;

    /// Have `host` fetch a CI artifact bundle ahead of creation.
    fn fetch_artifacts(
        &self,
        host: &str,
        request: &FetchArtifactsRequest,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Create one or more instances on `host` from a single build source.
    fn create_cvd(
        &self,
        host: &str,
        request: &CreateCvdRequest,
    ) -> impl Future<Output = Result<Vec<RemoteCvd>>> + Send;
}

// ── Connection Status Port ────────────────────────────────────────────────────

/// Which hosts a connection-status load covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionScope {
    AllHosts,
    Host(String),
}

impl ConnectionScope {
    #[must_use]
    pub fn includes(&self, host: &str) -> bool {
        match self {
            Self::AllHosts => true,
            Self::Host(h) => h == host,
        }
    }
}

/// Result of loading local connection statuses.
///
/// Loading is best-effort: `statuses` holds everything that could be read
/// and `error` records what could not.
#[derive(Debug, Default)]
pub struct ConnectionStatuses {
    pub statuses: HashMap<Cvd, ConnectionStatus>,
    pub error: Option<anyhow::Error>,
}

/// Read-only lookup of locally tracked connection state.
///
/// The returned future is `Send` so callers may run a listing on a spawned
/// task.
pub trait ConnectionStatusSource {
    /// Load statuses for every instance in `scope`.
    fn load(&self, scope: &ConnectionScope) -> impl Future<Output = ConnectionStatuses> + Send;
}

// ── Local Image Port ──────────────────────────────────────────────────────────

/// Collects the files needed to create instances from a local build.
#[allow(async_fn_in_trait)]
pub trait LocalImageStager {
    /// Return every file to upload, host package archive last.
    ///
    /// Must fail before anything is uploaded if the build tree is incomplete
    /// or the host package is missing or stale.
    async fn required_files(&self) -> Result<Vec<PathBuf>>;
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts loading of the core configuration.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when none exists.
    fn load(&self) -> Result<CvdConfig>;
    /// Location the configuration is read from.
    fn path(&self) -> Result<PathBuf>;
}
