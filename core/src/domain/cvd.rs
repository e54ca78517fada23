//! Instance identity and the summaries built from remote listings.

use serde::{Deserialize, Serialize};

/// Identity of a single remotely hosted device instance.
///
/// Used as the key that correlates remote listings with locally known
/// connection state, so equality and hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cvd {
    pub service_root_endpoint: String,
    pub host: String,
    pub name: String,
}

impl Cvd {
    #[must_use]
    pub fn new(
        service_root_endpoint: impl Into<String>,
        host: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            service_root_endpoint: service_root_endpoint.into(),
            host: host.into(),
            name: name.into(),
        }
    }
}

/// Instance record as returned by a host orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemoteCvd {
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub displays: Vec<String>,
}

/// ADB tunnel state tracked for a connected instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdbStatus {
    pub port: u16,
    pub state: String,
}

/// Locally tracked connectivity of a previously connected instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub adb: AdbStatus,
}

/// Instance summary handed back to callers of the create and list use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CvdInfo {
    #[serde(flatten)]
    pub cvd: Cvd,
    pub status: String,
    pub displays: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_status: Option<ConnectionStatus>,
}

impl CvdInfo {
    /// Build a summary from a remote record, stamped with the service
    /// endpoint and host it came from. Connection status is left unset.
    #[must_use]
    pub fn from_remote(service_root_endpoint: &str, host: &str, remote: RemoteCvd) -> Self {
        Self {
            cvd: Cvd::new(service_root_endpoint, host, remote.name),
            status: remote.status,
            displays: remote.displays,
            connection_status: None,
        }
    }
}
