//! Application service — fleet inventory use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, warn};

use crate::application::ports::{CloudService, ConnectionScope, ConnectionStatusSource};
use crate::domain::{ConnectionStatus, Cvd, CvdInfo, MultiError};

/// Instances gathered by a listing, plus everything that went wrong.
///
/// A present `error` does not mean `cvds` is empty: hosts that answered are
/// always reported.
#[derive(Debug, Default)]
pub struct CvdListing {
    pub cvds: Vec<CvdInfo>,
    pub error: Option<MultiError>,
}

/// List the instances of a single host.
///
/// Connection statuses are loaded for `host` only. A failure to load them is
/// recorded in the returned error but does not stop the listing.
pub async fn list_host_cvds(
    service: &impl CloudService,
    connections: &impl ConnectionStatusSource,
    host: &str,
) -> CvdListing {
    let loaded = connections
        .load(&ConnectionScope::Host(host.to_string()))
        .await;
    let mut errors = Vec::new();
    if let Some(err) = loaded.error {
        warn!(host, error = %format!("{err:#}"), "cannot load connection statuses");
        MultiError::flatten_into(err, &mut errors);
    }

    let cvds = match list_host_cvds_inner(service, host, &loaded.statuses).await {
        Ok(cvds) => cvds,
        Err(err) => {
            warn!(host, error = %format!("{err:#}"), "listing cvds failed");
            errors.push(err);
            Vec::new()
        }
    };

    CvdListing {
        cvds,
        error: MultiError::from_errors(errors),
    }
}

/// List the instances of every host known to the service.
///
/// Each host is listed on its own task and every task runs to completion;
/// one host failing never hides the instances of another. Results keep the
/// host enumeration order.
///
/// # Errors
///
/// Returns an error only if the host enumeration itself fails. Per-host and
/// connection-status failures are reported in [`CvdListing::error`].
pub async fn list_all_cvds<S>(
    service: &Arc<S>,
    connections: &impl ConnectionStatusSource,
) -> Result<CvdListing>
where
    S: CloudService + Send + Sync + 'static,
{
    let hosts = service.list_hosts().await.context("error listing hosts")?;

    let loaded = connections.load(&ConnectionScope::AllHosts).await;
    let mut errors = Vec::new();
    if let Some(err) = loaded.error {
        warn!(error = %format!("{err:#}"), "cannot load connection statuses");
        MultiError::flatten_into(err, &mut errors);
    }
    let statuses = Arc::new(loaded.statuses);

    debug!(hosts = hosts.len(), "listing cvds across hosts");
    let tasks: Vec<_> = hosts
        .into_iter()
        .map(|host| {
            let service = Arc::clone(service);
            let statuses = Arc::clone(&statuses);
            let task_host = host.clone();
            let handle = tokio::spawn(async move {
                list_host_cvds_inner(service.as_ref(), &task_host, &statuses).await
            });
            (host, handle)
        })
        .collect();

    let mut cvds = Vec::new();
    for (host, handle) in tasks {
        match handle.await {
            Ok(Ok(found)) => cvds.extend(found),
            Ok(Err(err)) => {
                warn!(%host, error = %format!("{err:#}"), "listing cvds failed");
                errors.push(err);
            }
            Err(join_err) => {
                warn!(%host, error = %join_err, "listing task did not complete");
                errors.push(anyhow!("list cvds on host {host:?}: {join_err}"));
            }
        }
    }

    Ok(CvdListing {
        cvds,
        error: MultiError::from_errors(errors),
    })
}

/// List one host and attach any known connection status to each instance.
///
/// Shared by the single-host and fleet listings.
async fn list_host_cvds_inner(
    service: &impl CloudService,
    host: &str,
    statuses: &HashMap<Cvd, ConnectionStatus>,
) -> Result<Vec<CvdInfo>> {
    let remote = service
        .list_cvds(host)
        .await
        .with_context(|| format!("list cvds on host {host:?}"))?;
    let root = service.root_uri();
    Ok(remote
        .into_iter()
        .map(|cvd| {
            let mut info = CvdInfo::from_remote(&root, host, cvd);
            info.connection_status = statuses.get(&info.cvd).cloned();
            info
        })
        .collect())
}
