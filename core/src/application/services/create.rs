//! Application service — instance creation use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::application::ports::{CloudService, LocalImageStager};
use crate::domain::{
    AndroidCiBuildSource, BuildSource, CiBuilds, CreateCvdRequest, CreateOptions, CvdInfo,
    FetchArtifactsRequest, ImageSource, RemoteCvd,
};

/// Create instances on `opts.host` from the requested image source.
///
/// The whole call is one remote creation: either every requested instance is
/// returned or the call fails. Returned summaries never carry a connection
/// status.
///
/// # Errors
///
/// Returns a `failed to create instance` error wrapping the first failure of
/// local staging, upload, artifact fetch, or the creation request itself.
pub async fn create_cvds(
    service: &impl CloudService,
    stager: &impl LocalImageStager,
    opts: &CreateOptions,
) -> Result<Vec<CvdInfo>> {
    let created = match &opts.source {
        ImageSource::LocalImage => create_from_local_build(service, stager, opts).await,
        ImageSource::AndroidCi(builds) => create_from_android_ci(service, opts, builds).await,
    }
    .context("failed to create instance")?;

    let root = service.root_uri();
    Ok(created
        .into_iter()
        .map(|cvd| CvdInfo::from_remote(&root, &opts.host, cvd))
        .collect())
}

async fn create_from_local_build(
    service: &impl CloudService,
    stager: &impl LocalImageStager,
    opts: &CreateOptions,
) -> Result<Vec<RemoteCvd>> {
    let host = opts.host.as_str();
    let files = stager
        .required_files()
        .await
        .context("cannot stage local image files")?;

    let upload_dir = service
        .create_upload(host)
        .await
        .with_context(|| format!("create upload area on host {host:?}"))?;
    debug!(host, %upload_dir, files = files.len(), "uploading local image files");
    service
        .upload_files(host, &upload_dir, &files)
        .await
        .with_context(|| format!("upload files to {upload_dir:?} on host {host:?}"))?;

    let request = CreateCvdRequest::new(
        BuildSource::UserArtifacts {
            artifacts_dir: upload_dir,
        },
        opts.additional_instances_num(),
    );
    info!(
        host,
        additional = request.additional_instances_num,
        "creating cvd from local image"
    );
    service
        .create_cvd(host, &request)
        .await
        .with_context(|| format!("create cvd on host {host:?}"))
}

async fn create_from_android_ci(
    service: &impl CloudService,
    opts: &CreateOptions,
    builds: &CiBuilds,
) -> Result<Vec<RemoteCvd>> {
    let host = opts.host.as_str();
    let source = AndroidCiBuildSource::from(builds);

    let fetch = FetchArtifactsRequest::main_bundle(source.main_build.clone());
    service
        .fetch_artifacts(host, &fetch)
        .await
        .with_context(|| format!("fetch artifacts on host {host:?}"))?;

    let request = CreateCvdRequest::new(
        BuildSource::AndroidCi(source),
        opts.additional_instances_num(),
    );
    info!(
        host,
        build_id = %builds.main.build_id,
        target = %builds.main.target,
        additional = request.additional_instances_num,
        "creating cvd from android ci"
    );
    service
        .create_cvd(host, &request)
        .await
        .with_context(|| format!("create cvd on host {host:?}"))
}
