//! Local Android build tree — implements `LocalImageStager`.
//!
//! Resolves the build environment from the process, reads the required
//! images list and checks the packaged host tools before anything is
//! uploaded.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::LocalImageStager;
use crate::domain::env::BuildEnvironment;
use crate::domain::error::BuildError;
use crate::domain::images::{
    CVD_HOST_PACKAGE_DIR_NAME, CVD_HOST_PACKAGE_NAME, REQUIRED_IMAGES_FILENAME,
    check_host_package_fresh, required_image_paths,
};

/// Resolve the build environment from the process environment.
///
/// # Errors
///
/// Returns [`BuildError::MissingEnvironmentVariable`] for the first unset
/// variable.
pub fn build_environment_from_process() -> Result<BuildEnvironment, BuildError> {
    BuildEnvironment::resolve(|name| std::env::var_os(name))
}

/// Read the required images list of `env` and map it onto the product
/// output directory.
///
/// # Errors
///
/// Returns [`BuildError::ManifestRead`] if the list cannot be read. A missing
/// list is an error, not an empty manifest.
pub fn list_required_image_files(env: &BuildEnvironment) -> Result<Vec<PathBuf>, BuildError> {
    let path = env.build_top.join(REQUIRED_IMAGES_FILENAME);
    let content = std::fs::read_to_string(&path)
        .map_err(|source| BuildError::ManifestRead { path, source })?;
    Ok(required_image_paths(&content, &env.product_out))
}

/// Verify that `host_out` holds a host package archive that is not older
/// than its unpacked directory.
///
/// # Errors
///
/// Returns [`BuildError::HostPackageMissing`] if the archive is absent,
/// [`BuildError::HostPackageDirUnreadable`] if the directory cannot be
/// inspected and [`BuildError::HostPackageStale`] if the archive is older.
pub fn verify_host_package(host_out: &Path) -> Result<(), BuildError> {
    let archive = host_out.join(CVD_HOST_PACKAGE_NAME);
    let archive_modified = match std::fs::metadata(&archive).and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BuildError::HostPackageMissing(archive));
        }
        Err(source) => {
            return Err(BuildError::HostPackageUnreadable {
                path: archive,
                source,
            });
        }
    };

    let dir = host_out.join(CVD_HOST_PACKAGE_DIR_NAME);
    let dir_modified = std::fs::metadata(&dir)
        .and_then(|m| m.modified())
        .map_err(|source| BuildError::HostPackageDirUnreadable { path: dir, source })?;

    check_host_package_fresh(&archive, archive_modified, dir_modified)
}

/// Collect every file to upload for `env`: the required images followed by
/// the host package archive.
///
/// # Errors
///
/// Returns the first [`BuildError`] hit while reading the manifest or
/// verifying the host package.
pub fn stage_build(env: &BuildEnvironment) -> Result<Vec<PathBuf>, BuildError> {
    let mut files = list_required_image_files(env)?;
    verify_host_package(&env.host_out)?;
    files.push(env.host_out.join(CVD_HOST_PACKAGE_NAME));
    Ok(files)
}

/// Production `LocalImageStager` reading the build tree named by the
/// `ANDROID_*` environment variables.
#[derive(Debug, Default)]
pub struct AndroidBuildTree {
    env: Option<BuildEnvironment>,
}

impl AndroidBuildTree {
    /// Stager that resolves the environment at staging time.
    #[must_use]
    pub fn from_process_env() -> Self {
        Self::default()
    }

    /// Stager over an already resolved environment (used in tests).
    #[must_use]
    pub fn with_environment(env: BuildEnvironment) -> Self {
        Self { env: Some(env) }
    }
}

impl LocalImageStager for AndroidBuildTree {
    async fn required_files(&self) -> Result<Vec<PathBuf>> {
        let env = match &self.env {
            Some(env) => env.clone(),
            None => build_environment_from_process()
                .context("cannot retrieve Android build environment variables")?,
        };
        tokio::task::spawn_blocking(move || stage_build(&env))
            .await
            .context("spawn_blocking for stage_build")?
            .map_err(anyhow::Error::from)
    }
}
