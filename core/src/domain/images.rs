//! Local image manifest parsing and host package freshness.
//!
//! Pure functions only: the caller supplies file content and timestamps.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::domain::error::BuildError;

/// Required images list, relative to `ANDROID_BUILD_TOP`.
pub const REQUIRED_IMAGES_FILENAME: &str = "device/google/cuttlefish/required_images";

/// Packaged host tools archive, under `ANDROID_HOST_OUT`.
pub const CVD_HOST_PACKAGE_NAME: &str = "cvd-host_package.tar.gz";

/// Unpacked host tools directory the archive is built from.
pub const CVD_HOST_PACKAGE_DIR_NAME: &str = "cvd-host_package";

/// Map each line of the required images list onto `product_out`, keeping
/// file order. Blank lines are skipped.
///
/// Every entry stays under `product_out`: a leading `/` on a line is dropped
/// rather than letting the line name an absolute path.
#[must_use]
pub fn required_image_paths(content: &str, product_out: &Path) -> Vec<PathBuf> {
    content
        .lines()
        .map(|line| line.trim().trim_start_matches('/'))
        .filter(|line| !line.is_empty())
        .map(|line| product_out.join(line))
        .collect()
}

/// Check that the host package archive is at least as new as its source
/// directory.
///
/// # Errors
///
/// Returns [`BuildError::HostPackageStale`] if the archive predates the
/// directory.
pub fn check_host_package_fresh(
    archive: &Path,
    archive_modified: SystemTime,
    dir_modified: SystemTime,
) -> Result<(), BuildError> {
    if archive_modified < dir_modified {
        return Err(BuildError::HostPackageStale(archive.to_path_buf()));
    }
    Ok(())
}
