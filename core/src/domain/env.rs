//! Android build environment resolution.
//!
//! The variable lookup is injected so resolution stays a pure function of its
//! input; `infra::android_build` wires it to the process environment.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::domain::error::BuildError;

pub const ANDROID_BUILD_TOP_VAR: &str = "ANDROID_BUILD_TOP";
pub const ANDROID_PRODUCT_OUT_VAR: &str = "ANDROID_PRODUCT_OUT";
pub const ANDROID_HOST_OUT_VAR: &str = "ANDROID_HOST_OUT";

/// Variables checked, in this order, when resolving a [`BuildEnvironment`].
pub const REQUIRED_ENV_VARS: [&str; 3] = [
    ANDROID_BUILD_TOP_VAR,
    ANDROID_PRODUCT_OUT_VAR,
    ANDROID_HOST_OUT_VAR,
];

/// Paths of an Android build tree with a lunched target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEnvironment {
    pub build_top: PathBuf,
    pub product_out: PathBuf,
    pub host_out: PathBuf,
}

impl BuildEnvironment {
    /// Resolve all three build paths through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingEnvironmentVariable`] naming the first
    /// unset variable in [`REQUIRED_ENV_VARS`] order.
    pub fn resolve(lookup: impl Fn(&str) -> Option<OsString>) -> Result<Self, BuildError> {
        let [build_top, product_out, host_out] = REQUIRED_ENV_VARS.map(|name| (name, lookup(name)));
        let take = |(name, value): (&'static str, Option<OsString>)| {
            value
                .map(PathBuf::from)
                .ok_or(BuildError::MissingEnvironmentVariable(name))
        };
        Ok(Self {
            build_top: take(build_top)?,
            product_out: take(product_out)?,
            host_out: take(host_out)?,
        })
    }
}
