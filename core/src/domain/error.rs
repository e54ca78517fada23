//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::fmt::Write as _;
use std::path::PathBuf;

use thiserror::Error;

// ── Local build errors ────────────────────────────────────────────────────────

/// Errors that prevent staging a locally built image set.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Missing environment variable: {0:?}")]
    MissingEnvironmentVariable(&'static str),

    #[error("cannot read the required images list file {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} not found. Please run `m hosttar`.", .0.display())]
    HostPackageMissing(PathBuf),

    #[error("cannot get cvd host package info for {path}: {source}")]
    HostPackageUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot get cvd host package directory info for {path}: {source}")]
    HostPackageDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} out of date. Please run `m hosttar`.", .0.display())]
    HostPackageStale(PathBuf),
}

// ── Aggregate errors ──────────────────────────────────────────────────────────

/// One or more independent operations failed.
///
/// Produced by the listing use-cases and the connection-status loader. It is
/// always reported next to whatever results did succeed.
#[derive(Debug, Error)]
#[error("{}", render(.0))]
pub struct MultiError(Vec<anyhow::Error>);

impl MultiError {
    /// Wrap `errors`, or return `None` if there are none.
    #[must_use]
    pub fn from_errors(errors: Vec<anyhow::Error>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[anyhow::Error] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flatten a nested `MultiError` into its members, otherwise keep `error`
    /// as a single entry.
    pub(crate) fn flatten_into(error: anyhow::Error, into: &mut Vec<anyhow::Error>) {
        match error.downcast::<MultiError>() {
            Ok(multi) => into.extend(multi.0),
            Err(other) => into.push(other),
        }
    }
}

fn render(errors: &[anyhow::Error]) -> String {
    let mut out = if errors.len() == 1 {
        "1 error occurred:".to_string()
    } else {
        format!("{} errors occurred:", errors.len())
    };
    for e in errors {
        let _ = write!(out, "\n\t* {e:#}");
    }
    out
}
