//! Domain layer — pure types, validation, and request shaping.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, or `std::process`. All functions are synchronous and
//! take data in, returning data out.

pub mod build;
pub mod config;
pub mod cvd;
pub mod env;
pub mod error;
pub mod images;

pub use build::{
    AndroidCiBuild, AndroidCiBuildSource, BuildSource, CiBuilds, CreateCvdRequest, CreateOptions,
    FetchArtifactsRequest, ImageSource,
};
pub use config::CvdConfig;
pub use cvd::{AdbStatus, ConnectionStatus, Cvd, CvdInfo, RemoteCvd};
pub use env::BuildEnvironment;
pub use error::{BuildError, MultiError};
