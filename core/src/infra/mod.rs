//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: environment lookup,
//! build tree inspection, control directory reads and configuration loading.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.

pub mod android_build;
pub mod config;
pub mod connections;
