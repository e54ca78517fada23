//! Creation and fleet inventory core for remotely hosted Cuttlefish devices.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod application;
pub mod domain;
pub mod infra;
