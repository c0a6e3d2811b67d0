//! Built-in benchmark catalogue for the perf-suite binary
//!
//! Scenarios talk to an in-process [`loopback::LoopbackClient`] instead of a
//! live server, so the whole suite runs anywhere the fixture files exist.

pub mod loopback;
pub mod scenarios;

pub use loopback::{LoopbackClient, LoopbackError};
pub use scenarios::build_suite;
