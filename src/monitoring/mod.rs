//! Service monitoring.
//!
//! Tracks availability of the external services diagnostics depend on.

pub mod uptime;

pub use uptime::*;
