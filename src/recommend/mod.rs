//! Remote action recommendations for service desk incidents.
//!
//! Resolves the affected device from an incident, scores the device's
//! remote action history against the incident, and filters action history
//! by status and recency.

pub mod filter;
pub mod relevance;
pub mod types;

pub use filter::*;
pub use relevance::*;
pub use types::*;
