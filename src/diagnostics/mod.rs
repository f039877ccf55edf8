//! Endpoint diagnostics.
//!
//! Turns raw NQL query responses into structured hardware, OS, experience
//! score, crash and alert data, and plans which queries a request needs.
//! Managed device records from the device-management API map onto the
//! scoring snapshot and the security section.

pub mod managed_device;
pub mod nql;
pub mod request;
pub mod types;

pub use managed_device::*;
pub use nql::*;
pub use request::*;
pub use types::*;
