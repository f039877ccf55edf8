//! Utility modules for the FS Cockpit core.
//!
//! - Constants (default thresholds, deductions and vocabulary)
//! - Lenient parsing of timestamps, percentages and JSON cells

pub mod constants;
pub mod parsing;

pub use constants::*;
pub use parsing::*;
