//! Device Health & Diagnostics Classification Engine.
//!
//! Converts raw device metrics into the Healthy / Warning / Critical model
//! that drives every color-coded badge on the dashboard.
//!
//! # Components
//!
//! - **Classifier**: single metric to tier and color band
//! - **Scorer**: weighted-deduction composite score for a device snapshot
//! - **Sections**: per-section rule tables (hardware, OS, security, services)
//! - **View model**: assembles everything for the diagnostics tab

pub mod classifier;
pub mod scorer;
pub mod sections;
pub mod view_model;

pub use classifier::*;
pub use scorer::*;
pub use sections::*;
pub use view_model::*;
