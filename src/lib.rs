//! # FS Cockpit
//!
//! Device health and diagnostics classification for a service-desk
//! dashboard. Raw device telemetry and device-management snapshots go in;
//! color-coded health tiers, a composite device score and per-section
//! health come out.
//!
//! ## Architecture
//!
//! - **Core**: Health tiers, color tokens and engine configuration
//! - **Health**: Metric classifier, composite scorer, section aggregator and view model
//! - **Diagnostics**: NQL response parsing and diagnostics request planning
//! - **Recommend**: Remote action relevance ranking for incidents
//! - **Monitoring**: Uptime tracking for the external services
//!
//! ## Example
//!
//! ```rust,ignore
//! use fs_cockpit::prelude::*;
//!
//! let snapshot = DeviceSnapshot::new("compliant")
//!     .with_memory_usage("85")
//!     .with_connection_type("Wi-Fi")
//!     .with_ip_address("10.0.0.5")
//!     .with_last_sync("Never synced");
//!
//! let result = HealthScorer::default().score(&snapshot, chrono::Utc::now());
//! assert_eq!(result.score, 90);
//! assert_eq!(result.tier, HealthTier::Healthy);
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    unused_lifetimes,
    unused_qualifications
)]

pub mod core;
pub mod diagnostics;
pub mod error;
pub mod health;
pub mod monitoring;
pub mod recommend;
pub mod telemetry;
pub mod utils;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        config::CockpitConfig,
        tier::{ColorToken, HealthTier},
    };
    pub use crate::diagnostics::{
        assemble, ComprehensiveDiagnostics, DiagnosticsMode, DiagnosticsRequest, ManagedDevice,
        NqlResponse, RawDiagnostics,
    };
    pub use crate::error::{Error, Result};
    pub use crate::health::{
        classifier::{classify, Classification, MetricClassifier, MetricValue},
        scorer::{DeviceHealthScore, DeviceSnapshot, HealthScorer},
        sections::{HardwareSignals, OsSignals, Section, SectionAggregator, SecuritySignals, ServicesSignals},
        view_model::{DiagnosticsInput, DiagnosticsViewModel, ViewModelBuilder},
    };
    pub use crate::monitoring::uptime::{CheckStatus, ExternalService, ServiceHealthTracker, UptimeStats};
    pub use crate::recommend::{recommend, ActionFilter, Incident, RankedAction, RemoteAction};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Product name
pub const PRODUCT_NAME: &str = "FS Cockpit";
