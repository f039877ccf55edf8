//! Diagnostics requests: mode, category planning and assembly.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::nql::*;
use super::types::ComprehensiveDiagnostics;
use crate::error::{Error, Result};
use crate::utils::parsing::round2;

// ═══════════════════════════════════════════════════════════════════════════════
// MODE AND CATEGORIES
// ═══════════════════════════════════════════════════════════════════════════════

/// Diagnostics mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticsMode {
    /// Every category
    #[default]
    Full,
    /// Only the requested categories
    Partial,
}

impl DiagnosticsMode {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticsMode::Full => "full",
            DiagnosticsMode::Partial => "partial",
        }
    }
}

impl FromStr for DiagnosticsMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(DiagnosticsMode::Full),
            "partial" => Ok(DiagnosticsMode::Partial),
            _ => Err(Error::InvalidParameter {
                name: "mode".into(),
                reason: format!("'{}' must be 'full' or 'partial'", s),
            }),
        }
    }
}

impl fmt::Display for DiagnosticsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostics category and the query backing it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCategory {
    /// Inventory from device information
    Hardware,
    /// Load and boot metrics; planned alongside `Hardware`
    HardwarePerformance,
    /// Build and uptime
    OsHealth,
    /// DEX scores
    DeviceScores,
    /// Application crashes
    ApplicationHealth,
    /// Alert counts
    Alerts,
}

impl DiagnosticCategory {
    /// Categories a caller may request
    pub fn requestable() -> &'static [DiagnosticCategory] {
        &[
            DiagnosticCategory::Hardware,
            DiagnosticCategory::OsHealth,
            DiagnosticCategory::DeviceScores,
            DiagnosticCategory::ApplicationHealth,
            DiagnosticCategory::Alerts,
        ]
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCategory::Hardware => "hardware",
            DiagnosticCategory::HardwarePerformance => "hardware_performance",
            DiagnosticCategory::OsHealth => "os_health",
            DiagnosticCategory::DeviceScores => "device_scores",
            DiagnosticCategory::ApplicationHealth => "application_health",
            DiagnosticCategory::Alerts => "alerts",
        }
    }

    /// NQL query id
    pub fn query_id(&self) -> &'static str {
        match self {
            DiagnosticCategory::Hardware | DiagnosticCategory::OsHealth => DEVICE_INFORMATION_QUERY,
            DiagnosticCategory::HardwarePerformance => DEVICE_PERFORMANCE_QUERY,
            DiagnosticCategory::DeviceScores => DEVICE_SCORE_QUERY,
            DiagnosticCategory::ApplicationHealth => APP_CRASH_QUERY,
            DiagnosticCategory::Alerts => ALERTS_QUERY,
        }
    }

    /// Parse a requestable category name
    pub fn from_requested(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::requestable()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REQUEST AND PLAN
// ═══════════════════════════════════════════════════════════════════════════════

/// Diagnostics request for one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsRequest {
    /// Device name
    pub device_name: String,
    /// Mode
    #[serde(default)]
    pub mode: DiagnosticsMode,
    /// Requested categories; all when absent
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

/// Queries to run for a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticsPlan {
    /// Categories to fetch, in order, without duplicates
    pub to_fetch: Vec<DiagnosticCategory>,
    /// Requested names that are not categories
    pub ignored: Vec<String>,
}

impl DiagnosticsRequest {
    /// Full diagnostics for a device
    pub fn full(device_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            mode: DiagnosticsMode::Full,
            categories: None,
        }
    }

    /// Partial diagnostics for a device
    pub fn partial<I, S>(device_name: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            device_name: device_name.into(),
            mode: DiagnosticsMode::Partial,
            categories: Some(categories.into_iter().map(Into::into).collect()),
        }
    }

    /// Build from a mode string, rejecting unknown modes
    pub fn parse(
        device_name: impl Into<String>,
        mode: &str,
        categories: Option<Vec<String>>,
    ) -> Result<Self> {
        Ok(Self {
            device_name: device_name.into(),
            mode: mode.parse()?,
            categories,
        })
    }

    /// Requested category names as reported back
    pub fn requested_names(&self) -> Vec<String> {
        match &self.categories {
            Some(names) => names.clone(),
            None => DiagnosticCategory::requestable()
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
        }
    }

    /// Decide which categories to fetch
    pub fn plan(&self) -> DiagnosticsPlan {
        let mut plan = DiagnosticsPlan::default();

        match (self.mode, &self.categories) {
            (DiagnosticsMode::Full, _) | (DiagnosticsMode::Partial, None) => {
                plan.to_fetch = DiagnosticCategory::requestable().to_vec();
            }
            (DiagnosticsMode::Partial, Some(names)) => {
                for name in names {
                    match DiagnosticCategory::from_requested(name) {
                        Some(category) if !plan.to_fetch.contains(&category) => {
                            plan.to_fetch.push(category)
                        }
                        Some(_) => {}
                        None => plan.ignored.push(name.clone()),
                    }
                }
            }
        }

        if plan.to_fetch.contains(&DiagnosticCategory::Hardware)
            && !plan.to_fetch.contains(&DiagnosticCategory::HardwarePerformance)
        {
            plan.to_fetch.push(DiagnosticCategory::HardwarePerformance);
        }

        if !plan.ignored.is_empty() {
            warn!(
                device = %self.device_name,
                ignored = ?plan.ignored,
                "Invalid diagnostic categories requested"
            );
        }

        plan
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ASSEMBLY
// ═══════════════════════════════════════════════════════════════════════════════

/// Raw query responses keyed by query id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDiagnostics {
    /// Responses that came back
    pub responses: HashMap<String, NqlResponse>,
}

impl RawDiagnostics {
    /// Record a response
    pub fn insert(&mut self, query_id: impl Into<String>, response: NqlResponse) {
        self.responses.insert(query_id.into(), response);
    }

    /// Builder form of `insert`
    pub fn with(mut self, query_id: impl Into<String>, response: NqlResponse) -> Self {
        self.insert(query_id, response);
        self
    }

    fn get(&self, category: DiagnosticCategory) -> Option<&NqlResponse> {
        self.responses.get(category.query_id())
    }
}

/// Parse the planned categories out of raw responses.
///
/// Completeness is the share of planned categories whose query returned,
/// rounded to two decimals.
pub fn assemble(
    request: &DiagnosticsRequest,
    raw: &RawDiagnostics,
    now: DateTime<Utc>,
) -> ComprehensiveDiagnostics {
    let plan = request.plan();

    let mut result = ComprehensiveDiagnostics {
        device_name: request.device_name.clone(),
        timestamp: now,
        diagnostics_mode: request.mode,
        categories_requested: request.requested_names(),
        categories_available: Vec::new(),
        data_completeness_percent: 0.0,
        hardware: None,
        os_health: None,
        device_scores: None,
        application_health: None,
        alert_summary: None,
        notes: None,
    };

    if !plan.ignored.is_empty() {
        result.notes = Some(format!("Invalid categories ignored: {}", plan.ignored.join(", ")));
    }

    for category in &plan.to_fetch {
        let Some(response) = raw.get(*category) else {
            debug!(category = category.as_str(), "No response for category");
            continue;
        };
        result.categories_available.push(category.as_str().to_string());

        match category {
            DiagnosticCategory::Hardware => {
                if let Some(inventory) = parse_device_information(response) {
                    match result.hardware.as_mut() {
                        Some(hardware) => {
                            let performance = std::mem::replace(hardware, inventory);
                            hardware.merge(performance);
                        }
                        None => result.hardware = Some(inventory),
                    }
                }
            }
            DiagnosticCategory::HardwarePerformance => {
                if let Some(performance) = parse_device_performance(response) {
                    match result.hardware.as_mut() {
                        Some(hardware) => hardware.merge(performance),
                        None => result.hardware = Some(performance),
                    }
                }
            }
            DiagnosticCategory::OsHealth => result.os_health = parse_os_info(response),
            DiagnosticCategory::DeviceScores => result.device_scores = parse_device_scores(response),
            DiagnosticCategory::ApplicationHealth => {
                result.application_health = parse_app_crashes(response)
            }
            DiagnosticCategory::Alerts => result.alert_summary = parse_alerts(response),
        }
    }

    if !plan.to_fetch.is_empty() {
        let executed = result.categories_available.len() as f64;
        result.data_completeness_percent = round2(executed / plan.to_fetch.len() as f64 * 100.0);
    }

    result
}
