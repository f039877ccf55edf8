//! Metric Classifier.
//!
//! Maps a single numeric reading onto a [`HealthTier`] and color band.
//! Usage-style metrics (CPU, RAM, disk) get worse as they rise, charge-style
//! metrics (battery) get worse as they fall, and knowledge-article
//! confidence uses its own four-band badge table.
//!
//! Every function here is total: NaN and the "Not Available" sentinel are
//! Indeterminate, and out-of-range numbers (infinities included) land in the
//! nearest band.

use serde::{Deserialize, Serialize};

use crate::core::tier::{ColorToken, HealthTier};
use crate::utils::constants::*;
use crate::utils::parsing::parse_percent;

// ═══════════════════════════════════════════════════════════════════════════════
// METRIC VALUE
// ═══════════════════════════════════════════════════════════════════════════════

/// A numeric reading or the "not available" sentinel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricValue {
    /// Reading present
    Available(f64),
    /// No reading
    NotAvailable,
}

impl MetricValue {
    /// Parse from display text ("85", "85%", "Not Available")
    pub fn parse(raw: &str) -> Self {
        parse_percent(raw).into()
    }

    /// Numeric value, if present and not NaN
    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Available(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Display text used by the dashboard
    pub fn display(&self) -> String {
        match self.value() {
            Some(v) if v == f64::INFINITY => "∞%".to_string(),
            Some(v) if v == f64::NEG_INFINITY => "-∞%".to_string(),
            Some(v) if v.fract() == 0.0 && v.abs() < 1.0e15 => format!("{}%", v as i64),
            Some(v) => format!("{:.1}%", v),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if !v.is_nan() => MetricValue::Available(v),
            _ => MetricValue::NotAvailable,
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Some(value).into()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Tier plus the color token it renders with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    /// Tier
    pub tier: HealthTier,
    /// Color
    pub color: ColorToken,
}

impl Classification {
    /// Classification for a tier
    pub fn of(tier: HealthTier) -> Self {
        Self {
            tier,
            color: tier.color(),
        }
    }

    /// Classification for missing data
    pub fn indeterminate() -> Self {
        Self::of(HealthTier::Indeterminate)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BAND TABLES
// ═══════════════════════════════════════════════════════════════════════════════

/// Bands for metrics where higher is worse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageBands {
    /// At or above this is Warning
    pub warning_at: f64,
    /// At or above this is Critical
    pub critical_at: f64,
}

impl Default for UsageBands {
    fn default() -> Self {
        Self {
            warning_at: USAGE_WARNING_PERCENT,
            critical_at: USAGE_CRITICAL_PERCENT,
        }
    }
}

impl UsageBands {
    /// Tier for a usage percentage
    pub fn tier(&self, value: f64) -> HealthTier {
        if value.is_nan() {
            HealthTier::Indeterminate
        } else if value >= self.critical_at {
            HealthTier::Critical
        } else if value >= self.warning_at {
            HealthTier::Warning
        } else {
            HealthTier::Healthy
        }
    }

    /// Whether the bands are ordered
    pub fn is_valid(&self) -> bool {
        self.warning_at.is_finite() && self.critical_at.is_finite() && self.warning_at <= self.critical_at
    }
}

/// Bands for metrics where higher is better
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeBands {
    /// At or above this is Healthy
    pub healthy_at: f64,
    /// At or above this (and below healthy) is Warning, lower is Critical
    pub warning_at: f64,
}

impl Default for ChargeBands {
    fn default() -> Self {
        Self {
            healthy_at: CHARGE_HEALTHY_PERCENT,
            warning_at: CHARGE_WARNING_PERCENT,
        }
    }
}

impl ChargeBands {
    /// Tier for a charge percentage
    pub fn tier(&self, value: f64) -> HealthTier {
        if value.is_nan() {
            HealthTier::Indeterminate
        } else if value >= self.healthy_at {
            HealthTier::Healthy
        } else if value >= self.warning_at {
            HealthTier::Warning
        } else {
            HealthTier::Critical
        }
    }

    /// Whether the bands are ordered
    pub fn is_valid(&self) -> bool {
        self.warning_at.is_finite() && self.healthy_at.is_finite() && self.warning_at <= self.healthy_at
    }
}

/// Badge band for knowledge-article confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceBand {
    /// Strong match
    A,
    /// Good match
    B,
    /// Weak match
    C,
    /// Poor match
    D,
    /// No score reported
    Unscored,
}

impl ConfidenceBand {
    /// Badge color token; these carry no health meaning
    pub fn badge(&self) -> &'static str {
        match self {
            ConfidenceBand::A => "green",
            ConfidenceBand::B => "blue",
            ConfidenceBand::C => "yellow",
            ConfidenceBand::D => "red",
            ConfidenceBand::Unscored => "neutral",
        }
    }
}

/// Four-band table for knowledge-article confidence (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBands {
    /// At or above this is band A
    pub a_at: f64,
    /// At or above this is band B
    pub b_at: f64,
    /// At or above this is band C, lower is band D
    pub c_at: f64,
}

impl Default for ConfidenceBands {
    fn default() -> Self {
        Self {
            a_at: CONFIDENCE_BAND_A,
            b_at: CONFIDENCE_BAND_B,
            c_at: CONFIDENCE_BAND_C,
        }
    }
}

impl ConfidenceBands {
    /// Band for a confidence score
    pub fn band(&self, value: MetricValue) -> ConfidenceBand {
        match value.value() {
            None => ConfidenceBand::Unscored,
            Some(v) if v >= self.a_at => ConfidenceBand::A,
            Some(v) if v >= self.b_at => ConfidenceBand::B,
            Some(v) if v >= self.c_at => ConfidenceBand::C,
            Some(_) => ConfidenceBand::D,
        }
    }

    /// Whether the bands are ordered
    pub fn is_valid(&self) -> bool {
        [self.a_at, self.b_at, self.c_at].iter().all(|v| v.is_finite())
            && self.c_at <= self.b_at
            && self.b_at <= self.a_at
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFIER
// ═══════════════════════════════════════════════════════════════════════════════

/// Stateless classifier over the configured band tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricClassifier {
    /// CPU/RAM/disk bands
    pub usage: UsageBands,
    /// Battery bands
    pub charge: ChargeBands,
    /// Knowledge confidence bands
    pub confidence: ConfidenceBands,
}

impl MetricClassifier {
    /// Create classifier from band tables
    pub fn new(usage: UsageBands, charge: ChargeBands, confidence: ConfidenceBands) -> Self {
        Self {
            usage,
            charge,
            confidence,
        }
    }

    /// Classify a usage metric (higher is worse)
    pub fn classify_usage(&self, value: impl Into<MetricValue>) -> Classification {
        match value.into().value() {
            Some(v) => Classification::of(self.usage.tier(v)),
            None => Classification::indeterminate(),
        }
    }

    /// Classify a charge metric (higher is better)
    pub fn classify_charge(&self, value: impl Into<MetricValue>) -> Classification {
        match value.into().value() {
            Some(v) => Classification::of(self.charge.tier(v)),
            None => Classification::indeterminate(),
        }
    }

    /// Badge band for a knowledge-article confidence score
    pub fn confidence_band(&self, value: impl Into<MetricValue>) -> ConfidenceBand {
        self.confidence.band(value.into())
    }
}

/// Classify a usage percentage with the default bands
pub fn classify(value: impl Into<MetricValue>) -> Classification {
    MetricClassifier::default().classify_usage(value)
}
