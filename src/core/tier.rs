//! Three-tier health model shared by every classifier.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// HEALTH TIER
// ═══════════════════════════════════════════════════════════════════════════════

/// Coarse display classification of a metric, score or section
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthTier {
    /// Within normal range
    Healthy,
    /// Needs attention soon
    Warning,
    /// Needs attention now
    Critical,
    /// No data to classify
    Indeterminate,
}

impl HealthTier {
    /// Get display string
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthTier::Healthy => "Healthy",
            HealthTier::Warning => "Warning",
            HealthTier::Critical => "Critical",
            HealthTier::Indeterminate => "Not Available",
        }
    }

    /// Color token used by the rendering layer
    pub fn color(&self) -> ColorToken {
        match self {
            HealthTier::Healthy => ColorToken::Green,
            HealthTier::Warning => ColorToken::Orange,
            HealthTier::Critical => ColorToken::Red,
            HealthTier::Indeterminate => ColorToken::Neutral,
        }
    }

    /// Whether this tier makes a numeric claim about the device
    pub fn is_determinate(&self) -> bool {
        !matches!(self, HealthTier::Indeterminate)
    }

    /// Severity rank, Indeterminate ranks below Healthy
    pub fn severity(&self) -> u8 {
        match self {
            HealthTier::Indeterminate => 0,
            HealthTier::Healthy => 1,
            HealthTier::Warning => 2,
            HealthTier::Critical => 3,
        }
    }

    /// Most severe of a set of tiers, Indeterminate if the set is empty
    /// or carries no data
    pub fn worst<I: IntoIterator<Item = HealthTier>>(tiers: I) -> HealthTier {
        tiers
            .into_iter()
            .max_by_key(HealthTier::severity)
            .unwrap_or(HealthTier::Indeterminate)
    }
}

impl std::fmt::Display for HealthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COLOR TOKEN
// ═══════════════════════════════════════════════════════════════════════════════

/// Fixed palette the dashboard maps tiers onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    /// Healthy
    Green,
    /// Warning
    Orange,
    /// Critical
    Red,
    /// Unknown / not available
    Neutral,
}

impl ColorToken {
    /// CSS-friendly token name
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorToken::Green => "green",
            ColorToken::Orange => "orange",
            ColorToken::Red => "red",
            ColorToken::Neutral => "neutral",
        }
    }
}
