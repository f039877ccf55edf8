//! Composite Health Scorer.
//!
//! Scores a device snapshot from the device-management system with a fixed
//! weighted-deduction model: start at 100, subtract independent penalties
//! for non-compliance, memory/disk pressure, stale sync and missing
//! connectivity, then band the result into a tier.
//!
//! The score is deliberately left unclamped. A fully degraded device scores
//! -10 with the default weights and still bands as Critical.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::core::tier::HealthTier;
use crate::utils::constants::*;
use crate::utils::parsing::{parse_percent, parse_timestamp};

// ═══════════════════════════════════════════════════════════════════════════════
// DEVICE SNAPSHOT
// ═══════════════════════════════════════════════════════════════════════════════

/// Point-in-time device attributes backing the composite score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSnapshot {
    /// Compliance state, compared case-insensitively to "compliant"
    #[serde(default, deserialize_with = "null_as_empty")]
    pub compliance_state: String,
    /// Memory usage percent as reported (numeric string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<String>,
    /// Disk usage percent as reported (numeric string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_usage: Option<String>,
    /// ISO 8601 timestamp or the literal "Never synced"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_date_time: Option<String>,
    /// Connection type (Wi-Fi, Ethernet, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    /// Last known IP address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl DeviceSnapshot {
    /// Create snapshot with a compliance state and nothing else
    pub fn new(compliance_state: impl Into<String>) -> Self {
        Self {
            compliance_state: compliance_state.into(),
            ..Default::default()
        }
    }

    /// Set memory usage
    pub fn with_memory_usage(mut self, percent: impl Into<String>) -> Self {
        self.memory_usage = Some(percent.into());
        self
    }

    /// Set disk usage
    pub fn with_disk_usage(mut self, percent: impl Into<String>) -> Self {
        self.disk_usage = Some(percent.into());
        self
    }

    /// Set last sync timestamp
    pub fn with_last_sync(mut self, last_sync: impl Into<String>) -> Self {
        self.last_sync_date_time = Some(last_sync.into());
        self
    }

    /// Set connection type
    pub fn with_connection_type(mut self, connection_type: impl Into<String>) -> Self {
        self.connection_type = Some(connection_type.into());
        self
    }

    /// Set IP address
    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    /// Whether the device reports as compliant
    pub fn is_compliant(&self) -> bool {
        self.compliance_state.trim().eq_ignore_ascii_case(COMPLIANT_STATE)
    }

    /// Parsed memory usage, if present and numeric
    pub fn memory_percent(&self) -> Option<f64> {
        self.memory_usage.as_deref().and_then(parse_percent)
    }

    /// Parsed disk usage, if present and numeric
    pub fn disk_percent(&self) -> Option<f64> {
        self.disk_usage.as_deref().and_then(parse_percent)
    }

    /// Whether either connectivity field is populated
    pub fn has_connectivity(&self) -> bool {
        is_present(&self.connection_type) || is_present(&self.ip_address)
    }
}

fn is_present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCORE WEIGHTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Deductions and cut-offs of the composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Starting score
    pub base: i32,
    /// Penalty for non-compliance
    pub non_compliance: i32,
    /// Penalty for usage above `usage_severe_above`
    pub usage_severe: i32,
    /// Penalty for usage above `usage_elevated_above`
    pub usage_elevated: i32,
    /// Severe usage cut-off (strictly above)
    pub usage_severe_above: f64,
    /// Elevated usage cut-off (strictly above)
    pub usage_elevated_above: f64,
    /// Penalty for a stale sync
    pub stale_sync: i32,
    /// Hours after which a sync is stale (strictly above)
    pub stale_sync_hours: f64,
    /// Penalty for no connectivity data
    pub no_connectivity: i32,
    /// Minimum Healthy score
    pub healthy_min: i32,
    /// Minimum Warning score
    pub warning_min: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            base: SCORE_BASE,
            non_compliance: NON_COMPLIANCE_DEDUCTION,
            usage_severe: USAGE_SEVERE_DEDUCTION,
            usage_elevated: USAGE_ELEVATED_DEDUCTION,
            usage_severe_above: USAGE_SEVERE_ABOVE,
            usage_elevated_above: USAGE_ELEVATED_ABOVE,
            stale_sync: STALE_SYNC_DEDUCTION,
            stale_sync_hours: STALE_SYNC_HOURS,
            no_connectivity: NO_CONNECTIVITY_DEDUCTION,
            healthy_min: SCORE_HEALTHY_MIN,
            warning_min: SCORE_WARNING_MIN,
        }
    }
}

impl ScoreWeights {
    /// Band a score into a tier
    pub fn tier_for(&self, score: i32) -> HealthTier {
        if score >= self.healthy_min {
            HealthTier::Healthy
        } else if score >= self.warning_min {
            HealthTier::Warning
        } else {
            HealthTier::Critical
        }
    }

    /// Penalty for a usage percentage
    fn usage_penalty(&self, percent: f64) -> i32 {
        if percent > self.usage_severe_above {
            self.usage_severe
        } else if percent > self.usage_elevated_above {
            self.usage_elevated
        } else {
            0
        }
    }

    /// Whether the weights are internally consistent
    pub fn is_valid(&self) -> bool {
        self.warning_min <= self.healthy_min
            && self.usage_elevated_above <= self.usage_severe_above
            && self.stale_sync_hours >= 0.0
            && (-MAX_SCORE_WEIGHT..=MAX_SCORE_WEIGHT).contains(&self.base)
            && [self.non_compliance, self.usage_severe, self.usage_elevated, self.stale_sync, self.no_connectivity]
                .iter()
                .all(|p| (0..=MAX_SCORE_WEIGHT).contains(p))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCORE RESULT
// ═══════════════════════════════════════════════════════════════════════════════

/// Factor that can reduce the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    /// Device is not compliant
    NonCompliance,
    /// Memory usage is elevated or severe
    MemoryUsage,
    /// Disk usage is elevated or severe
    DiskUsage,
    /// Device has not synced recently
    StaleSync,
    /// No connection type or IP address
    NoConnectivity,
}

impl ScoreFactor {
    /// Short label for badges
    pub fn label(&self) -> &'static str {
        match self {
            ScoreFactor::NonCompliance => "Not compliant",
            ScoreFactor::MemoryUsage => "High memory usage",
            ScoreFactor::DiskUsage => "High disk usage",
            ScoreFactor::StaleSync => "Sync overdue",
            ScoreFactor::NoConnectivity => "No connectivity data",
        }
    }
}

/// Applied deduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    /// Factor
    pub factor: ScoreFactor,
    /// Points removed
    pub points: i32,
}

/// What is known about the last sync
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncRecency {
    /// Synced within the stale window
    Recent {
        /// Hours since sync
        hours: f64,
    },
    /// Synced longer ago than the stale window
    Stale {
        /// Hours since sync
        hours: f64,
    },
    /// Device reports it never synced
    NeverSynced,
    /// Sync time missing or unparseable
    Unknown,
}

/// Composite score and its tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceHealthScore {
    /// Score, unclamped
    pub score: i32,
    /// Tier derived from the score
    pub tier: HealthTier,
    /// Deductions in evaluation order
    pub deductions: Vec<Deduction>,
    /// Sync recency used for the stale-sync check
    pub sync: SyncRecency,
}

impl DeviceHealthScore {
    /// Score clamped to 0..=100 for gauges that cannot draw negatives
    pub fn display_score(&self) -> u8 {
        self.score.clamp(0, 100) as u8
    }

    /// Whether a factor contributed
    pub fn has_factor(&self, factor: ScoreFactor) -> bool {
        self.deductions.iter().any(|d| d.factor == factor)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HEALTH SCORER
// ═══════════════════════════════════════════════════════════════════════════════

/// Computes the composite device score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthScorer {
    weights: ScoreWeights,
}

impl HealthScorer {
    /// Create scorer with custom weights
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Weights in use
    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Score a snapshot against an explicit "now"
    pub fn score(&self, snapshot: &DeviceSnapshot, now: DateTime<Utc>) -> DeviceHealthScore {
        let weights = &self.weights;
        let mut deductions = Vec::new();

        if !snapshot.is_compliant() {
            deductions.push(Deduction {
                factor: ScoreFactor::NonCompliance,
                points: weights.non_compliance,
            });
        }

        for (factor, percent) in [
            (ScoreFactor::MemoryUsage, snapshot.memory_percent()),
            (ScoreFactor::DiskUsage, snapshot.disk_percent()),
        ] {
            let points = percent.map(|p| weights.usage_penalty(p)).unwrap_or(0);
            if points > 0 {
                deductions.push(Deduction { factor, points });
            }
        }

        let sync = self.sync_recency(snapshot.last_sync_date_time.as_deref(), now);
        if matches!(sync, SyncRecency::Stale { .. }) {
            deductions.push(Deduction {
                factor: ScoreFactor::StaleSync,
                points: weights.stale_sync,
            });
        }

        if !snapshot.has_connectivity() {
            deductions.push(Deduction {
                factor: ScoreFactor::NoConnectivity,
                points: weights.no_connectivity,
            });
        }

        let score = deductions
            .iter()
            .fold(weights.base, |acc, d| acc.saturating_sub(d.points));

        DeviceHealthScore {
            score,
            tier: weights.tier_for(score),
            deductions,
            sync,
        }
    }

    /// Score a snapshot against the wall clock
    pub fn score_now(&self, snapshot: &DeviceSnapshot) -> DeviceHealthScore {
        self.score(snapshot, Utc::now())
    }

    /// Classify the last sync relative to `now`
    pub fn sync_recency(&self, last_sync: Option<&str>, now: DateTime<Utc>) -> SyncRecency {
        let Some(raw) = last_sync else {
            return SyncRecency::Unknown;
        };

        if raw.trim() == NEVER_SYNCED {
            return SyncRecency::NeverSynced;
        }

        match parse_timestamp(raw) {
            Some(synced_at) => {
                let hours = (now - synced_at).num_seconds() as f64 / 3600.0;
                if hours > self.weights.stale_sync_hours {
                    SyncRecency::Stale { hours }
                } else {
                    SyncRecency::Recent { hours }
                }
            }
            None => {
                debug!(last_sync = raw, "Unparseable sync timestamp, skipping recency deduction");
                SyncRecency::Unknown
            }
        }
    }
}

/// Score a snapshot with the default weights
pub fn score(snapshot: &DeviceSnapshot, now: DateTime<Utc>) -> DeviceHealthScore {
    HealthScorer::default().score(snapshot, now)
}
