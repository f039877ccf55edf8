//! Classification constants and fixed vocabulary.
//!
//! All default thresholds, deductions and categorical values are defined
//! here so the rule tables can be audited in one place. The runtime values
//! come from [`crate::core::config::CockpitConfig`], whose defaults are
//! built from these constants.

// ═══════════════════════════════════════════════════════════════════════════════
// USAGE METRICS (higher is worse)
// ═══════════════════════════════════════════════════════════════════════════════

/// CPU/RAM/disk usage at or above this percentage is Warning
pub const USAGE_WARNING_PERCENT: f64 = 60.0;

/// CPU/RAM/disk usage at or above this percentage is Critical
pub const USAGE_CRITICAL_PERCENT: f64 = 80.0;

// ═══════════════════════════════════════════════════════════════════════════════
// CHARGE METRICS (higher is better)
// ═══════════════════════════════════════════════════════════════════════════════

/// Battery charge at or above this percentage is Healthy
pub const CHARGE_HEALTHY_PERCENT: f64 = 60.0;

/// Battery charge at or above this percentage (and below healthy) is Warning
pub const CHARGE_WARNING_PERCENT: f64 = 20.0;

// ═══════════════════════════════════════════════════════════════════════════════
// KNOWLEDGE CONFIDENCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Confidence at or above this is band A
pub const CONFIDENCE_BAND_A: f64 = 80.0;

/// Confidence at or above this is band B
pub const CONFIDENCE_BAND_B: f64 = 60.0;

/// Confidence at or above this is band C; anything lower is band D
pub const CONFIDENCE_BAND_C: f64 = 40.0;

// ═══════════════════════════════════════════════════════════════════════════════
// COMPOSITE DEVICE SCORE
// ═══════════════════════════════════════════════════════════════════════════════

/// Starting score before deductions
pub const SCORE_BASE: i32 = 100;

/// Largest accepted base score or single deduction
pub const MAX_SCORE_WEIGHT: i32 = 1_000;

/// Deduction for a device that is not compliant
pub const NON_COMPLIANCE_DEDUCTION: i32 = 40;

/// Deduction for memory/disk usage above [`USAGE_SEVERE_ABOVE`]
pub const USAGE_SEVERE_DEDUCTION: i32 = 20;

/// Deduction for memory/disk usage above [`USAGE_ELEVATED_ABOVE`]
pub const USAGE_ELEVATED_DEDUCTION: i32 = 10;

/// Usage strictly above this is severe
pub const USAGE_SEVERE_ABOVE: f64 = 90.0;

/// Usage strictly above this is elevated
pub const USAGE_ELEVATED_ABOVE: f64 = 80.0;

/// Deduction when the last sync is older than [`STALE_SYNC_HOURS`]
pub const STALE_SYNC_DEDUCTION: i32 = 15;

/// Hours since last sync after which the device counts as stale
pub const STALE_SYNC_HOURS: f64 = 48.0;

/// Deduction when there is no connection type and no IP address
pub const NO_CONNECTIVITY_DEDUCTION: i32 = 15;

/// Scores at or above this are Healthy
pub const SCORE_HEALTHY_MIN: i32 = 80;

/// Scores at or above this (and below healthy) are Warning
pub const SCORE_WARNING_MIN: i32 = 50;

/// Compliance value that avoids the non-compliance deduction
pub const COMPLIANT_STATE: &str = "compliant";

/// Literal sync value reported for devices that never synced
pub const NEVER_SYNCED: &str = "Never synced";

/// Display text for absent values
pub const NOT_AVAILABLE: &str = "Not Available";

// ═══════════════════════════════════════════════════════════════════════════════
// SECTION VOCABULARY
// ═══════════════════════════════════════════════════════════════════════════════

/// Driver health values
pub const DRIVER_HEALTH_VALUES: &[&str] = &["Good", "Outdated", "Critical"];

/// Restart status values
pub const RESTART_STATUS_VALUES: &[&str] =
    &["No Restart Pending", "Restart Required", "Update Pending"];

/// Disk encryption values
pub const ENCRYPTION_VALUES: &[&str] = &["BitLocker Enabled", "Encrypting", "Not Encrypted"];

/// Antivirus values
pub const ANTIVIRUS_VALUES: &[&str] = &["Windows Defender Active", "Antivirus Disabled"];

/// Vulnerability scan summaries
pub const VULNERABILITY_SCAN_VALUES: &[&str] = &["No Vulnerabilities", "2 Low Risk", "5 Critical"];

/// Services health summaries
pub const SERVICES_HEALTH_VALUES: &[&str] =
    &["All Services Running", "2 Services Stopped", "Critical Service Down"];

// ═══════════════════════════════════════════════════════════════════════════════
// MONITORING & RECOMMENDATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Health checks kept per service (about 3-4 days at 5 minute intervals)
pub const MAX_HEALTH_HISTORY: usize = 1000;

/// Default uptime window in hours
pub const DEFAULT_UPTIME_WINDOW_HOURS: i64 = 24;

/// Default number of recommended actions
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;

/// Default lookback for remote action history in days
pub const DEFAULT_ACTION_LOOKBACK_DAYS: i64 = 7;

/// Longest accepted uptime window (ten years)
pub const MAX_UPTIME_WINDOW_HOURS: i64 = 24 * 3_650;

/// Longest accepted action lookback (ten years)
pub const MAX_ACTION_LOOKBACK_DAYS: i64 = 3_650;

/// Relevance score ceiling for recommended actions
pub const MAX_RELEVANCE_SCORE: f64 = 100.0;
