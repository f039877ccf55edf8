//! Cockpit configuration.
//!
//! Every threshold the classification engine uses can be overridden from a
//! JSON file or the environment. Defaults reproduce the dashboard's
//! built-in tables:
//! - Band tables: usage, charge and knowledge confidence (kept separate)
//! - Composite score weights
//! - Categorical vocabulary for the OS, security and services sections
//! - Monitoring and recommendation limits

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::health::classifier::{ChargeBands, ConfidenceBands, UsageBands};
use crate::health::scorer::ScoreWeights;
use crate::health::sections::VocabularyTable;
use crate::utils::constants::*;

/// Environment variable naming a JSON config file
pub const CONFIG_PATH_ENV: &str = "COCKPIT_CONFIG";

// ═══════════════════════════════════════════════════════════════════════════════
// SUB-SECTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Service uptime monitoring settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Health checks retained per service
    pub max_history: usize,
    /// Default uptime window in hours
    pub default_window_hours: i64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            max_history: MAX_HEALTH_HISTORY,
            default_window_hours: DEFAULT_UPTIME_WINDOW_HOURS,
        }
    }
}

/// Remote action recommendation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Maximum recommendations returned
    pub default_limit: usize,
    /// Days of remote action history considered
    pub lookback_days: i64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_RECOMMENDATION_LIMIT,
            lookback_days: DEFAULT_ACTION_LOOKBACK_DAYS,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COCKPIT CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CockpitConfig {
    /// CPU/RAM/disk bands
    pub usage_bands: UsageBands,
    /// Battery bands
    pub charge_bands: ChargeBands,
    /// Knowledge-article confidence bands
    pub confidence_bands: ConfidenceBands,
    /// Composite score weights
    pub score_weights: ScoreWeights,
    /// Categorical section vocabulary
    pub vocabulary: VocabularyTable,
    /// Uptime monitoring
    pub monitoring: MonitoringConfig,
    /// Recommendations
    pub recommendations: RecommendationConfig,
}

impl Default for CockpitConfig {
    fn default() -> Self {
        Self {
            usage_bands: UsageBands::default(),
            charge_bands: ChargeBands::default(),
            confidence_bands: ConfidenceBands::default(),
            score_weights: ScoreWeights::default(),
            vocabulary: VocabularyTable::default(),
            monitoring: MonitoringConfig::default(),
            recommendations: RecommendationConfig::default(),
        }
    }
}

impl CockpitConfig {
    /// Load from a JSON file; missing keys take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigIo(format!("{}: {}", path.display(), e)))?;

        let config: Self =
            serde_json::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::ConfigIo(e.to_string()))?;
        }

        std::fs::write(path, content).map_err(|e| Error::ConfigIo(e.to_string()))
    }

    /// Load from `COCKPIT_CONFIG` if set, then apply `COCKPIT_*` overrides
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load(&PathBuf::from(path))?,
            Err(_) => Self::default(),
        };

        if let Some(hours) = env_parse("COCKPIT_STALE_SYNC_HOURS") {
            config.score_weights.stale_sync_hours = hours;
        }

        if let Some(limit) = env_parse("COCKPIT_RECOMMENDATION_LIMIT") {
            config.recommendations.default_limit = limit;
        }

        if let Some(days) = env_parse("COCKPIT_ACTION_LOOKBACK_DAYS") {
            config.recommendations.lookback_days = days;
        }

        if let Some(size) = env_parse("COCKPIT_MAX_HEALTH_HISTORY") {
            config.monitoring.max_history = size;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.usage_bands.is_valid() {
            return Err(Error::ConfigValidation(
                "usage_bands: warning_at must not exceed critical_at".into(),
            ));
        }

        if !self.charge_bands.is_valid() {
            return Err(Error::ConfigValidation(
                "charge_bands: warning_at must not exceed healthy_at".into(),
            ));
        }

        if !self.confidence_bands.is_valid() {
            return Err(Error::ConfigValidation(
                "confidence_bands: expected c_at <= b_at <= a_at".into(),
            ));
        }

        if !self.score_weights.is_valid() {
            return Err(Error::ConfigValidation(
                "score_weights: deductions must be non-negative and cut-offs ordered".into(),
            ));
        }

        if let Some((field, value)) = self.vocabulary.conflicts().into_iter().next() {
            return Err(Error::ConfigValidation(format!(
                "vocabulary: {:?} value '{}' is both critical and warning",
                field, value
            )));
        }

        if self.monitoring.max_history == 0 {
            return Err(Error::ConfigValidation("monitoring.max_history must be greater than 0".into()));
        }

        if !(1..=MAX_UPTIME_WINDOW_HOURS).contains(&self.monitoring.default_window_hours) {
            return Err(Error::ConfigValidation(format!(
                "monitoring.default_window_hours must be between 1 and {}",
                MAX_UPTIME_WINDOW_HOURS
            )));
        }

        if self.recommendations.default_limit == 0 {
            return Err(Error::ConfigValidation(
                "recommendations.default_limit must be greater than 0".into(),
            ));
        }

        if !(1..=MAX_ACTION_LOOKBACK_DAYS).contains(&self.recommendations.lookback_days) {
            return Err(Error::ConfigValidation(format!(
                "recommendations.lookback_days must be between 1 and {}",
                MAX_ACTION_LOOKBACK_DAYS
            )));
        }

        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
