//! External Service Uptime Tracking.
//!
//! Keeps a bounded history of health checks per backing service and derives
//! uptime percentages and downtime periods over a look-back window.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::config::MonitoringConfig;
use crate::error::{Error, Result};
use crate::utils::constants::MAX_HEALTH_HISTORY;
use crate::utils::parsing::round2;

// ═══════════════════════════════════════════════════════════════════════════════
// SERVICES AND STATES
// ═══════════════════════════════════════════════════════════════════════════════

/// Backing services the cockpit depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExternalService {
    /// Incident management
    ServiceNow,
    /// Device management
    Intune,
    /// Endpoint experience
    NextThink,
}

impl ExternalService {
    /// Get all services
    pub fn all() -> &'static [ExternalService] {
        &[
            ExternalService::ServiceNow,
            ExternalService::Intune,
            ExternalService::NextThink,
        ]
    }

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            ExternalService::ServiceNow => "ServiceNow",
            ExternalService::Intune => "Intune",
            ExternalService::NextThink => "NextThink",
        }
    }
}

impl fmt::Display for ExternalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExternalService {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|svc| svc.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownService(name.to_string()))
    }
}

/// Outcome of a single health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Service responded
    Healthy,
    /// Service failed
    Unhealthy,
}

/// Last known state of a service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    /// Last check succeeded
    Healthy,
    /// Last check failed
    Unhealthy,
    /// No check since start or clear
    #[default]
    Unknown,
}

impl From<CheckStatus> for ServiceState {
    fn from(status: CheckStatus) -> Self {
        match status {
            CheckStatus::Healthy => ServiceState::Healthy,
            CheckStatus::Unhealthy => ServiceState::Unhealthy,
        }
    }
}

/// A recorded health check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckRecord {
    /// Service checked
    pub service: ExternalService,
    /// Outcome
    pub status: CheckStatus,
    /// When the check ran
    pub timestamp: DateTime<Utc>,
    /// Failure detail
    pub error: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATISTICS
// ═══════════════════════════════════════════════════════════════════════════════

/// End of a downtime period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodEnd {
    /// First healthy check after the outage
    Ended(DateTime<Utc>),
    /// Still down at the end of the window
    Ongoing,
}

/// Consecutive unhealthy checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DowntimePeriod {
    /// First unhealthy check
    pub start: DateTime<Utc>,
    /// Recovery or ongoing
    pub end: PeriodEnd,
    /// Minutes, two decimals
    pub duration_minutes: f64,
}

impl DowntimePeriod {
    /// True if the service has not recovered
    pub fn is_ongoing(&self) -> bool {
        self.end == PeriodEnd::Ongoing
    }
}

/// Uptime over a look-back window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UptimeStats {
    /// Service
    pub service: ExternalService,
    /// Window length
    pub window_hours: i64,
    /// Last known state
    pub current_status: ServiceState,
    /// Last transition between states
    pub last_state_change: Option<DateTime<Utc>>,
    /// Checks in window
    pub total_checks: usize,
    /// Healthy checks in window
    pub healthy_checks: usize,
    /// Unhealthy checks in window
    pub unhealthy_checks: usize,
    /// Healthy share, two decimals
    pub uptime_percentage: f64,
    /// Unhealthy share, two decimals
    pub downtime_percentage: f64,
    /// Sum of downtime period durations
    pub total_downtime_minutes: f64,
    /// Outages in window, oldest first
    pub downtime_periods: Vec<DowntimePeriod>,
    /// Oldest check in window
    pub first_check: Option<DateTime<Utc>>,
    /// Newest check in window
    pub last_check: Option<DateTime<Utc>>,
}

impl UptimeStats {
    /// True if any check fell in the window
    pub fn has_data(&self) -> bool {
        self.total_checks > 0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRACKER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
struct ServiceHistory {
    records: VecDeque<HealthCheckRecord>,
    current: ServiceState,
    last_state_change: Option<DateTime<Utc>>,
}

/// Health check history for all external services
#[derive(Debug, Clone)]
pub struct ServiceHealthTracker {
    /// Checks retained per service
    max_history: usize,
    /// Per-service history
    services: HashMap<ExternalService, ServiceHistory>,
}

impl Default for ServiceHealthTracker {
    fn default() -> Self {
        Self::new(MAX_HEALTH_HISTORY)
    }
}

impl ServiceHealthTracker {
    /// Create tracker retaining `max_history` checks per service
    pub fn new(max_history: usize) -> Self {
        let services = ExternalService::all()
            .iter()
            .map(|svc| (*svc, ServiceHistory::default()))
            .collect();

        Self {
            max_history: max_history.max(1),
            services,
        }
    }

    /// Create from configuration
    pub fn from_config(config: &MonitoringConfig) -> Self {
        Self::new(config.max_history)
    }

    fn history(&self, service: ExternalService) -> Option<&ServiceHistory> {
        self.services.get(&service)
    }

    /// Record a check result
    pub fn record(
        &mut self,
        service: ExternalService,
        status: CheckStatus,
        error: Option<String>,
        at: DateTime<Utc>,
    ) {
        let max_history = self.max_history;
        let history = self.services.entry(service).or_default();

        if history.records.len() >= max_history {
            history.records.pop_front();
        }
        history.records.push_back(HealthCheckRecord {
            service,
            status,
            timestamp: at,
            error,
        });

        let new_state = ServiceState::from(status);
        if history.current != new_state {
            info!(
                service = %service,
                previous_state = ?history.current,
                new_state = ?new_state,
                "Service state changed"
            );
            history.current = new_state;
            history.last_state_change = Some(at);
        }
    }

    /// Record a check for a service given by name
    pub fn record_named(
        &mut self,
        service: &str,
        status: CheckStatus,
        error: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let service = service.parse::<ExternalService>().map_err(|e| {
            warn!(service, "Unknown service");
            e
        })?;
        self.record(service, status, error, at);
        Ok(())
    }

    /// Last known state
    pub fn current_state(&self, service: ExternalService) -> ServiceState {
        self.history(service).map(|h| h.current).unwrap_or_default()
    }

    /// Last transition time
    pub fn last_state_change(&self, service: ExternalService) -> Option<DateTime<Utc>> {
        self.history(service).and_then(|h| h.last_state_change)
    }

    /// Uptime over the last `hours` ending at `now`
    pub fn uptime_stats(&self, service: ExternalService, hours: i64, now: DateTime<Utc>) -> UptimeStats {
        let cutoff = Duration::try_hours(hours)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let recent: Vec<&HealthCheckRecord> = self
            .history(service)
            .map(|h| h.records.iter().filter(|r| r.timestamp >= cutoff).collect())
            .unwrap_or_default();

        let total_checks = recent.len();
        let healthy_checks = recent
            .iter()
            .filter(|r| r.status == CheckStatus::Healthy)
            .count();
        let unhealthy_checks = total_checks - healthy_checks;

        let (uptime_percentage, downtime_percentage) = if total_checks > 0 {
            let uptime = healthy_checks as f64 / total_checks as f64 * 100.0;
            (round2(uptime), round2(100.0 - uptime))
        } else {
            (0.0, 0.0)
        };

        let downtime_periods = find_downtime_periods(&recent, now);
        let total_downtime_minutes = round2(downtime_periods.iter().map(|p| p.duration_minutes).sum());

        UptimeStats {
            service,
            window_hours: hours,
            current_status: self.current_state(service),
            last_state_change: self.last_state_change(service),
            total_checks,
            healthy_checks,
            unhealthy_checks,
            uptime_percentage,
            downtime_percentage,
            total_downtime_minutes,
            downtime_periods,
            first_check: recent.first().map(|r| r.timestamp),
            last_check: recent.last().map(|r| r.timestamp),
        }
    }

    /// Uptime for every service
    pub fn all_stats(&self, hours: i64, now: DateTime<Utc>) -> Vec<UptimeStats> {
        ExternalService::all()
            .iter()
            .map(|svc| self.uptime_stats(*svc, hours, now))
            .collect()
    }

    /// Most recent checks first
    pub fn recent_history(&self, service: ExternalService, limit: usize) -> Vec<&HealthCheckRecord> {
        self.history(service)
            .map(|h| h.records.iter().rev().take(limit).collect())
            .unwrap_or_default()
    }

    /// Clear one service, or all when `None`
    pub fn clear(&mut self, service: Option<ExternalService>) {
        match service {
            Some(svc) => {
                self.services.insert(svc, ServiceHistory::default());
                info!(service = %svc, "Cleared health check history");
            }
            None => {
                for history in self.services.values_mut() {
                    *history = ServiceHistory::default();
                }
                info!("Cleared all health check history");
            }
        }
    }
}

fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    round2((end - start).num_milliseconds() as f64 / 60_000.0)
}

fn find_downtime_periods(records: &[&HealthCheckRecord], now: DateTime<Utc>) -> Vec<DowntimePeriod> {
    let mut periods = Vec::new();
    let mut start: Option<DateTime<Utc>> = None;

    for record in records {
        match (record.status, start) {
            (CheckStatus::Unhealthy, None) => start = Some(record.timestamp),
            (CheckStatus::Healthy, Some(began)) => {
                periods.push(DowntimePeriod {
                    start: began,
                    end: PeriodEnd::Ended(record.timestamp),
                    duration_minutes: minutes_between(began, record.timestamp),
                });
                start = None;
            }
            _ => {}
        }
    }

    if let Some(began) = start {
        periods.push(DowntimePeriod {
            start: began,
            end: PeriodEnd::Ongoing,
            duration_minutes: minutes_between(began, now),
        });
    }

    periods
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn minutes(m: i64) -> DateTime<Utc> {
        t0() + Duration::minutes(m)
    }

    #[test]
    fn test_service_parse() {
        assert_eq!("intune".parse::<ExternalService>().unwrap(), ExternalService::Intune);
        assert_eq!(" NextThink ".parse::<ExternalService>().unwrap(), ExternalService::NextThink);

        let err = "Jira".parse::<ExternalService>().unwrap_err();
        assert_eq!(err, Error::UnknownService("Jira".into()));
        assert_eq!(err.code(), 2002);
    }

    #[test]
    fn test_record_tracks_state_changes() {
        let mut tracker = ServiceHealthTracker::default();
        assert_eq!(tracker.current_state(ExternalService::Intune), ServiceState::Unknown);

        tracker.record(ExternalService::Intune, CheckStatus::Healthy, None, minutes(0));
        tracker.record(ExternalService::Intune, CheckStatus::Healthy, None, minutes(5));
        assert_eq!(tracker.last_state_change(ExternalService::Intune), Some(minutes(0)));

        tracker.record(ExternalService::Intune, CheckStatus::Unhealthy, Some("timeout".into()), minutes(10));
        assert_eq!(tracker.current_state(ExternalService::Intune), ServiceState::Unhealthy);
        assert_eq!(tracker.last_state_change(ExternalService::Intune), Some(minutes(10)));
        assert_eq!(tracker.current_state(ExternalService::ServiceNow), ServiceState::Unknown);
    }

    #[test]
    fn test_record_named_rejects_unknown() {
        let mut tracker = ServiceHealthTracker::default();
        assert!(tracker.record_named("servicenow", CheckStatus::Healthy, None, t0()).is_ok());
        assert!(matches!(
            tracker.record_named("Okta", CheckStatus::Healthy, None, t0()),
            Err(Error::UnknownService(_))
        ));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut tracker = ServiceHealthTracker::new(3);
        for m in 0..5 {
            tracker.record(ExternalService::NextThink, CheckStatus::Healthy, None, minutes(m));
        }
        let recent = tracker.recent_history(ExternalService::NextThink, 10);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].timestamp, minutes(4));
        assert_eq!(recent[2].timestamp, minutes(2));
        assert_eq!(tracker.recent_history(ExternalService::NextThink, 1).len(), 1);
    }

    #[test]
    fn test_uptime_stats_with_periods() {
        let mut tracker = ServiceHealthTracker::default();
        let svc = ExternalService::ServiceNow;
        let statuses = [
            CheckStatus::Healthy,
            CheckStatus::Unhealthy,
            CheckStatus::Unhealthy,
            CheckStatus::Healthy,
            CheckStatus::Unhealthy,
        ];
        for (i, status) in statuses.iter().enumerate() {
            tracker.record(svc, *status, None, minutes(i as i64 * 5));
        }

        let stats = tracker.uptime_stats(svc, 24, minutes(30));
        assert_eq!(stats.total_checks, 5);
        assert_eq!(stats.healthy_checks, 2);
        assert_eq!(stats.unhealthy_checks, 3);
        assert_eq!(stats.uptime_percentage, 40.0);
        assert_eq!(stats.downtime_percentage, 60.0);

        assert_eq!(stats.downtime_periods.len(), 2);
        let first = &stats.downtime_periods[0];
        assert_eq!(first.start, minutes(5));
        assert_eq!(first.end, PeriodEnd::Ended(minutes(15)));
        assert_eq!(first.duration_minutes, 10.0);

        let last = &stats.downtime_periods[1];
        assert!(last.is_ongoing());
        assert_eq!(last.duration_minutes, 10.0);
        assert_eq!(stats.total_downtime_minutes, 20.0);
        assert_eq!(stats.first_check, Some(minutes(0)));
        assert_eq!(stats.last_check, Some(minutes(20)));
    }

    #[test]
    fn test_uptime_window_excludes_old_checks() {
        let mut tracker = ServiceHealthTracker::default();
        let svc = ExternalService::Intune;
        tracker.record(svc, CheckStatus::Unhealthy, None, t0() - Duration::hours(30));
        tracker.record(svc, CheckStatus::Healthy, None, t0());

        let stats = tracker.uptime_stats(svc, 24, t0());
        assert_eq!(stats.total_checks, 1);
        assert_eq!(stats.uptime_percentage, 100.0);
        assert!(stats.downtime_periods.is_empty());
    }

    #[test]
    fn test_uptime_huge_window_covers_all_history() {
        let mut tracker = ServiceHealthTracker::new(10);
        let svc = ExternalService::Intune;
        tracker.record(svc, CheckStatus::Healthy, None, t0() - Duration::days(400));
        tracker.record(svc, CheckStatus::Unhealthy, None, minutes(0));

        let stats = tracker.uptime_stats(svc, i64::MAX / 2, minutes(10));
        assert_eq!(stats.total_checks, 2);
        assert_eq!(stats.uptime_percentage, 50.0);
        assert_eq!(tracker.uptime_stats(svc, i64::MAX, minutes(10)).total_checks, 2);
    }

    #[test]
    fn test_uptime_without_data() {
        let tracker = ServiceHealthTracker::default();
        let stats = tracker.uptime_stats(ExternalService::NextThink, 24, t0());
        assert!(!stats.has_data());
        assert_eq!(stats.uptime_percentage, 0.0);
        assert_eq!(stats.current_status, ServiceState::Unknown);
        assert_eq!(tracker.all_stats(24, t0()).len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut tracker = ServiceHealthTracker::default();
        for svc in ExternalService::all() {
            tracker.record(*svc, CheckStatus::Unhealthy, None, t0());
        }

        tracker.clear(Some(ExternalService::Intune));
        assert_eq!(tracker.current_state(ExternalService::Intune), ServiceState::Unknown);
        assert!(tracker.recent_history(ExternalService::Intune, 10).is_empty());
        assert_eq!(tracker.current_state(ExternalService::ServiceNow), ServiceState::Unhealthy);

        tracker.clear(None);
        assert_eq!(tracker.current_state(ExternalService::ServiceNow), ServiceState::Unknown);
        assert_eq!(tracker.last_state_change(ExternalService::NextThink), None);
    }

    #[test]
    fn test_period_end_serialization() {
        let json = serde_json::to_string(&PeriodEnd::Ongoing).unwrap();
        assert_eq!(json, "\"ongoing\"");
    }
}
