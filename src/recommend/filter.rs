//! Remote action history filtering and incident ordering.

use std::cmp::Reverse;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Incident, RemoteAction};
use crate::core::config::RecommendationConfig;

/// Filter over a device's remote action history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFilter {
    /// Accepted statuses, case-insensitive; empty accepts all
    pub statuses: Vec<String>,
    /// Only actions updated within this many days
    pub days: Option<i64>,
    /// Maximum actions returned
    pub limit: Option<usize>,
}

impl ActionFilter {
    /// Lookback taken from configuration
    pub fn from_config(config: &RecommendationConfig) -> Self {
        Self {
            statuses: Vec::new(),
            days: Some(config.lookback_days),
            limit: None,
        }
    }

    /// Restrict to statuses
    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.statuses = statuses.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to a lookback window
    pub fn with_days(mut self, days: i64) -> Self {
        self.days = Some(days);
        self
    }

    /// Cap the result size
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn accepts_status(&self, action: &RemoteAction) -> bool {
        if self.statuses.is_empty() {
            return true;
        }
        match action.status.as_deref() {
            Some(status) => self.statuses.iter().any(|s| s.eq_ignore_ascii_case(status)),
            None => false,
        }
    }

    /// Apply the filter.
    ///
    /// With a lookback window, actions without `updated_at` are dropped and
    /// actions whose `updated_at` does not parse are kept. Results are newest
    /// first with unparseable dates last.
    pub fn apply(&self, actions: &[RemoteAction], now: DateTime<Utc>) -> Vec<RemoteAction> {
        let cutoff = self
            .days
            .filter(|days| *days > 0)
            .map(|days| {
                Duration::try_days(days)
                    .and_then(|window| now.checked_sub_signed(window))
                    .unwrap_or(DateTime::<Utc>::MIN_UTC)
            });

        let mut filtered: Vec<RemoteAction> = actions
            .iter()
            .filter(|action| self.accepts_status(action))
            .filter(|action| match cutoff {
                None => true,
                Some(cutoff) => match action.updated_at.as_deref() {
                    None => false,
                    Some(_) => action.updated().map_or(true, |at| at >= cutoff),
                },
            })
            .cloned()
            .collect();

        filtered.sort_by_key(|action| Reverse(action.updated()));

        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            filtered.truncate(limit);
        }

        filtered
    }
}

/// Sort incidents newest `opened_at` first; missing or unparseable dates go last
pub fn sort_incidents_newest_first(incidents: &mut [Incident]) {
    incidents.sort_by_key(|incident| Reverse(incident.opened()));
}
