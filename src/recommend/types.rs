//! Remote actions and incidents as the recommender sees them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::parsing::{parse_timestamp, value_as_string};

/// A remote action execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteAction {
    /// Execution request id
    pub action_id: Option<String>,
    /// Action name
    pub action_name: Option<String>,
    /// Source of the action
    pub action_type: Option<String>,
    /// Execution status, e.g. "success"
    pub status: Option<String>,
    /// Request time
    pub created_at: Option<String>,
    /// Last execution update
    pub updated_at: Option<String>,
    /// Target device
    pub device_name: Option<String>,
    /// Trigger method
    pub executed_by: Option<String>,
    /// Execution purpose, e.g. "remediation"
    pub purpose: Option<String>,
}

impl RemoteAction {
    /// Named action
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            action_name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the status
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Set the purpose
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Set the last update time
    pub fn with_updated_at(mut self, updated_at: impl Into<String>) -> Self {
        self.updated_at = Some(updated_at.into());
        self
    }

    /// Map a flat NQL remote action record
    pub fn from_record(record: &Value) -> Self {
        let field = |key: &str| record.get(key).and_then(value_as_string);
        Self {
            action_id: field("remote_action.execution.request_id"),
            action_name: field("remote_action.name"),
            action_type: field("remote_action.source"),
            status: field("remote_action.execution.status"),
            created_at: field("remote_action.execution.request_time"),
            updated_at: field("remote_action.execution.time"),
            device_name: field("device.name"),
            executed_by: field("remote_action.execution.trigger_method"),
            purpose: field("remote_action.execution.purpose"),
        }
    }

    /// Parsed `updated_at`
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_deref().and_then(parse_timestamp)
    }
}

/// A service desk incident
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Incident {
    /// Incident number
    pub incident_number: String,
    /// One-line summary
    pub short_description: Option<String>,
    /// Full description
    pub description: Option<String>,
    /// Affected device when known
    pub device_name: Option<String>,
    /// Category used for relevance scoring
    pub category: Option<String>,
    /// Opening time
    pub opened_at: Option<String>,
}

impl Incident {
    /// Incident with a number
    pub fn new(incident_number: impl Into<String>) -> Self {
        Self {
            incident_number: incident_number.into(),
            ..Default::default()
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the descriptions
    pub fn with_description(
        mut self,
        short_description: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.short_description = Some(short_description.into());
        self.description = Some(description.into());
        self
    }

    /// Set the device
    pub fn with_device(mut self, device_name: impl Into<String>) -> Self {
        self.device_name = Some(device_name.into());
        self
    }

    /// Set the opening time
    pub fn with_opened_at(mut self, opened_at: impl Into<String>) -> Self {
        self.opened_at = Some(opened_at.into());
        self
    }

    /// Short and full description joined for keyword scoring
    pub fn combined_description(&self) -> String {
        format!(
            "{} {}",
            self.short_description.as_deref().unwrap_or(""),
            self.description.as_deref().unwrap_or("")
        )
    }

    /// Parsed `opened_at`
    pub fn opened(&self) -> Option<DateTime<Utc>> {
        self.opened_at.as_deref().and_then(parse_timestamp)
    }
}

/// An action with its relevance score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAction {
    /// Relevance, 0 to 100
    pub score: f64,
    /// The action
    pub action: RemoteAction,
}
