//! Managed device records from the device-management (Intune / Graph) API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::health::scorer::DeviceSnapshot;
use crate::health::sections::SecuritySignals;
use crate::utils::parsing::value_as_string;

/// Encryption status shown for an encrypted device
pub const ENCRYPTED_STATUS: &str = "BitLocker Enabled";

/// Encryption status shown for an unencrypted device
pub const NOT_ENCRYPTED_STATUS: &str = "Not Encrypted";

/// A managed device as returned by the device-management API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagedDevice {
    /// Device id
    pub device_id: String,
    /// Device name
    pub device_name: Option<String>,
    /// Primary user principal name
    pub user_principal_name: Option<String>,
    /// Operating system
    pub operating_system: Option<String>,
    /// Operating system version
    pub os_version: Option<String>,
    /// Compliance state
    pub compliance_state: Option<String>,
    /// Owner type (company, personal)
    pub managed_device_owner_type: Option<String>,
    /// Enrollment time
    pub enrolled_date_time: Option<String>,
    /// Last sync time
    pub last_sync_date_time: Option<String>,
    /// Manufacturer
    pub manufacturer: Option<String>,
    /// Model
    pub model: Option<String>,
    /// Serial number
    pub serial_number: Option<String>,
    /// Disk encryption flag
    pub is_encrypted: Option<bool>,
    /// Primary user display name
    pub user_display_name: Option<String>,
}

impl ManagedDevice {
    /// Map a raw Graph `managedDevice` record.
    ///
    /// Missing or mistyped fields map to `None`; the record `id` becomes the
    /// device id.
    pub fn from_record(record: &Value) -> Self {
        let field = |key: &str| record.get(key).and_then(value_as_string);
        Self {
            device_id: field("id").unwrap_or_default(),
            device_name: field("deviceName"),
            user_principal_name: field("userPrincipalName"),
            operating_system: field("operatingSystem"),
            os_version: field("osVersion"),
            compliance_state: field("complianceState"),
            managed_device_owner_type: field("managedDeviceOwnerType"),
            enrolled_date_time: field("enrolledDateTime"),
            last_sync_date_time: field("lastSyncDateTime"),
            manufacturer: field("manufacturer"),
            model: field("model"),
            serial_number: field("serialNumber"),
            is_encrypted: record.get("isEncrypted").and_then(Value::as_bool),
            user_display_name: field("userDisplayName"),
        }
    }

    /// Scoring snapshot carrying the compliance state and last sync.
    ///
    /// Usage and connectivity are not part of the record and stay absent.
    pub fn snapshot(&self) -> DeviceSnapshot {
        let mut snapshot = DeviceSnapshot::new(self.compliance_state.clone().unwrap_or_default());
        if let Some(last_sync) = &self.last_sync_date_time {
            snapshot = snapshot.with_last_sync(last_sync.clone());
        }
        snapshot
    }

    /// Encryption status in the security vocabulary
    pub fn encryption_status(&self) -> Option<&'static str> {
        self.is_encrypted.map(|encrypted| {
            if encrypted {
                ENCRYPTED_STATUS
            } else {
                NOT_ENCRYPTED_STATUS
            }
        })
    }

    /// Security signals known from the record
    pub fn security_signals(&self) -> SecuritySignals {
        SecuritySignals {
            encryption_status: self.encryption_status().map(str::to_string),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tier::HealthTier;
    use crate::health::scorer::{score, ScoreFactor};
    use crate::health::sections::SectionAggregator;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn record() -> Value {
        json!({
            "id": "device-123",
            "deviceName": "LAPTOP-TEST",
            "userPrincipalName": "user@example.com",
            "operatingSystem": "Windows",
            "osVersion": "10.0.19045",
            "complianceState": "noncompliant",
            "managedDeviceOwnerType": "company",
            "enrolledDateTime": "2023-01-15T10:30:00Z",
            "lastSyncDateTime": "2023-12-01T14:22:00Z",
            "manufacturer": "Dell",
            "model": "Latitude 5520",
            "serialNumber": "ABC123XYZ",
            "isEncrypted": false,
            "userDisplayName": "John Doe"
        })
    }

    #[test]
    fn test_from_record() {
        let device = ManagedDevice::from_record(&record());
        assert_eq!(device.device_id, "device-123");
        assert_eq!(device.device_name.as_deref(), Some("LAPTOP-TEST"));
        assert_eq!(device.os_version.as_deref(), Some("10.0.19045"));
        assert_eq!(device.is_encrypted, Some(false));
    }

    #[test]
    fn test_minimal_record() {
        let device = ManagedDevice::from_record(&json!({ "id": "device-456", "isEncrypted": "yes" }));
        assert_eq!(device.device_id, "device-456");
        assert!(device.device_name.is_none());
        assert!(device.is_encrypted.is_none());
        assert_eq!(device.security_signals(), SecuritySignals::default());
    }

    #[test]
    fn test_deserialize_with_nulls() {
        let device: ManagedDevice =
            serde_json::from_str(r#"{"deviceId":"d-1","complianceState":null,"isEncrypted":true}"#).unwrap();
        assert_eq!(device.device_id, "d-1");
        assert_eq!(device.encryption_status(), Some(ENCRYPTED_STATUS));
        assert!(device.snapshot().compliance_state.is_empty());
    }

    #[test]
    fn test_feeds_scorer_and_security_section() {
        let device = ManagedDevice::from_record(&record());
        let now = Utc.with_ymd_and_hms(2023, 12, 1, 20, 0, 0).unwrap();

        let result = score(&device.snapshot(), now);
        assert!(result.has_factor(ScoreFactor::NonCompliance));
        assert!(!result.has_factor(ScoreFactor::StaleSync));

        let tier = SectionAggregator::default().security(&device.security_signals());
        assert_eq!(tier, HealthTier::Critical);
    }
}
