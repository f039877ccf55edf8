//! NQL query responses and their parsers.
//!
//! Each query returns a header list and rows of JSON cells. Only the first
//! row is read. A malformed cell yields `None` for that field; parsers never
//! fail as a whole on bad data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::*;
use crate::utils::parsing::{value_as_f64, value_as_i64, value_as_string};

/// Device inventory query
pub const DEVICE_INFORMATION_QUERY: &str = "#zentience_ntt_demo_device_information";
/// 24h / 7d performance query
pub const DEVICE_PERFORMANCE_QUERY: &str = "#zentience_ntt_demo_device_performance";
/// DEX score query
pub const DEVICE_SCORE_QUERY: &str = "#zentience_ntt_demo_device_score";
/// Application crash count query
pub const APP_CRASH_QUERY: &str = "#zentience_ntt_demo_app_crash_count";
/// Alert count query
pub const ALERTS_QUERY: &str = "#zentience_ntt_demo_no_of_alerts";

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Raw NQL response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NqlResponse {
    /// Query id
    #[serde(rename = "queryId", default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,
    /// Column names
    #[serde(default)]
    pub headers: Vec<String>,
    /// Rows of cells
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

/// First row keyed by header
pub type Row<'a> = HashMap<&'a str, &'a Value>;

impl NqlResponse {
    /// Build from headers and rows
    pub fn new(headers: Vec<String>, data: Vec<Vec<Value>>) -> Self {
        Self {
            query_id: None,
            headers,
            data,
        }
    }

    /// Zip the first row with the headers
    pub fn first_row(&self) -> Option<Row<'_>> {
        if self.headers.is_empty() {
            return None;
        }
        let row = self.data.first()?;
        Some(
            self.headers
                .iter()
                .map(String::as_str)
                .zip(row.iter())
                .collect(),
        )
    }
}

fn f64_at(row: &Row<'_>, key: &str) -> Option<f64> {
    row.get(key).and_then(|v| value_as_f64(v))
}

fn i64_at(row: &Row<'_>, key: &str) -> Option<i64> {
    row.get(key).and_then(|v| value_as_i64(v))
}

fn string_at(row: &Row<'_>, key: &str) -> Option<String> {
    row.get(key).and_then(|v| value_as_string(v))
}

/// First element of a cell holding a JSON list, either inline or encoded as a string
fn first_json_object(row: &Row<'_>, key: &str) -> Option<Value> {
    let cell = row.get(key)?;
    let list = match cell {
        Value::String(encoded) => serde_json::from_str::<Value>(encoded).ok()?,
        other => Value::clone(other),
    };
    match list {
        Value::Array(items) => items.into_iter().next().filter(Value::is_object),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Hardware inventory from the device information query
pub fn parse_device_information(response: &NqlResponse) -> Option<HardwareDiagnostics> {
    let row = response.first_row()?;
    let mut hardware = HardwareDiagnostics::default();

    if let Some(cpu) = first_json_object(&row, "device.cpus") {
        hardware.cpu = Some(CpuDiagnostics {
            cpu_model: cpu.get("name").and_then(value_as_string),
            cpu_speed_ghz: cpu.get("frequency").and_then(value_as_f64),
            cpu_cores: cpu.get("numberOfCores").and_then(value_as_i64),
            ..Default::default()
        });
    }

    if let Some(bytes) = f64_at(&row, "device.hardware.memory").filter(|b| *b != 0.0) {
        hardware.memory = Some(MemoryDiagnostics {
            memory_total_gb: Some(bytes / BYTES_PER_GB),
            ..Default::default()
        });
    }

    if let Some(disk) = first_json_object(&row, "device.disks") {
        let size = disk.get("size").and_then(value_as_f64).unwrap_or(0.0);
        let boot_disk = disk.get("bootDisk").and_then(Value::as_bool).unwrap_or(false);
        hardware.disk = Some(DiskDiagnostics {
            disk_total_gb: Some(size / BYTES_PER_GB),
            disk_type: Some(if boot_disk { "SSD" } else { "HDD" }.to_string()),
        });
    }

    if hardware.cpu.is_some() || hardware.memory.is_some() || hardware.disk.is_some() {
        Some(hardware)
    } else {
        None
    }
}

/// OS build and uptime from the device information query
pub fn parse_os_info(response: &NqlResponse) -> Option<OsHealthDiagnostics> {
    let row = response.first_row()?;

    Some(OsHealthDiagnostics {
        build_info: Some(OsBuildInfo {
            os_name: string_at(&row, "device.operating_system.name"),
            os_platform: string_at(&row, "device.operating_system.platform"),
            architecture: string_at(&row, "device.operating_system.architecture"),
            days_since_last_update: i64_at(&row, "device.operating_system.days_since_last_update"),
        }),
        uptime_info: Some(SystemUptimeInfo {
            uptime_days: i64_at(&row, "device.boot.days_since_last_full_boot"),
            last_full_boot_duration_minutes: f64_at(&row, "device.boot.last_full_boot_duration"),
            days_since_last_seen: i64_at(&row, "device.days_since_last_seen"),
        }),
    })
}

/// Load averages, boot counters and wifi quality from the performance query
pub fn parse_device_performance(response: &NqlResponse) -> Option<HardwareDiagnostics> {
    let row = response.first_row()?;
    let mut hardware = HardwareDiagnostics::default();

    let cpu_avg = f64_at(&row, "device.average_cpu_usage_24h");
    let mut cpu = CpuDiagnostics {
        cpu_usage_percent: cpu_avg,
        cpu_usage_24h_avg: cpu_avg,
        ..Default::default()
    };
    cpu.boot_metrics = Some(BootMetrics {
        full_boots_7d: i64_at(&row, "Full_boots"),
        hard_resets_7d: i64_at(&row, "Hard_resets"),
        suspends_7d: i64_at(&row, "Suspends"),
        system_crashes_7d: i64_at(&row, "System_crashes"),
        average_boot_duration_7d_minutes: f64_at(&row, "device.average_boot_duration_7d"),
        average_time_until_desktop_ready_7d_seconds: f64_at(
            &row,
            "device.average_time_until_desktop_is_ready_7d",
        ),
    });
    hardware.cpu = Some(cpu);

    if let Some(gpu_avg) = f64_at(&row, "device.average_gpu_usage_24h") {
        hardware.gpu = Some(GpuDiagnostics {
            gpu_usage_percent: Some(gpu_avg),
            gpu_usage_24h_avg: Some(gpu_avg),
        });
    }

    if let Some(mem_avg) = f64_at(&row, "device.average_memory_usage_24h") {
        hardware.memory = Some(MemoryDiagnostics {
            memory_usage_percent: Some(mem_avg),
            ..Default::default()
        });
    }

    hardware.network_metrics = Some(NetworkMetrics {
        wifi_signal_strength_24h_percent: f64_at(&row, "device.average_wifi_signal_strength_24h"),
    });

    Some(hardware)
}

/// DEX scores
pub fn parse_device_scores(response: &NqlResponse) -> Option<DeviceScores> {
    let row = response.first_row()?;

    Some(DeviceScores {
        overall_dex_score: f64_at(&row, "device.last_dex_score"),
        endpoint_score: f64_at(&row, "device.last_endpoint_score"),
        boot_speed_score: f64_at(&row, "device.last_boot_speed_score"),
        logon_speed_score: f64_at(&row, "device.last_logon_speed_score"),
        applications_score: f64_at(&row, "device.last_applications_score"),
        collaboration_score: f64_at(&row, "device.last_collaboration_score"),
        os_activation_score: f64_at(&row, "device.last_os_activation_score"),
        network_quality_score: f64_at(&row, "device.last_network_quality_score"),
        device_performance_score: f64_at(&row, "device.last_device_performance_score"),
        device_reliability_score: f64_at(&row, "device.last_device_reliability_score"),
    })
}

/// Application crashes over the last day
pub fn parse_app_crashes(response: &NqlResponse) -> Option<ApplicationHealth> {
    let row = response.first_row()?;
    Some(ApplicationHealth {
        crash_count_24h: i64_at(&row, "crash_count"),
        time_period: "24 hours".to_string(),
    })
}

/// Alert count
pub fn parse_alerts(response: &NqlResponse) -> Option<AlertSummary> {
    let row = response.first_row()?;
    Some(AlertSummary {
        alert_count: i64_at(&row, "no_of_alerts"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(pairs: &[(&str, Value)]) -> NqlResponse {
        NqlResponse::new(
            pairs.iter().map(|(h, _)| h.to_string()).collect(),
            vec![pairs.iter().map(|(_, v)| v.clone()).collect()],
        )
    }

    #[test]
    fn test_first_row_requires_headers_and_data() {
        assert!(NqlResponse::default().first_row().is_none());
        let headers_only = NqlResponse::new(vec!["a".into()], vec![]);
        assert!(headers_only.first_row().is_none());

        let r = response(&[("a", json!(1)), ("b", json!("x"))]);
        let row = r.first_row().unwrap();
        assert_eq!(row.get("b"), Some(&&json!("x")));
    }

    #[test]
    fn test_parse_device_information() {
        let r = response(&[
            (
                "device.cpus",
                json!(r#"[{"name":"Intel Core i7-1185G7","frequency":3.0,"numberOfCores":4}]"#),
            ),
            ("device.hardware.memory", json!(17179869184u64)),
            ("device.disks", json!(r#"[{"size":274877906944,"bootDisk":true}]"#)),
        ]);

        let hardware = parse_device_information(&r).unwrap();
        let cpu = hardware.cpu.unwrap();
        assert_eq!(cpu.cpu_model.as_deref(), Some("Intel Core i7-1185G7"));
        assert_eq!(cpu.cpu_cores, Some(4));
        assert_eq!(hardware.memory.unwrap().memory_total_gb, Some(16.0));
        let disk = hardware.disk.unwrap();
        assert_eq!(disk.disk_total_gb, Some(256.0));
        assert_eq!(disk.disk_type.as_deref(), Some("SSD"));
    }

    #[test]
    fn test_parse_device_information_tolerates_garbage() {
        let r = response(&[
            ("device.cpus", json!("{not json")),
            ("device.hardware.memory", json!("lots")),
            ("device.disks", json!("[]")),
        ]);
        assert!(parse_device_information(&r).is_none());

        let r = response(&[("device.disks", json!([{"bootDisk": false}]))]);
        let disk = parse_device_information(&r).unwrap().disk.unwrap();
        assert_eq!(disk.disk_total_gb, Some(0.0));
        assert_eq!(disk.disk_type.as_deref(), Some("HDD"));
    }

    #[test]
    fn test_parse_os_info() {
        let r = response(&[
            ("device.operating_system.name", json!("Windows 11 Enterprise")),
            ("device.operating_system.days_since_last_update", json!("12.7")),
            ("device.boot.days_since_last_full_boot", json!(3)),
        ]);
        let os = parse_os_info(&r).unwrap();
        let build = os.build_info.unwrap();
        assert_eq!(build.os_name.as_deref(), Some("Windows 11 Enterprise"));
        assert_eq!(build.days_since_last_update, Some(12));
        assert!(build.architecture.is_none());
        assert_eq!(os.uptime_info.unwrap().uptime_days, Some(3));
    }

    #[test]
    fn test_parse_device_performance() {
        let r = response(&[
            ("device.average_cpu_usage_24h", json!(85.0)),
            ("device.average_memory_usage_24h", json!("62.5")),
            ("Full_boots", json!(4)),
            ("device.average_wifi_signal_strength_24h", json!(null)),
        ]);
        let hardware = parse_device_performance(&r).unwrap();
        let cpu = hardware.cpu.unwrap();
        assert_eq!(cpu.cpu_usage_percent, Some(85.0));
        assert_eq!(cpu.boot_metrics.unwrap().full_boots_7d, Some(4));
        assert_eq!(hardware.memory.unwrap().memory_usage_percent, Some(62.5));
        assert!(hardware.gpu.is_none());
        assert_eq!(hardware.network_metrics.unwrap().wifi_signal_strength_24h_percent, None);
    }

    #[test]
    fn test_parse_scores_crashes_alerts() {
        let scores = parse_device_scores(&response(&[("device.last_dex_score", json!(7.4))])).unwrap();
        assert_eq!(scores.overall_dex_score, Some(7.4));
        assert!(scores.endpoint_score.is_none());

        let crashes = parse_app_crashes(&response(&[("crash_count", json!(3))])).unwrap();
        assert_eq!(crashes.crash_count_24h, Some(3));
        assert_eq!(crashes.time_period, "24 hours");

        let alerts = parse_alerts(&response(&[("no_of_alerts", json!("2"))])).unwrap();
        assert_eq!(alerts.alert_count, Some(2));
    }

    #[test]
    fn test_deserialize_wire_shape() {
        let raw = r##"{"queryId":"#q","headers":["crash_count"],"data":[[5]]}"##;
        let r: NqlResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(r.query_id.as_deref(), Some("#q"));
        assert_eq!(parse_app_crashes(&r).unwrap().crash_count_24h, Some(5));
    }
}
