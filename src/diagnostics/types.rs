//! Structured endpoint diagnostics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::request::DiagnosticsMode;

// ═══════════════════════════════════════════════════════════════════════════════
// HARDWARE
// ═══════════════════════════════════════════════════════════════════════════════

/// Seven-day boot counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BootMetrics {
    /// Full boots
    pub full_boots_7d: Option<i64>,
    /// Hard resets
    pub hard_resets_7d: Option<i64>,
    /// Suspends
    pub suspends_7d: Option<i64>,
    /// System crashes
    pub system_crashes_7d: Option<i64>,
    /// Average boot duration in minutes
    pub average_boot_duration_7d_minutes: Option<f64>,
    /// Average time until the desktop is ready in seconds
    pub average_time_until_desktop_ready_7d_seconds: Option<f64>,
}

/// CPU identity and load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuDiagnostics {
    /// Current usage percentage
    pub cpu_usage_percent: Option<f64>,
    /// 24 hour average usage
    pub cpu_usage_24h_avg: Option<f64>,
    /// Model name
    pub cpu_model: Option<String>,
    /// Base frequency in GHz
    pub cpu_speed_ghz: Option<f64>,
    /// Core count
    pub cpu_cores: Option<i64>,
    /// Boot counters
    pub boot_metrics: Option<BootMetrics>,
}

impl CpuDiagnostics {
    /// Overlay every present field of `other`
    pub fn merge(&mut self, other: CpuDiagnostics) {
        overlay(&mut self.cpu_usage_percent, other.cpu_usage_percent);
        overlay(&mut self.cpu_usage_24h_avg, other.cpu_usage_24h_avg);
        overlay(&mut self.cpu_model, other.cpu_model);
        overlay(&mut self.cpu_speed_ghz, other.cpu_speed_ghz);
        overlay(&mut self.cpu_cores, other.cpu_cores);
        overlay(&mut self.boot_metrics, other.boot_metrics);
    }
}

/// GPU load
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuDiagnostics {
    /// Current usage percentage
    pub gpu_usage_percent: Option<f64>,
    /// 24 hour average usage
    pub gpu_usage_24h_avg: Option<f64>,
}

/// Physical memory
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDiagnostics {
    /// Usage percentage
    pub memory_usage_percent: Option<f64>,
    /// Installed memory in GB
    pub memory_total_gb: Option<f64>,
    /// Available memory in GB
    pub memory_available_gb: Option<f64>,
}

impl MemoryDiagnostics {
    /// Overlay every present field of `other`
    pub fn merge(&mut self, other: MemoryDiagnostics) {
        overlay(&mut self.memory_usage_percent, other.memory_usage_percent);
        overlay(&mut self.memory_total_gb, other.memory_total_gb);
        overlay(&mut self.memory_available_gb, other.memory_available_gb);
    }
}

/// Primary disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskDiagnostics {
    /// Capacity in GB
    pub disk_total_gb: Option<f64>,
    /// "SSD" or "HDD"
    pub disk_type: Option<String>,
}

/// Network quality
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    /// Average wifi signal strength over 24 hours
    pub wifi_signal_strength_24h_percent: Option<f64>,
}

/// Hardware inventory and load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareDiagnostics {
    /// CPU
    pub cpu: Option<CpuDiagnostics>,
    /// GPU
    pub gpu: Option<GpuDiagnostics>,
    /// Memory
    pub memory: Option<MemoryDiagnostics>,
    /// Disk
    pub disk: Option<DiskDiagnostics>,
    /// Network
    pub network_metrics: Option<NetworkMetrics>,
}

impl HardwareDiagnostics {
    /// True when no component was reported
    pub fn is_empty(&self) -> bool {
        self.cpu.is_none()
            && self.gpu.is_none()
            && self.memory.is_none()
            && self.disk.is_none()
            && self.network_metrics.is_none()
    }

    /// Merge performance readings over inventory data.
    ///
    /// Components are merged field by field so the CPU model survives a
    /// performance row that only carries usage.
    pub fn merge(&mut self, performance: HardwareDiagnostics) {
        if let Some(cpu) = performance.cpu {
            self.cpu.get_or_insert_with(CpuDiagnostics::default).merge(cpu);
        }
        if let Some(memory) = performance.memory {
            self.memory
                .get_or_insert_with(MemoryDiagnostics::default)
                .merge(memory);
        }
        overlay(&mut self.gpu, performance.gpu);
        overlay(&mut self.disk, performance.disk);
        overlay(&mut self.network_metrics, performance.network_metrics);
    }
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OPERATING SYSTEM
// ═══════════════════════════════════════════════════════════════════════════════

/// OS build information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsBuildInfo {
    /// Operating system name
    pub os_name: Option<String>,
    /// Platform, e.g. "Windows"
    pub os_platform: Option<String>,
    /// Architecture, e.g. "x64"
    pub architecture: Option<String>,
    /// Days since the last OS update
    pub days_since_last_update: Option<i64>,
}

/// Uptime information
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemUptimeInfo {
    /// Days since last full boot
    pub uptime_days: Option<i64>,
    /// Last full boot duration in minutes
    pub last_full_boot_duration_minutes: Option<f64>,
    /// Days since the device was last seen
    pub days_since_last_seen: Option<i64>,
}

/// OS health
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OsHealthDiagnostics {
    /// Build information
    pub build_info: Option<OsBuildInfo>,
    /// Uptime information
    pub uptime_info: Option<SystemUptimeInfo>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXPERIENCE, APPLICATIONS, ALERTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Digital experience scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceScores {
    /// Overall DEX score
    pub overall_dex_score: Option<f64>,
    /// Endpoint score
    pub endpoint_score: Option<f64>,
    /// Boot speed
    pub boot_speed_score: Option<f64>,
    /// Logon speed
    pub logon_speed_score: Option<f64>,
    /// Applications
    pub applications_score: Option<f64>,
    /// Collaboration
    pub collaboration_score: Option<f64>,
    /// OS activation
    pub os_activation_score: Option<f64>,
    /// Network quality
    pub network_quality_score: Option<f64>,
    /// Device performance
    pub device_performance_score: Option<f64>,
    /// Device reliability
    pub device_reliability_score: Option<f64>,
}

/// Application crash summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationHealth {
    /// Crashes in the period
    pub crash_count_24h: Option<i64>,
    /// Human readable period
    pub time_period: String,
}

/// Alert summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSummary {
    /// Open alerts
    pub alert_count: Option<i64>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// AGGREGATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything gathered for one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveDiagnostics {
    /// Device name
    pub device_name: String,
    /// Assembly time
    pub timestamp: DateTime<Utc>,
    /// Requested mode
    pub diagnostics_mode: DiagnosticsMode,
    /// Categories as requested
    pub categories_requested: Vec<String>,
    /// Categories that returned data
    pub categories_available: Vec<String>,
    /// Executed / planned, as a percentage
    pub data_completeness_percent: f64,
    /// Hardware
    pub hardware: Option<HardwareDiagnostics>,
    /// Operating system
    pub os_health: Option<OsHealthDiagnostics>,
    /// DEX scores
    pub device_scores: Option<DeviceScores>,
    /// Application crashes
    pub application_health: Option<ApplicationHealth>,
    /// Alerts
    pub alert_summary: Option<AlertSummary>,
    /// Warnings such as ignored categories
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_inventory_fields() {
        let mut hardware = HardwareDiagnostics {
            cpu: Some(CpuDiagnostics {
                cpu_model: Some("Intel i7".into()),
                cpu_cores: Some(8),
                ..Default::default()
            }),
            memory: Some(MemoryDiagnostics {
                memory_total_gb: Some(16.0),
                ..Default::default()
            }),
            ..Default::default()
        };

        hardware.merge(HardwareDiagnostics {
            cpu: Some(CpuDiagnostics {
                cpu_usage_percent: Some(42.0),
                ..Default::default()
            }),
            memory: Some(MemoryDiagnostics {
                memory_usage_percent: Some(71.5),
                ..Default::default()
            }),
            network_metrics: Some(NetworkMetrics {
                wifi_signal_strength_24h_percent: Some(80.0),
            }),
            ..Default::default()
        });

        let cpu = hardware.cpu.as_ref().unwrap();
        assert_eq!(cpu.cpu_model.as_deref(), Some("Intel i7"));
        assert_eq!(cpu.cpu_usage_percent, Some(42.0));
        let memory = hardware.memory.unwrap();
        assert_eq!(memory.memory_total_gb, Some(16.0));
        assert_eq!(memory.memory_usage_percent, Some(71.5));
        assert!(hardware.network_metrics.is_some());
        assert!(hardware.disk.is_none());
    }

    #[test]
    fn test_is_empty() {
        assert!(HardwareDiagnostics::default().is_empty());
        let hardware = HardwareDiagnostics {
            gpu: Some(GpuDiagnostics::default()),
            ..Default::default()
        };
        assert!(!hardware.is_empty());
    }
}
