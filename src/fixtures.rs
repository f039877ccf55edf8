//! Deterministic demo diagnostics.
//!
//! A ticket id is hashed with SHA-256 and the first eight bytes seed a
//! `StdRng`, so the same ticket always yields the same hardware readings,
//! categorical signals and log lines. Only compiled for tests or with the
//! `fixtures` feature.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::health::scorer::DeviceSnapshot;
use crate::health::sections::{HardwareSignals, OsSignals, SecuritySignals, ServicesSignals};
use crate::health::view_model::DiagnosticsInput;
use crate::utils::constants::*;

/// Log severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Informational
    Info,
    /// Warning
    Warn,
    /// Error
    Error,
}

/// Synthetic device log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// Minutes before the time the fixture is rendered
    pub minutes_ago: u32,
    /// Severity
    pub level: LogLevel,
    /// Emitting component
    pub source: String,
    /// Message text
    pub message: String,
}

const LOG_TEMPLATES: &[(LogLevel, &str, &str)] = &[
    (LogLevel::Info, "System", "User session started"),
    (LogLevel::Info, "WindowsUpdate", "Checked for updates"),
    (LogLevel::Warn, "Disk", "Low disk space on C:"),
    (LogLevel::Warn, "Network", "Wi-Fi signal degraded"),
    (LogLevel::Error, "Application", "Outlook stopped responding"),
    (LogLevel::Error, "Kernel-Power", "Unexpected shutdown detected"),
    (LogLevel::Info, "Defender", "Definition update installed"),
];

const COMPLIANCE_STATES: &[&str] = &["compliant", "noncompliant", "inGracePeriod"];
const CONNECTION_TYPES: &[&str] = &["Wi-Fi", "Ethernet", "VPN"];

/// Seeded demo data for one ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockDiagnostics {
    /// Ticket id
    pub ticket_id: String,
    /// Seed derived from the ticket id
    pub seed: u64,
    /// Signals for the view model
    pub input: DiagnosticsInput,
    /// Log lines, newest first
    pub logs: Vec<LogLine>,
    /// Compliance state for the device snapshot
    pub compliance_state: String,
    /// Memory usage for the device snapshot
    pub memory_usage: f64,
    /// Disk usage for the device snapshot
    pub disk_usage: f64,
    /// Hours since last sync
    pub sync_hours_ago: u32,
    /// Connection type, absent when offline
    pub connection_type: Option<String>,
}

/// First eight bytes of the SHA-256 digest, big endian
pub fn seed_for(ticket_id: &str) -> u64 {
    Sha256::digest(ticket_id.as_bytes())
        .iter()
        .take(8)
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}

fn pick(rng: &mut StdRng, values: &[&str]) -> Option<String> {
    values.choose(rng).map(|v| v.to_string())
}

fn tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl MockDiagnostics {
    /// Generate the fixture for a ticket
    pub fn for_ticket(ticket_id: &str) -> Self {
        let seed = seed_for(ticket_id);
        let mut rng = StdRng::seed_from_u64(seed);

        let hardware = HardwareSignals::new(
            tenths(rng.gen_range(5.0..99.0)),
            tenths(rng.gen_range(20.0..95.0)),
            tenths(rng.gen_range(5.0..100.0)),
        );

        let os = OsSignals {
            driver_health: pick(&mut rng, DRIVER_HEALTH_VALUES),
            restart_status: pick(&mut rng, RESTART_STATUS_VALUES),
        };
        let security = SecuritySignals {
            encryption_status: pick(&mut rng, ENCRYPTION_VALUES),
            antivirus_status: pick(&mut rng, ANTIVIRUS_VALUES),
            vulnerability_scan: pick(&mut rng, VULNERABILITY_SCAN_VALUES),
        };
        let services = ServicesSignals {
            services_health: pick(&mut rng, SERVICES_HEALTH_VALUES),
        };

        let line_count = rng.gen_range(3..=6);
        let mut logs: Vec<LogLine> = (0..line_count)
            .filter_map(|_| {
                let (level, source, message) = LOG_TEMPLATES.choose(&mut rng)?;
                Some(LogLine {
                    minutes_ago: rng.gen_range(1..=24 * 60),
                    level: *level,
                    source: source.to_string(),
                    message: message.to_string(),
                })
            })
            .collect();
        logs.sort_by_key(|line| line.minutes_ago);

        let compliance_state = pick(&mut rng, COMPLIANCE_STATES).unwrap_or_default();
        let memory_usage = tenths(rng.gen_range(20.0..98.0));
        let disk_usage = tenths(rng.gen_range(20.0..98.0));
        let sync_hours_ago = rng.gen_range(0..=96);
        let connection_type = if rng.gen_bool(0.85) {
            pick(&mut rng, CONNECTION_TYPES)
        } else {
            None
        };

        let mut input = DiagnosticsInput::new(ticket_id);
        input.hardware = hardware;
        input.os = os;
        input.security = security;
        input.services = services;

        Self {
            ticket_id: ticket_id.to_string(),
            seed,
            input,
            logs,
            compliance_state,
            memory_usage,
            disk_usage,
            sync_hours_ago,
            connection_type,
        }
    }

    /// Device-management snapshot as of `now`
    pub fn snapshot(&self, now: DateTime<Utc>) -> DeviceSnapshot {
        let last_sync = now - Duration::hours(i64::from(self.sync_hours_ago));
        let mut snapshot = DeviceSnapshot::new(self.compliance_state.clone())
            .with_memory_usage(format!("{:.1}", self.memory_usage))
            .with_disk_usage(format!("{:.1}", self.disk_usage))
            .with_last_sync(last_sync.to_rfc3339());
        if let Some(connection_type) = &self.connection_type {
            snapshot = snapshot
                .with_connection_type(connection_type.clone())
                .with_ip_address("10.0.0.15");
        }
        snapshot
    }

    /// View model input including the snapshot
    pub fn input_at(&self, now: DateTime<Utc>) -> DiagnosticsInput {
        let mut input = self.input.clone();
        input.snapshot = Some(self.snapshot(now));
        input
    }
}
