//! Section Health Aggregator.
//!
//! Each of the four diagnostic sections reduces its own signals to one
//! tier. Hardware uses the numeric band tables; the other three match
//! categorical values against a closed vocabulary table. Values missing
//! from the table never escalate a section.

use serde::{Deserialize, Serialize};

use crate::core::tier::HealthTier;
use crate::diagnostics::HardwareDiagnostics;

use super::classifier::{ChargeBands, UsageBands};

// ═══════════════════════════════════════════════════════════════════════════════
// SECTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Fixed diagnostic sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// CPU, RAM, battery
    Hardware,
    /// Drivers and restarts
    OperatingSystem,
    /// Encryption, antivirus, vulnerabilities
    Security,
    /// Background services and apps
    Services,
}

impl Section {
    /// All sections in display order
    pub fn all() -> &'static [Section] {
        &[
            Section::Hardware,
            Section::OperatingSystem,
            Section::Security,
            Section::Services,
        ]
    }

    /// Tab title
    pub fn title(&self) -> &'static str {
        match self {
            Section::Hardware => "Hardware",
            Section::OperatingSystem => "Operating System",
            Section::Security => "Security",
            Section::Services => "Services & Apps",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SIGNAL BUNDLES
// ═══════════════════════════════════════════════════════════════════════════════

/// Hardware readings (percentages)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareSignals {
    /// CPU usage
    #[serde(default)]
    pub cpu: Option<f64>,
    /// RAM usage
    #[serde(default)]
    pub ram: Option<f64>,
    /// Battery charge
    #[serde(default)]
    pub battery: Option<f64>,
}

impl HardwareSignals {
    /// Create with every reading present
    pub fn new(cpu: f64, ram: f64, battery: f64) -> Self {
        Self {
            cpu: Some(cpu),
            ram: Some(ram),
            battery: Some(battery),
        }
    }
}

impl From<&HardwareDiagnostics> for HardwareSignals {
    fn from(hardware: &HardwareDiagnostics) -> Self {
        Self {
            cpu: hardware.cpu.as_ref().and_then(|c| c.cpu_usage_percent),
            ram: hardware.memory.as_ref().and_then(|m| m.memory_usage_percent),
            battery: None,
        }
    }
}

/// Operating system signals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsSignals {
    /// "Good" | "Outdated" | "Critical"
    #[serde(default)]
    pub driver_health: Option<String>,
    /// "No Restart Pending" | "Restart Required" | "Update Pending"
    #[serde(default)]
    pub restart_status: Option<String>,
}

/// Security signals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySignals {
    /// Disk encryption status
    #[serde(default)]
    pub encryption_status: Option<String>,
    /// Antivirus status
    #[serde(default)]
    pub antivirus_status: Option<String>,
    /// Vulnerability scan summary
    #[serde(default)]
    pub vulnerability_scan: Option<String>,
}

/// Services signals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesSignals {
    /// Services summary
    #[serde(default)]
    pub services_health: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// VOCABULARY TABLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Categorical field a rule reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalField {
    /// OS driver health
    DriverHealth,
    /// OS restart status
    RestartStatus,
    /// Disk encryption
    EncryptionStatus,
    /// Antivirus
    AntivirusStatus,
    /// Vulnerability scan
    VulnerabilityScan,
    /// Services summary
    ServicesHealth,
}

/// Values of one field that escalate its section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalRule {
    /// Field
    pub field: SignalField,
    /// Values that make the section Critical
    #[serde(default)]
    pub critical: Vec<String>,
    /// Values that make the section Warning
    #[serde(default)]
    pub warning: Vec<String>,
}

impl CategoricalRule {
    fn new(field: SignalField, critical: &[&str], warning: &[&str]) -> Self {
        Self {
            field,
            critical: critical.iter().map(|s| s.to_string()).collect(),
            warning: warning.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn tier(&self, value: &str) -> HealthTier {
        if self.critical.iter().any(|v| v == value) {
            HealthTier::Critical
        } else if self.warning.iter().any(|v| v == value) {
            HealthTier::Warning
        } else {
            HealthTier::Healthy
        }
    }
}

/// Closed-world rule tables for the categorical sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyTable {
    /// Operating system rules
    pub operating_system: Vec<CategoricalRule>,
    /// Security rules
    pub security: Vec<CategoricalRule>,
    /// Services rules
    pub services: Vec<CategoricalRule>,
}

impl Default for VocabularyTable {
    fn default() -> Self {
        Self {
            operating_system: vec![
                CategoricalRule::new(SignalField::DriverHealth, &["Critical"], &["Outdated"]),
                CategoricalRule::new(SignalField::RestartStatus, &["Update Pending"], &["Restart Required"]),
            ],
            security: vec![
                CategoricalRule::new(SignalField::EncryptionStatus, &["Not Encrypted"], &["Encrypting"]),
                CategoricalRule::new(SignalField::AntivirusStatus, &["Antivirus Disabled"], &[]),
                CategoricalRule::new(SignalField::VulnerabilityScan, &["5 Critical"], &["2 Low Risk"]),
            ],
            services: vec![CategoricalRule::new(
                SignalField::ServicesHealth,
                &["Critical Service Down"],
                &["2 Services Stopped"],
            )],
        }
    }
}

impl VocabularyTable {
    /// Whether any value is listed as both Critical and Warning for a field
    pub fn conflicts(&self) -> Vec<(SignalField, String)> {
        self.operating_system
            .iter()
            .chain(&self.security)
            .chain(&self.services)
            .flat_map(|rule| {
                rule.critical
                    .iter()
                    .filter(move |v| rule.warning.contains(v))
                    .map(move |v| (rule.field, v.clone()))
            })
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// AGGREGATOR
// ═══════════════════════════════════════════════════════════════════════════════

/// Section tier computed by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHealth {
    /// Section
    pub section: Section,
    /// Tier
    pub tier: HealthTier,
}

/// Reduces each section's signals to a tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionAggregator {
    usage: UsageBands,
    charge: ChargeBands,
    vocabulary: VocabularyTable,
}

impl SectionAggregator {
    /// Create aggregator from band tables and vocabulary
    pub fn new(usage: UsageBands, charge: ChargeBands, vocabulary: VocabularyTable) -> Self {
        Self {
            usage,
            charge,
            vocabulary,
        }
    }

    /// Hardware: worst of CPU/RAM usage and battery charge
    pub fn hardware(&self, signals: &HardwareSignals) -> HealthTier {
        let readings = [
            signals.cpu.map(|v| self.usage.tier(v)),
            signals.ram.map(|v| self.usage.tier(v)),
            signals.battery.map(|v| self.charge.tier(v)),
        ];
        HealthTier::worst(readings.into_iter().flatten())
    }

    /// Operating system section
    pub fn operating_system(&self, signals: &OsSignals) -> HealthTier {
        evaluate(&self.vocabulary.operating_system, |field| match field {
            SignalField::DriverHealth => signals.driver_health.as_deref(),
            SignalField::RestartStatus => signals.restart_status.as_deref(),
            _ => None,
        })
    }

    /// Security section
    pub fn security(&self, signals: &SecuritySignals) -> HealthTier {
        evaluate(&self.vocabulary.security, |field| match field {
            SignalField::EncryptionStatus => signals.encryption_status.as_deref(),
            SignalField::AntivirusStatus => signals.antivirus_status.as_deref(),
            SignalField::VulnerabilityScan => signals.vulnerability_scan.as_deref(),
            _ => None,
        })
    }

    /// Services section
    pub fn services(&self, signals: &ServicesSignals) -> HealthTier {
        evaluate(&self.vocabulary.services, |field| match field {
            SignalField::ServicesHealth => signals.services_health.as_deref(),
            _ => None,
        })
    }
}

/// Apply a section's rules; Indeterminate when none of its fields has a value
fn evaluate<'a>(rules: &[CategoricalRule], lookup: impl Fn(SignalField) -> Option<&'a str>) -> HealthTier {
    let tiers = rules
        .iter()
        .filter_map(|rule| lookup(rule.field).map(|value| rule.tier(value.trim())));
    HealthTier::worst(tiers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(driver: &str, restart: &str) -> OsSignals {
        OsSignals {
            driver_health: Some(driver.into()),
            restart_status: Some(restart.into()),
        }
    }

    fn security(encryption: &str, antivirus: &str, scan: &str) -> SecuritySignals {
        SecuritySignals {
            encryption_status: Some(encryption.into()),
            antivirus_status: Some(antivirus.into()),
            vulnerability_scan: Some(scan.into()),
        }
    }

    fn services(value: &str) -> ServicesSignals {
        ServicesSignals {
            services_health: Some(value.into()),
        }
    }

    #[test]
    fn test_hardware_single_critical_reading_dominates() {
        let aggregator = SectionAggregator::default();
        assert_eq!(aggregator.hardware(&HardwareSignals::new(85.0, 50.0, 70.0)), HealthTier::Critical);
        assert_eq!(aggregator.hardware(&HardwareSignals::new(20.0, 80.0, 90.0)), HealthTier::Critical);
        assert_eq!(aggregator.hardware(&HardwareSignals::new(20.0, 30.0, 19.0)), HealthTier::Critical);
    }

    #[test]
    fn test_hardware_warning_and_healthy() {
        let aggregator = SectionAggregator::default();
        assert_eq!(aggregator.hardware(&HardwareSignals::new(60.0, 10.0, 90.0)), HealthTier::Warning);
        assert_eq!(aggregator.hardware(&HardwareSignals::new(10.0, 10.0, 59.0)), HealthTier::Warning);
        assert_eq!(aggregator.hardware(&HardwareSignals::new(59.0, 59.0, 60.0)), HealthTier::Healthy);
    }

    #[test]
    fn test_hardware_partial_and_empty() {
        let aggregator = SectionAggregator::default();
        let partial = HardwareSignals { cpu: Some(65.0), ..Default::default() };
        assert_eq!(aggregator.hardware(&partial), HealthTier::Warning);
        assert_eq!(aggregator.hardware(&HardwareSignals::default()), HealthTier::Indeterminate);
    }

    #[test]
    fn test_os_rules() {
        let aggregator = SectionAggregator::default();
        assert_eq!(aggregator.operating_system(&os("Critical", "No Restart Pending")), HealthTier::Critical);
        assert_eq!(aggregator.operating_system(&os("Good", "Update Pending")), HealthTier::Critical);
        assert_eq!(aggregator.operating_system(&os("Outdated", "No Restart Pending")), HealthTier::Warning);
        assert_eq!(aggregator.operating_system(&os("Good", "Restart Required")), HealthTier::Warning);
        assert_eq!(aggregator.operating_system(&os("Good", "No Restart Pending")), HealthTier::Healthy);
    }

    #[test]
    fn test_security_rules() {
        let aggregator = SectionAggregator::default();
        assert_eq!(
            aggregator.security(&security("BitLocker Enabled", "Windows Defender Active", "5 Critical")),
            HealthTier::Critical
        );
        assert_eq!(
            aggregator.security(&security("Not Encrypted", "Windows Defender Active", "No Vulnerabilities")),
            HealthTier::Critical
        );
        assert_eq!(
            aggregator.security(&security("BitLocker Enabled", "Antivirus Disabled", "No Vulnerabilities")),
            HealthTier::Critical
        );
        assert_eq!(
            aggregator.security(&security("Encrypting", "Windows Defender Active", "No Vulnerabilities")),
            HealthTier::Warning
        );
        assert_eq!(
            aggregator.security(&security("BitLocker Enabled", "Windows Defender Active", "2 Low Risk")),
            HealthTier::Warning
        );
        assert_eq!(
            aggregator.security(&security("BitLocker Enabled", "Windows Defender Active", "No Vulnerabilities")),
            HealthTier::Healthy
        );
    }

    #[test]
    fn test_services_rules() {
        let aggregator = SectionAggregator::default();
        assert_eq!(aggregator.services(&services("Critical Service Down")), HealthTier::Critical);
        assert_eq!(aggregator.services(&services("2 Services Stopped")), HealthTier::Warning);
        assert_eq!(aggregator.services(&services("All Services Running")), HealthTier::Healthy);
        assert_eq!(aggregator.services(&ServicesSignals::default()), HealthTier::Indeterminate);
    }

    #[test]
    fn test_unknown_vocabulary_is_not_inferred() {
        let aggregator = SectionAggregator::default();
        assert_eq!(aggregator.services(&services("3 Services Stopped")), HealthTier::Healthy);
        assert_eq!(aggregator.operating_system(&os("critical", "No Restart Pending")), HealthTier::Healthy);
    }

    #[test]
    fn test_custom_vocabulary() {
        let mut vocabulary = VocabularyTable::default();
        vocabulary.services[0].warning.push("1 Service Stopped".into());
        let aggregator = SectionAggregator::new(UsageBands::default(), ChargeBands::default(), vocabulary);
        assert_eq!(aggregator.services(&services("1 Service Stopped")), HealthTier::Warning);
    }

    #[test]
    fn test_vocabulary_conflicts() {
        assert!(VocabularyTable::default().conflicts().is_empty());

        let mut vocabulary = VocabularyTable::default();
        vocabulary.operating_system[0].warning.push("Critical".into());
        assert_eq!(vocabulary.conflicts(), vec![(SignalField::DriverHealth, "Critical".to_string())]);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let aggregator = SectionAggregator::default();
        let signals = security("Encrypting", "Antivirus Disabled", "2 Low Risk");
        assert_eq!(aggregator.security(&signals), aggregator.security(&signals));
    }
}
