//! Diagnostics View Model Builder.
//!
//! Combines the classifier, the composite scorer and the section aggregator
//! into the single display object the dashboard's diagnostics tab renders.
//! Pure transformation: no I/O, and any missing input renders as
//! "Not Available" with an Indeterminate tier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::config::CockpitConfig;
use crate::core::tier::{ColorToken, HealthTier};
use crate::utils::constants::NOT_AVAILABLE;

use super::classifier::{Classification, MetricClassifier, MetricValue};
use super::scorer::{Deduction, DeviceHealthScore, DeviceSnapshot, HealthScorer, SyncRecency};
use super::sections::{
    HardwareSignals, OsSignals, Section, SectionAggregator, SecuritySignals, ServicesSignals,
};

// ═══════════════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything fetched for one ticket's diagnostics tab
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsInput {
    /// Ticket identifier
    pub ticket_id: String,
    /// Device-management snapshot, if the device was resolved
    #[serde(default)]
    pub snapshot: Option<DeviceSnapshot>,
    /// Hardware readings
    #[serde(default)]
    pub hardware: HardwareSignals,
    /// OS signals
    #[serde(default)]
    pub os: OsSignals,
    /// Security signals
    #[serde(default)]
    pub security: SecuritySignals,
    /// Services signals
    #[serde(default)]
    pub services: ServicesSignals,
}

impl DiagnosticsInput {
    /// Empty input for a ticket
    pub fn new(ticket_id: impl Into<String>) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            ..Default::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VIEW MODEL
// ═══════════════════════════════════════════════════════════════════════════════

/// Numeric metric ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricView {
    /// Label
    pub label: String,
    /// Raw value
    pub value: MetricValue,
    /// Display text ("85%" or "Not Available")
    pub display: String,
    /// Tier
    pub tier: HealthTier,
    /// Color
    pub color: ColorToken,
}

impl MetricView {
    fn new(label: &str, value: MetricValue, classification: Classification) -> Self {
        Self {
            label: label.to_string(),
            display: value.display(),
            value,
            tier: classification.tier,
            color: classification.color,
        }
    }
}

/// Categorical signal ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalView {
    /// Label
    pub label: String,
    /// Display text, "Not Available" when absent
    pub display: String,
}

impl SignalView {
    fn new(label: &str, value: Option<&str>) -> Self {
        let display = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(NOT_AVAILABLE);
        Self {
            label: label.to_string(),
            display: display.to_string(),
        }
    }
}

/// Section badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionView {
    /// Section
    pub section: Section,
    /// Tab title
    pub title: String,
    /// Tier
    pub tier: HealthTier,
    /// Color
    pub color: ColorToken,
    /// Signals shown in the section
    pub signals: Vec<SignalView>,
}

/// Composite device score ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeView {
    /// Unclamped score
    pub score: i32,
    /// Score clamped for the gauge
    pub display_score: u8,
    /// Tier
    pub tier: HealthTier,
    /// Color
    pub color: ColorToken,
    /// Applied deductions
    pub deductions: Vec<Deduction>,
    /// Sync recency
    pub sync: SyncRecency,
}

impl From<DeviceHealthScore> for CompositeView {
    fn from(score: DeviceHealthScore) -> Self {
        Self {
            display_score: score.display_score(),
            score: score.score,
            tier: score.tier,
            color: score.tier.color(),
            deductions: score.deductions,
            sync: score.sync,
        }
    }
}

/// Display-ready diagnostics for one ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsViewModel {
    /// Ticket identifier
    pub ticket_id: String,
    /// When the view model was built
    pub generated_at: DateTime<Utc>,
    /// CPU usage
    pub cpu: MetricView,
    /// RAM usage
    pub ram: MetricView,
    /// Battery charge
    pub battery: MetricView,
    /// Device memory usage from the management snapshot
    pub memory_usage: MetricView,
    /// Device disk usage from the management snapshot
    pub disk_usage: MetricView,
    /// Composite score, absent when no snapshot was supplied
    pub composite: Option<CompositeView>,
    /// Section badges in display order
    pub sections: Vec<SectionView>,
}

impl DiagnosticsViewModel {
    /// Composite tier, Indeterminate without a snapshot
    pub fn composite_tier(&self) -> HealthTier {
        self.composite
            .as_ref()
            .map(|c| c.tier)
            .unwrap_or(HealthTier::Indeterminate)
    }

    /// Tier of one section
    pub fn section_tier(&self, section: Section) -> HealthTier {
        self.sections
            .iter()
            .find(|s| s.section == section)
            .map(|s| s.tier)
            .unwrap_or(HealthTier::Indeterminate)
    }

    /// Worst tier across the composite score and all sections
    pub fn overall_tier(&self) -> HealthTier {
        HealthTier::worst(
            self.sections
                .iter()
                .map(|s| s.tier)
                .chain(std::iter::once(self.composite_tier())),
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BUILDER
// ═══════════════════════════════════════════════════════════════════════════════

/// Builds view models from configured classification components
#[derive(Debug, Clone, Default)]
pub struct ViewModelBuilder {
    classifier: MetricClassifier,
    scorer: HealthScorer,
    aggregator: SectionAggregator,
}

impl ViewModelBuilder {
    /// Create from explicit components
    pub fn new(classifier: MetricClassifier, scorer: HealthScorer, aggregator: SectionAggregator) -> Self {
        Self {
            classifier,
            scorer,
            aggregator,
        }
    }

    /// Create from configuration
    pub fn from_config(config: &CockpitConfig) -> Self {
        Self::new(
            MetricClassifier::new(config.usage_bands, config.charge_bands, config.confidence_bands),
            HealthScorer::new(config.score_weights),
            SectionAggregator::new(config.usage_bands, config.charge_bands, config.vocabulary.clone()),
        )
    }

    /// Build the view model for `input` as of `now`
    pub fn build(&self, input: &DiagnosticsInput, now: DateTime<Utc>) -> DiagnosticsViewModel {
        let hardware = &input.hardware;
        let cpu = MetricValue::from(hardware.cpu);
        let ram = MetricValue::from(hardware.ram);
        let battery = MetricValue::from(hardware.battery);

        let (memory_usage, disk_usage) = match &input.snapshot {
            Some(snapshot) => (
                MetricValue::from(snapshot.memory_percent()),
                MetricValue::from(snapshot.disk_percent()),
            ),
            None => (MetricValue::NotAvailable, MetricValue::NotAvailable),
        };

        let composite = input
            .snapshot
            .as_ref()
            .map(|snapshot| CompositeView::from(self.scorer.score(snapshot, now)));

        let sections = vec![
            self.section_view(
                Section::Hardware,
                self.aggregator.hardware(hardware),
                vec![
                    SignalView::new("CPU", Some(cpu.display().as_str())),
                    SignalView::new("RAM", Some(ram.display().as_str())),
                    SignalView::new("Battery", Some(battery.display().as_str())),
                ],
            ),
            self.section_view(
                Section::OperatingSystem,
                self.aggregator.operating_system(&input.os),
                vec![
                    SignalView::new("Driver Health", input.os.driver_health.as_deref()),
                    SignalView::new("Restart Status", input.os.restart_status.as_deref()),
                ],
            ),
            self.section_view(
                Section::Security,
                self.aggregator.security(&input.security),
                vec![
                    SignalView::new("Encryption", input.security.encryption_status.as_deref()),
                    SignalView::new("Antivirus", input.security.antivirus_status.as_deref()),
                    SignalView::new("Vulnerability Scan", input.security.vulnerability_scan.as_deref()),
                ],
            ),
            self.section_view(
                Section::Services,
                self.aggregator.services(&input.services),
                vec![SignalView::new("Services", input.services.services_health.as_deref())],
            ),
        ];

        DiagnosticsViewModel {
            ticket_id: input.ticket_id.clone(),
            generated_at: now,
            cpu: MetricView::new("CPU Usage", cpu, self.classifier.classify_usage(cpu)),
            ram: MetricView::new("RAM Usage", ram, self.classifier.classify_usage(ram)),
            battery: MetricView::new("Battery", battery, self.classifier.classify_charge(battery)),
            memory_usage: MetricView::new("Memory Usage", memory_usage, self.classifier.classify_usage(memory_usage)),
            disk_usage: MetricView::new("Disk Usage", disk_usage, self.classifier.classify_usage(disk_usage)),
            composite,
            sections,
        }
    }

    fn section_view(&self, section: Section, tier: HealthTier, signals: Vec<SignalView>) -> SectionView {
        SectionView {
            section,
            title: section.title().to_string(),
            tier,
            color: tier.color(),
            signals,
        }
    }
}
