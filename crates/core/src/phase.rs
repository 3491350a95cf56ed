//! Phase model - contractual delivery buckets and their derived metrics.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use crate::id::PhaseId;
use crate::work_item::WorkItem;

/// A contractual delivery phase from the statement of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Unique identifier
    pub id: PhaseId,

    /// Display name
    pub name: String,

    /// Description
    pub description: String,

    /// Nominal duration label (`4 weeks`, `Milestone`)
    pub duration: String,

    /// Expected deliverables, in contract order
    pub deliverables: Vec<String>,
}

impl Phase {
    fn new(id: &str, name: &str, description: &str, duration: &str, deliverables: &[&str]) -> Self {
        Self {
            id: PhaseId::new(id),
            name: name.to_string(),
            description: description.to_string(),
            duration: duration.to_string(),
            deliverables: deliverables.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// Ordered table of phases.
///
/// The order is load-bearing: status gating looks at every phase that
/// comes earlier in this list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCatalog {
    phases: Vec<Phase>,
}

impl PhaseCatalog {
    /// Build a catalog from phases in delivery order.
    pub fn new(phases: Vec<Phase>) -> Self {
        Self { phases }
    }

    /// The eight phases of the EQ statement of work.
    pub fn sow() -> Self {
        Self::new(vec![
            Phase::new(
                "phase1a",
                "Phase 1A - Foundation",
                "Project bootstrap, security, and infrastructure setup",
                "4 weeks",
                &[
                    "Django backend with REST API",
                    "PostgreSQL database setup",
                    "React frontend with TypeScript",
                    "Azure infrastructure setup",
                    "CI/CD pipeline",
                ],
            ),
            Phase::new(
                "phase1b",
                "Phase 1B - Core Features",
                "Document processing and AI integration",
                "4 weeks",
                &[
                    "Document upload system",
                    "Azure Form Recognizer integration",
                    "OpenAI GPT-4 extraction",
                    "Data validation pipeline",
                ],
            ),
            Phase::new(
                "phase1c",
                "Phase 1C - MVP Polish",
                "User interface and feature completion",
                "4 weeks",
                &[
                    "Review & confirmation UI",
                    "Role-based permissions",
                    "Performance optimization",
                    "User documentation",
                ],
            ),
            Phase::new(
                "phase1-completion",
                "Phase 1 Completion",
                "Feature-ready milestone completion",
                "Milestone",
                &[
                    "Complete MVP with document ingestion",
                    "Data extraction capabilities",
                    "Export functionality",
                ],
            ),
            Phase::new(
                "phase2a",
                "Phase 2A - Analysis Framework",
                "Data analysis and KPI interfaces",
                "4 weeks",
                &[
                    "PE-focused KPI queries",
                    "Visual analytics",
                    "Deal evaluation framework",
                ],
            ),
            Phase::new(
                "phase2b",
                "Phase 2B - Advanced Features",
                "Scenario modeling and reporting",
                "4 weeks",
                &[
                    "Scenario planning tools",
                    "Forward projections",
                    "Deal comparison features",
                ],
            ),
            Phase::new(
                "phase2c",
                "Phase 2C - Production Ready",
                "Multi-tenant architecture and DevOps",
                "4 weeks",
                &[
                    "Multi-tenant architecture",
                    "Production deployment",
                    "Enhanced security & monitoring",
                ],
            ),
            Phase::new(
                "phase2-completion",
                "Phase 2 Completion",
                "Production-ready milestone completion",
                "Milestone",
                &[
                    "Full production environment",
                    "Advanced dashboards",
                    "Enhanced AI insights",
                ],
            ),
        ])
    }

    /// Phases in delivery order.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Look up a phase by id.
    pub fn get(&self, id: &PhaseId) -> Option<&Phase> {
        self.phases.iter().find(|p| &p.id == id)
    }

    /// Position of a phase in delivery order.
    pub fn position(&self, id: &PhaseId) -> Option<usize> {
        self.phases.iter().position(|p| &p.id == id)
    }

    /// Number of phases.
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Whether the catalog has no phases.
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

impl Default for PhaseCatalog {
    fn default() -> Self {
        Self::sow()
    }
}

/// Qualitative phase (and milestone) state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseStatus {
    /// Every item closed
    Completed,
    /// Some but not all items closed
    InProgress,
    /// Nothing closed yet, and nothing earlier is holding it back
    Ready,
    /// Waiting on earlier phases
    Upcoming,
}

impl PhaseStatus {
    /// Kebab-case form used by the view model.
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseStatus::Completed => "completed",
            PhaseStatus::InProgress => "in-progress",
            PhaseStatus::Ready => "ready",
            PhaseStatus::Upcoming => "upcoming",
        }
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived metrics for one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseMetrics {
    /// Phase identifier
    pub phase_id: PhaseId,

    /// Display name, copied from the catalog
    pub name: String,

    /// Duration label, copied from the catalog
    pub duration: String,

    /// Items classified into this phase
    pub total_items: usize,

    /// Closed items among them
    pub completed_items: usize,

    /// Integer percentage 0-100
    pub progress: u8,

    /// Derived status
    pub status: PhaseStatus,

    /// The classified items
    pub items: Vec<WorkItem>,
}

impl PhaseMetrics {
    /// Zeroed metrics for a catalog entry.
    pub fn empty(phase: &Phase) -> Self {
        Self {
            phase_id: phase.id.clone(),
            name: phase.name.clone(),
            duration: phase.duration.clone(),
            total_items: 0,
            completed_items: 0,
            progress: 0,
            status: PhaseStatus::Upcoming,
            items: Vec::new(),
        }
    }

    /// No items were classified here.
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// Has items and all of them are closed.
    pub fn is_complete(&self) -> bool {
        self.total_items > 0 && self.progress == 100
    }
}

/// Phase metrics keyed by phase id, kept in catalog order.
///
/// Serializes as a JSON object whose keys follow catalog order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhaseMetricsMap {
    entries: Vec<PhaseMetrics>,
}

impl PhaseMetricsMap {
    /// Build from metrics already in catalog order.
    pub fn new(entries: Vec<PhaseMetrics>) -> Self {
        Self { entries }
    }

    /// Metrics for a phase.
    pub fn get(&self, id: &str) -> Option<&PhaseMetrics> {
        self.entries.iter().find(|m| m.phase_id == id)
    }

    /// Iterate in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, PhaseMetrics> {
        self.entries.iter()
    }

    /// Number of phases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no phases.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PhaseMetricsMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for metrics in &self.entries {
            map.serialize_entry(metrics.phase_id.as_str(), metrics)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a PhaseMetricsMap {
    type Item = &'a PhaseMetrics;
    type IntoIter = std::slice::Iter<'a, PhaseMetrics>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
