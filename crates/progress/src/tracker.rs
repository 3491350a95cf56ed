//! Phase metrics aggregation.

use sowtrack_core::{PhaseCatalog, PhaseMetrics, PhaseMetricsMap, PhaseStatus, WorkItem};
use tracing::debug;

use crate::classifier::classify_item;

/// Integer completion percentage, rounded half up. Zero when `total` is zero.
pub fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((completed * 200 + total) / (total * 2)) as u8
}

/// Share of all items that are closed, classified or not.
pub fn overall_progress(items: &[WorkItem]) -> u8 {
    let closed = items.iter().filter(|i| i.is_closed()).count();
    percentage(closed, items.len())
}

/// Groups work items by phase and derives per-phase status.
pub struct PhaseTracker<'a> {
    catalog: &'a PhaseCatalog,
}

impl<'a> PhaseTracker<'a> {
    /// Create a tracker over a catalog.
    pub fn new(catalog: &'a PhaseCatalog) -> Self {
        Self { catalog }
    }

    /// Compute metrics for every catalog phase.
    ///
    /// Every catalog phase appears in the result, in catalog order, even
    /// when nothing was classified into it. Items classified into a phase
    /// the catalog does not know are ignored.
    pub fn aggregate(&self, items: &[WorkItem]) -> PhaseMetricsMap {
        let mut metrics: Vec<PhaseMetrics> =
            self.catalog.phases().iter().map(PhaseMetrics::empty).collect();

        let mut unclassified = 0usize;
        for item in items {
            let Some(phase_id) = classify_item(item) else {
                unclassified += 1;
                continue;
            };
            let Some(index) = self.catalog.position(&phase_id) else {
                debug!("Item {} classified into unknown phase {}", item.id, phase_id);
                continue;
            };

            let entry = &mut metrics[index];
            entry.total_items += 1;
            if item.is_closed() {
                entry.completed_items += 1;
            }
            entry.items.push(item.clone());
        }

        for entry in &mut metrics {
            entry.progress = percentage(entry.completed_items, entry.total_items);
        }

        for index in 0..metrics.len() {
            let status = derive_status(&metrics[..index], &metrics[index]);
            metrics[index].status = status;
        }

        debug!(
            "Aggregated {} items into {} phases ({} unclassified)",
            items.len(),
            metrics.len(),
            unclassified
        );

        PhaseMetricsMap::new(metrics)
    }
}

/// Status of `current` given every phase before it in delivery order.
///
/// A started phase sitting at 0% is `ready` when each earlier phase is
/// either empty or complete. An empty phase is only `ready` when it is
/// first, or when every earlier phase has been delivered.
fn derive_status(earlier: &[PhaseMetrics], current: &PhaseMetrics) -> PhaseStatus {
    match current.progress {
        100 => PhaseStatus::Completed,
        p if p > 0 => PhaseStatus::InProgress,
        _ => {
            let unblocked = if current.is_empty() {
                earlier.iter().all(|m| m.status == PhaseStatus::Completed)
            } else {
                earlier.iter().all(|m| m.is_empty() || m.is_complete())
            };
            if unblocked {
                PhaseStatus::Ready
            } else {
                PhaseStatus::Upcoming
            }
        }
    }
}
