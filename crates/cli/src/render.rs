//! Plain-text rendering of the project view.

use sowtrack_core::{Feature, Phase, PhaseCatalog, PhaseMetrics, ProjectView, Time};
use sowtrack_progress::{DashboardStats, FilterOptions};
use std::fmt::Write;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn date(t: Time) -> String {
    t.format(DATE_FORMAT).to_string()
}

fn bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) / 5;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(20 - filled))
}

/// Header, metric cards, phase breakdown, timeline and recent activity.
pub fn overview(view: &ProjectView, now: Time) -> String {
    let stats = DashboardStats::compute(view, now);
    let project = &view.project;
    let mut out = String::new();

    let _ = writeln!(out, "{}", project.title);
    let _ = writeln!(out, "{}", project.description);
    let _ = writeln!(out, "Current stage: {}", project.current_phase);
    out.push('\n');

    let _ = writeln!(out, "Overall progress   {:>3}% {}", project.overall_progress, bar(project.overall_progress));
    let _ = writeln!(
        out,
        "Features complete  {}/{}",
        stats.completed_features, stats.total_features
    );
    let _ = writeln!(out, "Team size          {}", project.team_size);
    let _ = writeln!(
        out,
        "Hours spent        {}/{}",
        project.hours_spent, project.total_hours
    );
    let _ = writeln!(out, "Days to target     {}", stats.days_to_target);
    out.push('\n');

    out.push_str("Phases\n");
    for metrics in &view.phase_metrics {
        let _ = writeln!(out, "  {}", phase_row(metrics));
    }
    out.push('\n');

    out.push_str("Timeline\n");
    let _ = writeln!(
        out,
        "  {:<28} {}",
        "Start",
        date(project.start_date)
    );
    for milestone in &view.milestones {
        let _ = writeln!(
            out,
            "  {:<28} {}  {:<11} {:>3}%  {}",
            milestone.name,
            date(milestone.target_date),
            milestone.status.as_str(),
            milestone.progress,
            milestone.description
        );
    }
    out.push('\n');

    out.push_str("Recent activity\n");
    if view.recent_activity.is_empty() {
        out.push_str("  (none)\n");
    }
    for entry in &view.recent_activity {
        let phase = entry.phase.as_ref().map(|p| p.as_str()).unwrap_or("-");
        let _ = writeln!(out, "  {}  {:<16} {}", date(entry.date), phase, entry.message);
    }

    out
}

fn phase_row(metrics: &PhaseMetrics) -> String {
    format!(
        "{:<18} {:<11} {:>3}% {} {:>3}/{:<3} {}",
        metrics.phase_id.as_str(),
        metrics.status.as_str(),
        metrics.progress,
        bar(metrics.progress),
        metrics.completed_items,
        metrics.total_items,
        metrics.duration
    )
}

/// Per-phase table.
pub fn phase_table(view: &ProjectView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<18} {:<11} {:>4} {:<22} {:>7} DURATION",
        "PHASE", "STATUS", "PCT", "", "DONE"
    );
    for metrics in &view.phase_metrics {
        let _ = writeln!(out, "{}", phase_row(metrics));
    }
    out
}

/// One phase: catalog description, deliverables and its items.
pub fn phase_detail(phase: &Phase, metrics: Option<&PhaseMetrics>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", phase.name, phase.id);
    let _ = writeln!(out, "{}", phase.description);
    let _ = writeln!(out, "Duration: {}", phase.duration);
    out.push_str("Deliverables\n");
    for deliverable in &phase.deliverables {
        let _ = writeln!(out, "  - {}", deliverable);
    }

    let Some(metrics) = metrics else {
        return out;
    };
    let _ = writeln!(
        out,
        "Status: {} ({}%, {}/{} items)",
        metrics.status, metrics.progress, metrics.completed_items, metrics.total_items
    );
    if !metrics.items.is_empty() {
        out.push_str("Items\n");
    }
    for item in &metrics.items {
        let _ = writeln!(
            out,
            "  #{:<5} {:<6} {:<14} {}",
            item.number,
            item.state.as_str(),
            item.assignee,
            item.title
        );
    }
    out
}

/// Feature table with a trailing count line.
pub fn feature_table(features: &[&Feature], total: usize, filtered: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<7} {:<11} {:<18} {:<14} TITLE",
        "NUMBER", "STATUS", "PHASE", "ASSIGNEE"
    );
    for feature in features {
        let _ = writeln!(
            out,
            "#{:<6} {:<11} {:<18} {:<14} {}",
            feature.number,
            feature.status.as_str(),
            feature.phase.as_ref().map(|p| p.as_str()).unwrap_or("-"),
            feature.assignee,
            feature.title
        );
    }

    let completed = features
        .iter()
        .filter(|f| f.status == sowtrack_core::FeatureStatus::Completed)
        .count();
    out.push('\n');
    if filtered {
        let _ = writeln!(
            out,
            "{} of {} completed (filtered from {} total)",
            completed,
            features.len(),
            total
        );
    } else {
        let _ = writeln!(out, "{} of {} completed", completed, features.len());
    }
    out
}

/// Values the feature filters can take, shown when a filter matches nothing.
pub fn filter_options(options: &FilterOptions) -> String {
    let join = |values: Vec<&str>| {
        if values.is_empty() {
            "(none)".to_string()
        } else {
            values.join(", ")
        }
    };
    let mut out = String::new();
    out.push_str("Available filters\n");
    let _ = writeln!(
        out,
        "  phases:    {}",
        join(options.phases.iter().map(|p| p.as_str()).collect())
    );
    let _ = writeln!(
        out,
        "  statuses:  {}",
        join(options.statuses.iter().map(|s| s.as_str()).collect())
    );
    let _ = writeln!(
        out,
        "  assignees: {}",
        join(options.assignees.iter().map(String::as_str).collect())
    );
    out
}

/// The phase catalog.
pub fn catalog(catalog: &PhaseCatalog) -> String {
    let mut out = String::new();
    for phase in catalog.phases() {
        let _ = writeln!(out, "{:<18} {:<40} {}", phase.id.as_str(), phase.name, phase.duration);
        for deliverable in &phase.deliverables {
            let _ = writeln!(out, "{:<18}   - {}", "", deliverable);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sowtrack_core::{ItemState, ProjectSnapshot, WorkItem, WorkItemId, WorkItemKind};
    use sowtrack_progress::{FeatureFilter, ProjectProfile, ViewAssembler};

    fn item(number: u64, labels: &[&str], closed: bool) -> WorkItem {
        let created = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
        let updated = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        WorkItem {
            id: WorkItemId::new(format!("I_{}", number)),
            number,
            kind: WorkItemKind::Issue,
            title: format!("Item {}", number),
            body: String::new(),
            state: if closed { ItemState::Closed } else { ItemState::Open },
            created_at: created,
            updated_at: updated,
            closed_at: closed.then_some(updated),
            assignee: "alice".to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            url: None,
            comments: Vec::new(),
        }
    }

    fn view() -> ProjectView {
        let snapshot = ProjectSnapshot {
            title: Some("EQ Platform".to_string()),
            description: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap(),
            url: None,
            items: vec![item(1, &["1a"], true), item(2, &["1a"], false), item(3, &[], false)],
        };
        let catalog = PhaseCatalog::sow();
        let profile = ProjectProfile::default();
        ViewAssembler::new(&catalog, &profile).assemble(&snapshot, Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0), "[....................]");
        assert_eq!(bar(50), "[##########..........]");
        assert_eq!(bar(100), "[####################]");
    }

    #[test]
    fn test_overview_lists_every_phase() {
        let text = overview(&view(), Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());
        assert!(text.starts_with("EQ Platform\n"));
        assert!(text.contains("Features complete  1/3"));
        for id in ["phase1a", "phase1b", "phase1c", "phase1-completion", "phase2a", "phase2b", "phase2c", "phase2-completion"] {
            assert!(text.contains(id), "missing {}", id);
        }
        assert!(text.contains("Completed: Item 1"));
    }

    #[test]
    fn test_feature_table_filtered_footer() {
        let view = view();
        let filter = FeatureFilter {
            phase: Some("phase1a".parse().unwrap()),
            ..Default::default()
        };
        let shown = filter.apply(&view.features);
        let text = feature_table(&shown, view.features.len(), filter.is_active());
        assert!(text.ends_with("1 of 2 completed (filtered from 3 total)\n"));
    }

    #[test]
    fn test_filter_options_lists_values() {
        let view = view();
        let text = filter_options(&FilterOptions::from_features(&view.features));
        assert!(text.contains("  phases:    phase1a\n"));
        assert!(text.contains("  statuses:  completed, in-progress\n"));
        assert!(text.contains("  assignees: alice\n"));
    }

    #[test]
    fn test_phase_detail_includes_items() {
        let view = view();
        let catalog = PhaseCatalog::sow();
        let phase = &catalog.phases()[0];
        let text = phase_detail(phase, view.phase_metrics.get("phase1a"));
        assert!(text.contains("Deliverables"));
        assert!(text.contains("Status: in-progress (50%, 1/2 items)"));
        assert!(text.contains("Item 2"));
    }
}
