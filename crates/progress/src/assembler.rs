//! Project view assembly.
//!
//! Composes the classifier, the phase tracker and the estimator into the
//! view model the rendering layer consumes. Nothing here reads the clock;
//! callers pass `now` so the same snapshot always yields the same view.

use sowtrack_core::{
    ActivityEntry, ActivityKind, Feature, FeatureStatus, Milestone, PhaseCatalog, PhaseMetricsMap,
    PhaseStatus, ProjectSnapshot, ProjectSummary, ProjectView, Time, WorkItem,
};
use tracing::info;

use crate::classifier::classify_item;
use crate::estimator::{CompletionEstimator, ScheduleProjection, DEFAULT_TOTAL_WEEKS};
use crate::tracker::{overall_progress, PhaseTracker};

/// Fixed facts about the engagement that the tracker does not know.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectProfile {
    /// Repository owner, used for fallback titles
    pub owner: String,

    /// Repository name, used for fallback titles
    pub repo: String,

    /// Contributors shown on the dashboard
    pub team_size: u32,

    /// Contracted hours
    pub total_hours: u32,

    /// Share of pro-rata hours actually burned
    pub burn_rate: f64,

    /// Nominal contract length in weeks
    pub total_weeks: i64,

    /// Entries kept in the activity feed
    pub activity_limit: usize,

    /// Characters of body kept in feature descriptions
    pub description_limit: usize,
}

impl Default for ProjectProfile {
    fn default() -> Self {
        Self {
            owner: "buddahb88".to_string(),
            repo: "EllaCap_EQ".to_string(),
            team_size: 6,
            total_hours: 480,
            burn_rate: 0.9,
            total_weeks: DEFAULT_TOTAL_WEEKS,
            activity_limit: 5,
            description_limit: 120,
        }
    }
}

/// Builds a [`ProjectView`] from a snapshot.
pub struct ViewAssembler<'a> {
    catalog: &'a PhaseCatalog,
    profile: &'a ProjectProfile,
}

impl<'a> ViewAssembler<'a> {
    /// Create an assembler.
    pub fn new(catalog: &'a PhaseCatalog, profile: &'a ProjectProfile) -> Self {
        Self { catalog, profile }
    }

    /// Run the whole pipeline over one snapshot.
    pub fn assemble(&self, snapshot: &ProjectSnapshot, now: Time) -> ProjectView {
        let items = &snapshot.items;
        let progress = overall_progress(items);
        let phase_metrics = PhaseTracker::new(self.catalog).aggregate(items);

        let estimator = CompletionEstimator::with_weeks(self.profile.total_weeks);
        let projection = estimator.project(snapshot.created_at, progress, now);

        info!(
            "Assembled view: {} items, {}% complete, stage {}",
            items.len(),
            progress,
            projection.stage
        );

        ProjectView {
            project: self.summary(snapshot, progress, &projection),
            milestones: milestones(snapshot.created_at, progress, &phase_metrics, &projection),
            features: items.iter().map(|i| self.feature(i)).collect(),
            recent_activity: recent_activity(items, self.profile.activity_limit),
            phase_metrics,
        }
    }

    fn summary(
        &self,
        snapshot: &ProjectSnapshot,
        progress: u8,
        projection: &ScheduleProjection,
    ) -> ProjectSummary {
        let title = non_empty(snapshot.title.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}/{} Project", self.profile.owner, self.profile.repo));
        let description = non_empty(snapshot.description.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("GitHub project for {}", self.profile.repo));

        let hours_spent = (f64::from(self.profile.total_hours)
            * (f64::from(progress) / 100.0)
            * self.profile.burn_rate)
            .round() as u32;

        ProjectSummary {
            title,
            description,
            start_date: snapshot.created_at,
            target_date: projection.projected_end,
            current_phase: projection.stage.to_string(),
            overall_progress: progress,
            team_size: self.profile.team_size,
            total_hours: self.profile.total_hours,
            hours_spent,
        }
    }

    fn feature(&self, item: &WorkItem) -> Feature {
        Feature {
            id: item.id.clone(),
            number: item.number,
            title: item.title.clone(),
            description: summarize_body(&item.body, self.profile.description_limit),
            status: if item.is_closed() {
                FeatureStatus::Completed
            } else {
                FeatureStatus::InProgress
            },
            assignee: item.assignee.clone(),
            completed_date: item.closed_at,
            business_value: format!("GitHub Issue #{}", item.number),
            body: item.body.clone(),
            comments: item.comments.clone(),
            phase: classify_item(item),
            url: item.url.clone(),
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// First `limit` characters of the body followed by `...`, or
/// `No description` when the body is empty.
pub fn summarize_body(body: &str, limit: usize) -> String {
    if body.is_empty() {
        return "No description".to_string();
    }
    let mut text: String = body.chars().take(limit).collect();
    text.push_str("...");
    text
}

/// The `limit` most recently updated items, newest first. Items updated
/// at the same instant keep their source order.
pub fn recent_activity(items: &[WorkItem], limit: usize) -> Vec<ActivityEntry> {
    let mut ordered: Vec<&WorkItem> = items.iter().collect();
    ordered.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    ordered
        .into_iter()
        .take(limit)
        .map(|item| {
            let (kind, verb) = if item.is_closed() {
                (ActivityKind::Completion, "Completed")
            } else {
                (ActivityKind::Progress, "Updated")
            };
            ActivityEntry {
                date: item.updated_at,
                kind,
                message: format!("{}: {}", verb, item.title),
                phase: classify_item(item),
            }
        })
        .collect()
}

fn milestones(
    start: Time,
    progress: u8,
    phase_metrics: &PhaseMetricsMap,
    projection: &ScheduleProjection,
) -> Vec<Milestone> {
    let foundation = phase_metrics.get("phase1a").map(|m| m.progress).unwrap_or(0);

    vec![
        Milestone {
            id: 1,
            name: "Phase 1A - Foundation".to_string(),
            target_date: CompletionEstimator::milestone_target(start, 4),
            status: if foundation == 100 {
                PhaseStatus::Completed
            } else {
                PhaseStatus::InProgress
            },
            progress: foundation,
            description: "Infrastructure & security setup".to_string(),
        },
        Milestone {
            id: 2,
            name: "Phase 1 - Feature Ready".to_string(),
            target_date: CompletionEstimator::milestone_target(start, 12),
            status: if progress > 50 {
                PhaseStatus::InProgress
            } else {
                PhaseStatus::Upcoming
            },
            progress,
            description: "Core MVP with AI processing".to_string(),
        },
        Milestone {
            id: 3,
            name: "Phase 2 - Production Ready".to_string(),
            target_date: projection.projected_end,
            status: PhaseStatus::Upcoming,
            progress: progress.saturating_sub(70),
            description: "Multi-tenant production deployment".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use sowtrack_core::{ItemState, PhaseId, WorkItemId, WorkItemKind};

    fn start() -> Time {
        Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap()
    }

    fn item(n: u64, labels: &[&str], state: ItemState, updated_days: i64) -> WorkItem {
        let updated = start() + Duration::days(updated_days);
        WorkItem {
            id: WorkItemId::new(format!("I_{}", n)),
            number: n,
            kind: WorkItemKind::Issue,
            title: format!("Item {}", n),
            body: if n % 2 == 0 { "x".repeat(200) } else { String::new() },
            state,
            created_at: start(),
            updated_at: updated,
            closed_at: (state == ItemState::Closed).then_some(updated),
            assignee: "alice".to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            url: None,
            comments: Vec::new(),
        }
    }

    fn snapshot(items: Vec<WorkItem>) -> ProjectSnapshot {
        ProjectSnapshot {
            title: Some("EQ Platform".to_string()),
            description: None,
            created_at: start(),
            url: None,
            items,
        }
    }

    fn ten_items() -> Vec<WorkItem> {
        let mut items = vec![
            item(1, &["Phase 1A"], ItemState::Closed, 3),
            item(2, &["Phase 1A"], ItemState::Closed, 1),
            item(3, &["Phase 1A"], ItemState::Closed, 7),
            item(4, &["Phase 1A"], ItemState::Open, 7),
        ];
        for n in 5..=10 {
            items.push(item(n, &[], ItemState::Open, n as i64));
        }
        items
    }

    #[test]
    fn test_end_to_end_ten_items() {
        let catalog = PhaseCatalog::sow();
        let profile = ProjectProfile::default();
        let now = start() + Duration::weeks(6);

        let view = ViewAssembler::new(&catalog, &profile).assemble(&snapshot(ten_items()), now);

        let phase1a = view.phase_metrics.get("phase1a").unwrap();
        assert_eq!(phase1a.total_items, 4);
        assert_eq!(phase1a.completed_items, 3);
        assert_eq!(phase1a.progress, 75);
        assert_eq!(phase1a.status, PhaseStatus::InProgress);

        assert_eq!(view.project.overall_progress, 30);
        assert_eq!(view.project.current_phase, "Development");
        assert_eq!(view.project.title, "EQ Platform");
        assert_eq!(view.project.description, "GitHub project for EllaCap_EQ");
        assert_eq!(view.project.hours_spent, 130);
        assert_eq!(view.features.len(), 10);
        assert_eq!(view.features[0].phase, Some(PhaseId::new("phase1a")));
        assert_eq!(view.features[4].phase, None);
    }

    #[test]
    fn test_zero_items() {
        let catalog = PhaseCatalog::sow();
        let profile = ProjectProfile::default();

        let view = ViewAssembler::new(&catalog, &profile).assemble(&snapshot(vec![]), start());

        assert_eq!(view.project.overall_progress, 0);
        assert_eq!(view.project.target_date, start() + Duration::weeks(24));
        assert!(view.features.is_empty());
        assert!(view.recent_activity.is_empty());
        assert_eq!(view.phase_metrics.get("phase1a").unwrap().status, PhaseStatus::Ready);
        assert!(view
            .phase_metrics
            .iter()
            .skip(1)
            .all(|m| m.status == PhaseStatus::Upcoming && m.progress == 0));
    }

    #[test]
    fn test_recent_activity_sorted_and_capped() {
        let activity = recent_activity(&ten_items(), 5);

        assert_eq!(activity.len(), 5);
        assert!(activity.windows(2).all(|w| w[0].date >= w[1].date));
        assert_eq!(activity[0].message, "Updated: Item 10");
        // items 3, 4 and 7 share an update time; source order breaks the tie
        // and the cap cuts item 7
        let tied: Vec<&str> = activity
            .iter()
            .filter(|a| a.date == start() + Duration::days(7))
            .map(|a| a.message.as_str())
            .collect();
        assert_eq!(tied, vec!["Completed: Item 3", "Updated: Item 4"]);
    }

    #[test]
    fn test_feature_description_truncation() {
        assert_eq!(summarize_body("", 120), "No description");
        let long = "é".repeat(150);
        let summary = summarize_body(&long, 120);
        assert_eq!(summary.chars().count(), 123);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_milestones() {
        let catalog = PhaseCatalog::sow();
        let profile = ProjectProfile::default();
        let view = ViewAssembler::new(&catalog, &profile).assemble(&snapshot(ten_items()), start());

        assert_eq!(view.milestones.len(), 3);
        assert_eq!(view.milestones[0].target_date, start() + Duration::weeks(4));
        assert_eq!(view.milestones[0].status, PhaseStatus::InProgress);
        assert_eq!(view.milestones[0].progress, 75);
        assert_eq!(view.milestones[1].target_date, start() + Duration::weeks(12));
        assert_eq!(view.milestones[1].status, PhaseStatus::Upcoming);
        assert_eq!(view.milestones[2].target_date, view.project.target_date);
        assert_eq!(view.milestones[2].progress, 0);
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let catalog = PhaseCatalog::sow();
        let profile = ProjectProfile::default();
        let assembler = ViewAssembler::new(&catalog, &profile);
        let snap = snapshot(ten_items());
        let now = start() + Duration::days(40);

        let first = serde_json::to_string(&assembler.assemble(&snap, now)).unwrap();
        let second = serde_json::to_string(&assembler.assemble(&snap, now)).unwrap();
        assert_eq!(first, second);
    }
}
