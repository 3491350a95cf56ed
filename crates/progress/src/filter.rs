//! Feature list filtering and headline stats.

use sowtrack_core::{Feature, FeatureStatus, PhaseId, ProjectView, Time};

/// Criteria for narrowing the feature list. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureFilter {
    /// Exact phase
    pub phase: Option<PhaseId>,

    /// Exact status
    pub status: Option<FeatureStatus>,

    /// Exact assignee
    pub assignee: Option<String>,

    /// Case-insensitive substring of title or description
    pub search: Option<String>,
}

impl FeatureFilter {
    /// Whether any criterion is set.
    pub fn is_active(&self) -> bool {
        self.phase.is_some()
            || self.status.is_some()
            || self.assignee.is_some()
            || self.search.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Whether a feature satisfies every set criterion.
    pub fn matches(&self, feature: &Feature) -> bool {
        if let Some(phase) = &self.phase {
            if feature.phase.as_ref() != Some(phase) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if feature.status != status {
                return false;
            }
        }
        if let Some(assignee) = &self.assignee {
            if &feature.assignee != assignee {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            return feature.title.to_lowercase().contains(&needle)
                || feature.description.to_lowercase().contains(&needle);
        }
        true
    }

    /// Features that pass the filter, in their original order.
    pub fn apply<'a>(&self, features: &'a [Feature]) -> Vec<&'a Feature> {
        features.iter().filter(|f| self.matches(f)).collect()
    }
}

/// Distinct values available for each filter, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    /// Phases with at least one classified feature
    pub phases: Vec<PhaseId>,

    /// Statuses present
    pub statuses: Vec<FeatureStatus>,

    /// Assignees present
    pub assignees: Vec<String>,
}

impl FilterOptions {
    /// Collect options from a feature list.
    pub fn from_features(features: &[Feature]) -> Self {
        let mut options = Self::default();
        for feature in features {
            if let Some(phase) = &feature.phase {
                push_unique(&mut options.phases, phase.clone());
            }
            push_unique(&mut options.statuses, feature.status);
            push_unique(&mut options.assignees, feature.assignee.clone());
        }
        options
    }
}

fn push_unique<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Headline numbers shown above the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    /// Completed features
    pub completed_features: usize,

    /// All features
    pub total_features: usize,

    /// Whole days until the projected target, rounded up. Negative once
    /// the target has passed.
    pub days_to_target: i64,
}

impl DashboardStats {
    /// Compute stats for a view at `now`.
    pub fn compute(view: &ProjectView, now: Time) -> Self {
        let completed_features = view
            .features
            .iter()
            .filter(|f| f.status == FeatureStatus::Completed)
            .count();

        let remaining_ms = (view.project.target_date - now).num_milliseconds();
        let day_ms = 24 * 60 * 60 * 1000;
        let days_to_target = div_ceil(remaining_ms, day_ms);

        Self {
            completed_features,
            total_features: view.features.len(),
            days_to_target,
        }
    }
}

fn div_ceil(n: i64, d: i64) -> i64 {
    let q = n / d;
    if n % d > 0 {
        q + 1
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use sowtrack_core::{PhaseCatalog, ProjectSnapshot, WorkItemId};

    use crate::assembler::{ProjectProfile, ViewAssembler};

    fn feature(n: u64, title: &str, status: FeatureStatus, assignee: &str, phase: Option<&str>) -> Feature {
        Feature {
            id: WorkItemId::new(format!("I_{}", n)),
            number: n,
            title: title.to_string(),
            description: "No description".to_string(),
            status,
            assignee: assignee.to_string(),
            completed_date: None,
            business_value: format!("GitHub Issue #{}", n),
            body: String::new(),
            comments: Vec::new(),
            phase: phase.map(PhaseId::new),
            url: None,
        }
    }

    fn features() -> Vec<Feature> {
        vec![
            feature(1, "Upload pipeline", FeatureStatus::Completed, "alice", Some("phase1b")),
            feature(2, "Blob storage", FeatureStatus::InProgress, "bob", Some("phase1a")),
            feature(3, "KPI queries", FeatureStatus::InProgress, "alice", None),
        ]
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = FeatureFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&features()).len(), 3);
    }

    #[test]
    fn test_filters_combine() {
        let filter = FeatureFilter {
            assignee: Some("alice".to_string()),
            status: Some(FeatureStatus::InProgress),
            ..Default::default()
        };
        let all = features();
        let matched = filter.apply(&all);
        assert!(filter.is_active());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].number, 3);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filter = FeatureFilter {
            search: Some("UPLOAD".to_string()),
            ..Default::default()
        };
        let all = features();
        let matched = filter.apply(&all);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Upload pipeline");
    }

    #[test]
    fn test_phase_filter_excludes_unclassified() {
        let filter = FeatureFilter {
            phase: Some(PhaseId::new("phase1a")),
            ..Default::default()
        };
        let all = features();
        assert_eq!(filter.apply(&all).len(), 1);
    }

    #[test]
    fn test_filter_options_first_seen_order() {
        let options = FilterOptions::from_features(&features());
        assert_eq!(options.phases, vec![PhaseId::new("phase1b"), PhaseId::new("phase1a")]);
        assert_eq!(options.statuses, vec![FeatureStatus::Completed, FeatureStatus::InProgress]);
        assert_eq!(options.assignees, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn test_days_to_target_rounds_up() {
        let start = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
        let snapshot = ProjectSnapshot {
            title: None,
            description: None,
            created_at: start,
            url: None,
            items: Vec::new(),
        };
        let catalog = PhaseCatalog::sow();
        let profile = ProjectProfile::default();
        let now = start + Duration::hours(1);
        let view = ViewAssembler::new(&catalog, &profile).assemble(&snapshot, now);

        // no progress, one hour in: target slips by an hour past 168 days
        let stats = DashboardStats::compute(&view, now);
        assert_eq!(stats.days_to_target, 168);
        assert_eq!(stats.total_features, 0);

        let late = view.project.target_date + Duration::hours(30);
        assert_eq!(DashboardStats::compute(&view, late).days_to_target, -1);
    }

    #[test]
    fn test_div_ceil() {
        assert_eq!(div_ceil(10, 5), 2);
        assert_eq!(div_ceil(11, 5), 3);
        assert_eq!(div_ceil(-11, 5), -2);
        assert_eq!(div_ceil(0, 5), 0);
    }
}
