//! Dashboard session: one fetch-and-assemble cycle at a time, plus an
//! independent narrative summary.

use sowtrack_core::{PhaseCatalog, ProjectView, Time};
use sowtrack_github::{ProjectSource, TrackerError};
use sowtrack_progress::{ProjectProfile, ViewAssembler};
use std::sync::Arc;
use tracing::{info, warn};

use crate::prompt::SOW_DOCUMENT;
use crate::summary::{NarrativeGenerator, SummaryError};

/// Which kind of tracker failure the last load hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Unreachable, non-success status, or unreadable snapshot
    Connection,
    /// The API reported errors or returned something unusable
    Query,
    /// Owner or board does not exist
    ProjectNotFound,
}

impl From<&TrackerError> for FailureKind {
    fn from(err: &TrackerError) -> Self {
        match err {
            TrackerError::ProjectNotFound { .. } => FailureKind::ProjectNotFound,
            e if e.is_connection_error() => FailureKind::Connection,
            _ => FailureKind::Query,
        }
    }
}

/// Outcome of the most recent load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// Nothing attempted yet
    Idle,
    /// No credential: nothing is fetched and there is nothing to show
    Demo,
    /// The current view came from this fetch
    Loaded {
        /// Clock value the view was assembled at
        fetched_at: Time,
        /// Normalized items
        items: usize,
    },
    /// The last fetch failed. Any earlier view is kept.
    Failed {
        /// Error text
        message: String,
        /// Error category
        kind: FailureKind,
    },
}

/// Outcome of the most recent summary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryState {
    /// Never requested
    Idle,
    /// Markdown narrative
    Ready(String),
    /// The request failed; retry with [`Dashboard::generate_summary`]
    Failed(String),
}

impl SummaryState {
    /// Whether a retry makes sense.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SummaryState::Failed(_))
    }
}

/// Holds the current view and the state of both external calls.
pub struct Dashboard {
    source: Option<Arc<dyn ProjectSource>>,
    narrator: Option<Arc<dyn NarrativeGenerator>>,
    catalog: PhaseCatalog,
    profile: ProjectProfile,
    sow: &'static str,
    view: Option<ProjectView>,
    load: LoadState,
    summary: SummaryState,
}

impl Dashboard {
    /// A session with no tracker and no narrator (demo mode until configured).
    pub fn new(catalog: PhaseCatalog, profile: ProjectProfile) -> Self {
        Self {
            source: None,
            narrator: None,
            catalog,
            profile,
            sow: SOW_DOCUMENT,
            view: None,
            load: LoadState::Idle,
            summary: SummaryState::Idle,
        }
    }

    /// Attach the tracking source.
    pub fn with_source(mut self, source: Arc<dyn ProjectSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach the narrative generator.
    pub fn with_narrator(mut self, narrator: Arc<dyn NarrativeGenerator>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    /// Fetch and rebuild the view.
    ///
    /// On failure the previous view stays in place and the state records
    /// the error; nothing is retried automatically.
    pub async fn refresh(&mut self, now: Time) -> &LoadState {
        let Some(source) = self.source.clone() else {
            info!("No tracking credential configured; running in demo mode");
            self.load = LoadState::Demo;
            return &self.load;
        };

        match source.fetch_project().await {
            Ok(snapshot) => {
                let view = ViewAssembler::new(&self.catalog, &self.profile).assemble(&snapshot, now);
                self.load = LoadState::Loaded {
                    fetched_at: now,
                    items: snapshot.items.len(),
                };
                self.view = Some(view);
            }
            Err(e) => {
                warn!("Project fetch failed: {}", e);
                self.load = LoadState::Failed {
                    message: e.to_string(),
                    kind: FailureKind::from(&e),
                };
            }
        }
        &self.load
    }

    /// Request a narrative for the current view, replacing any previous one.
    pub async fn generate_summary(&mut self) -> &SummaryState {
        self.summary = match self.request_summary().await {
            Ok(text) => SummaryState::Ready(text),
            Err(e) => {
                warn!("{}", e);
                SummaryState::Failed(e.to_string())
            }
        };
        &self.summary
    }

    async fn request_summary(&self) -> Result<String, SummaryError> {
        let narrator = self.narrator.as_ref().ok_or(SummaryError::NotConfigured)?;
        let view = self.view.as_ref().ok_or(SummaryError::NoProjectData)?;
        narrator.generate(view, self.sow).await
    }

    /// Current view, if any load has succeeded.
    pub fn view(&self) -> Option<&ProjectView> {
        self.view.as_ref()
    }

    /// Outcome of the last load.
    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    /// Outcome of the last summary request.
    pub fn summary_state(&self) -> &SummaryState {
        &self.summary
    }

    /// Phase catalog in use.
    pub fn catalog(&self) -> &PhaseCatalog {
        &self.catalog
    }

    /// Project profile in use.
    pub fn profile(&self) -> &ProjectProfile {
        &self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use sowtrack_core::ProjectSnapshot;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockSource {
        calls: AtomicUsize,
        fail_after: usize,
    }

    #[async_trait]
    impl ProjectSource for MockSource {
        async fn fetch_project(&self) -> sowtrack_github::Result<ProjectSnapshot> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call >= self.fail_after {
                return Err(TrackerError::Status {
                    status: 502,
                    body: "bad gateway".to_string(),
                });
            }
            Ok(ProjectSnapshot {
                title: Some("EQ".to_string()),
                description: None,
                created_at: Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap(),
                url: None,
                items: Vec::new(),
            })
        }
    }

    struct MockNarrator {
        fail: bool,
    }

    #[async_trait]
    impl NarrativeGenerator for MockNarrator {
        async fn generate(&self, view: &ProjectView, sow: &str) -> Result<String, SummaryError> {
            assert!(sow.contains("Total Contract Value"));
            if self.fail {
                return Err(SummaryError::EmptyResponse);
            }
            Ok(format!("## Summary for {}", view.project.title))
        }
    }

    fn now() -> Time {
        Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(PhaseCatalog::sow(), ProjectProfile::default())
    }

    #[tokio::test]
    async fn test_no_source_is_demo_mode() {
        let mut dash = dashboard();
        assert_eq!(dash.refresh(now()).await, &LoadState::Demo);
        assert!(dash.view().is_none());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_good_view() {
        let source = Arc::new(MockSource {
            calls: AtomicUsize::new(0),
            fail_after: 1,
        });
        let mut dash = dashboard().with_source(source);

        assert!(matches!(dash.refresh(now()).await, LoadState::Loaded { items: 0, .. }));
        assert!(dash.view().is_some());

        let state = dash.refresh(now()).await.clone();
        match state {
            LoadState::Failed { kind, message } => {
                assert_eq!(kind, FailureKind::Connection);
                assert!(message.contains("502"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(dash.view().unwrap().project.title, "EQ");
    }

    #[tokio::test]
    async fn test_summary_without_view_is_retryable_failure() {
        let mut dash = dashboard().with_narrator(Arc::new(MockNarrator { fail: false }));
        let state = dash.generate_summary().await;
        assert!(state.is_retryable());
        assert_eq!(
            state,
            &SummaryState::Failed("Failed to generate AI summary: no project data loaded".to_string())
        );
    }

    #[tokio::test]
    async fn test_summary_without_narrator() {
        let source = Arc::new(MockSource {
            calls: AtomicUsize::new(0),
            fail_after: usize::MAX,
        });
        let mut dash = dashboard().with_source(source);
        dash.refresh(now()).await;

        let state = dash.generate_summary().await;
        assert!(matches!(state, SummaryState::Failed(msg) if msg.contains("not configured")));
    }

    #[tokio::test]
    async fn test_summary_failure_is_independent_of_load_state() {
        let source = Arc::new(MockSource {
            calls: AtomicUsize::new(0),
            fail_after: usize::MAX,
        });
        let mut dash = dashboard()
            .with_source(source)
            .with_narrator(Arc::new(MockNarrator { fail: true }));
        dash.refresh(now()).await;

        assert!(dash.generate_summary().await.is_retryable());
        assert!(matches!(dash.load_state(), LoadState::Loaded { .. }));
    }

    #[tokio::test]
    async fn test_summary_success() {
        let source = Arc::new(MockSource {
            calls: AtomicUsize::new(0),
            fail_after: usize::MAX,
        });
        let mut dash = dashboard()
            .with_source(source)
            .with_narrator(Arc::new(MockNarrator { fail: false }));
        dash.refresh(now()).await;

        assert_eq!(
            dash.generate_summary().await,
            &SummaryState::Ready("## Summary for EQ".to_string())
        );
        assert!(!dash.summary_state().is_retryable());
    }

    #[test]
    fn test_failure_kind_mapping() {
        let not_found = TrackerError::ProjectNotFound {
            owner: "acme".to_string(),
            number: 3,
        };
        assert_eq!(FailureKind::from(&not_found), FailureKind::ProjectNotFound);
        assert_eq!(
            FailureKind::from(&TrackerError::Query("Bad credentials".to_string())),
            FailureKind::Query
        );
    }
}
