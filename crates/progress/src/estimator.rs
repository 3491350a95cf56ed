//! Completion date projection.

use chrono::Duration;
use sowtrack_core::Time;

/// Nominal contract length (upper bound of the 16-24 week range).
pub const DEFAULT_TOTAL_WEEKS: i64 = 24;

/// Result of projecting the schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleProjection {
    /// Start plus the nominal duration
    pub expected_end: Time,

    /// Actual elapsed time minus the time the current progress implies.
    /// Positive means behind schedule.
    pub schedule_delta: Duration,

    /// Expected end shifted by the delta
    pub projected_end: Time,

    /// Qualitative stage label
    pub stage: &'static str,
}

/// Projects a completion date by comparing elapsed time with progress.
#[derive(Debug, Clone)]
pub struct CompletionEstimator {
    total_duration: Duration,
}

impl CompletionEstimator {
    /// Estimator for a contract of `weeks` weeks.
    pub fn with_weeks(weeks: i64) -> Self {
        Self {
            total_duration: Duration::weeks(weeks),
        }
    }

    /// Nominal total duration.
    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Project the completion date.
    ///
    /// Extrapolates linearly: if more time has passed than `progress`
    /// accounts for, the end date slips by exactly that surplus; if less,
    /// it pulls in.
    pub fn project(&self, start: Time, progress: u8, now: Time) -> ScheduleProjection {
        let progress = i64::from(progress.min(100));
        let expected_end = start + self.total_duration;

        let elapsed = now - start;
        let expected_elapsed =
            Duration::milliseconds(self.total_duration.num_milliseconds() * progress / 100);
        let schedule_delta = elapsed - expected_elapsed;

        ScheduleProjection {
            expected_end,
            schedule_delta,
            projected_end: expected_end + schedule_delta,
            stage: stage_label(progress as u8),
        }
    }

    /// Target date `weeks` weeks after start.
    pub fn milestone_target(start: Time, weeks: i64) -> Time {
        start + Duration::weeks(weeks)
    }
}

impl Default for CompletionEstimator {
    fn default() -> Self {
        Self::with_weeks(DEFAULT_TOTAL_WEEKS)
    }
}

/// Qualitative stage for an overall progress value.
pub fn stage_label(progress: u8) -> &'static str {
    if progress > 75 {
        "Testing & Refinement"
    } else if progress > 25 {
        "Development"
    } else {
        "Planning"
    }
}
