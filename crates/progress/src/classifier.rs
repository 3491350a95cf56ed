//! Label-based phase classification.
//!
//! A work item is attributed to at most one phase. The first label that
//! looks like a phase label decides; later labels are never consulted,
//! even when the first one turns out to carry no phase number.

use once_cell::sync::Lazy;
use regex::Regex;
use sowtrack_core::{PhaseId, WorkItem};

static PHASE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)phase\s*[12][abc]?").expect("valid phase prefix pattern"));

static BARE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[12][abc]$").expect("valid bare token pattern"));

static PHASE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([12])([abc])?").expect("valid phase number pattern"));

/// Whether a label names a phase at all.
pub fn is_phase_label(label: &str) -> bool {
    label.to_lowercase().contains("phase")
        || PHASE_PREFIX.is_match(label)
        || BARE_TOKEN.is_match(label)
}

/// Map a label set to a phase id.
///
/// Returns `None` (unclassified) when no label looks like a phase label,
/// or when the first such label has no `1`/`2` in it. A label with a
/// major number but no letter (`Phase 1`) lands in that major version's
/// completion bucket, never in a sub-phase.
pub fn classify<I, S>(labels: I) -> Option<PhaseId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let label = labels.into_iter().find(|l| is_phase_label(l.as_ref()))?;
    let caps = PHASE_NUMBER.captures(label.as_ref())?;

    let major = caps.get(1)?.as_str().chars().next()?;
    match caps.get(2).and_then(|m| m.as_str().chars().next()) {
        Some(minor) => Some(PhaseId::sub_phase(major, minor)),
        None => Some(PhaseId::completion(major)),
    }
}

/// Classify a work item by its labels.
pub fn classify_item(item: &WorkItem) -> Option<PhaseId> {
    classify(&item.labels)
}
