mod deadline;
mod stats;
mod validation;

pub use deadline::{days_remaining, deadline_status, DeadlineStatus, Urgency};
pub use stats::{board, compute_stats, matches_search, BoardColumn, PipelineStats, StageCount};
pub use validation::{parse_deadline, ValidationError};

use chrono::{DateTime, Utc};

use super::domain::{JobApplication, JobCandidate, JobDraft, JobPatch};

/// Stateless rules engine for application records.
///
/// The engine never touches storage and never reads the clock: callers hand it the record(s)
/// and the current instant, and it hands back validated values.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleEngine;

impl LifecycleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Normalize creation input into a draft stamped with `now`.
    pub fn validate_for_create(
        &self,
        candidate: JobCandidate,
        now: DateTime<Utc>,
    ) -> Result<JobDraft, ValidationError> {
        validation::validate_candidate(candidate, now)
    }

    /// Merge `patch` onto `existing`, refusing edits to identity fields.
    pub fn validate_for_update(
        &self,
        existing: &JobApplication,
        patch: JobPatch,
    ) -> Result<JobApplication, ValidationError> {
        validation::merge_patch(existing, patch)
    }
}
