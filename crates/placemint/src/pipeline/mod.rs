//! Job application pipeline: records, the lifecycle engine that guards them, the owner-scoped
//! service, and its HTTP binding.

pub mod domain;
pub mod lifecycle;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    JobApplication, JobCandidate, JobDraft, JobId, JobPatch, JobView, OwnerId, Stage,
};
pub use lifecycle::{
    board, compute_stats, days_remaining, deadline_status, matches_search, BoardColumn,
    DeadlineStatus, LifecycleEngine, PipelineStats, StageCount, Urgency, ValidationError,
};
pub use memory::InMemoryJobStore;
pub use repository::{JobStore, RepositoryError};
pub use router::{pipeline_router, OWNER_HEADER};
pub use service::{
    require_owner, Clock, Deletion, PipelineError, PipelineService, SystemClock,
};
