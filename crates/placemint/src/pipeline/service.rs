use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{JobApplication, JobCandidate, JobId, JobPatch, OwnerId, Stage};
use super::lifecycle::{
    board, compute_stats, matches_search, BoardColumn, LifecycleEngine, PipelineStats,
    ValidationError,
};
use super::repository::{JobStore, RepositoryError};

/// Source of the current instant, injectable so tests can pin time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Error raised by the pipeline service.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("owner id missing")]
    MissingOwner,
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("job {id} not found")]
    NotFound { id: JobId },
    #[error("job {id} belongs to another owner")]
    Forbidden { id: JobId },
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

impl PipelineError {
    pub fn is_transient(&self) -> bool {
        matches!(self, PipelineError::Store(err) if err.is_transient())
    }
}

/// Resolve the caller identity handed over by the transport layer.
pub fn require_owner(raw: Option<&str>) -> Result<OwnerId, PipelineError> {
    raw.and_then(OwnerId::parse)
        .ok_or(PipelineError::MissingOwner)
}

/// Confirmation returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deletion {
    pub message: &'static str,
    pub id: JobId,
}

/// Owner-scoped operations over the lifecycle engine and a record store.
pub struct PipelineService<S> {
    engine: LifecycleEngine,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> PipelineService<S>
where
    S: JobStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            engine: LifecycleEngine::new(),
            store,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The owner's applications, newest first, optionally narrowed by a search term.
    pub fn list_jobs(
        &self,
        owner: &OwnerId,
        search: Option<&str>,
    ) -> Result<Vec<JobApplication>, PipelineError> {
        let mut records: Vec<JobApplication> = self
            .store
            .find(owner)?
            .into_iter()
            .filter(|record| record.is_owned_by(owner))
            .filter(|record| search.map_or(true, |term| matches_search(record, term)))
            .collect();

        records.sort_by_key(|record| Reverse((record.created_at, record.id.clone())));
        debug!(%owner, count = records.len(), "listed jobs");
        Ok(records)
    }

    pub fn create_job(
        &self,
        owner: &OwnerId,
        mut fields: JobCandidate,
    ) -> Result<JobApplication, PipelineError> {
        fields.owner_id = Some(owner.as_str().to_string());
        let draft = self.engine.validate_for_create(fields, self.now())?;
        let record = self.store.insert(draft)?;

        info!(job_id = %record.id, %owner, stage = %record.stage, "job created");
        Ok(record)
    }

    /// Apply a stage transition or field edit to a record the caller owns.
    ///
    /// The ownership check and merge run inside the store's read-modify-write, so a patch
    /// always lands on the latest version of the record.
    pub fn update_job_stage(
        &self,
        owner: &OwnerId,
        job_id: &JobId,
        patch: JobPatch,
    ) -> Result<JobApplication, PipelineError> {
        let mut previous = None;
        let stored = self
            .store
            .update(job_id, |current| -> Result<JobApplication, PipelineError> {
                ensure_owned(owner, current)?;
                previous = Some(current.stage);
                Ok(self.engine.validate_for_update(current, patch)?)
            })
            .map_err(|err| missing_as_not_found(err, job_id))?;

        info!(
            job_id = %stored.id,
            %owner,
            from = previous.map_or("unknown", Stage::as_str),
            to = %stored.stage,
            "job updated"
        );
        Ok(stored)
    }

    pub fn delete_job(&self, owner: &OwnerId, job_id: &JobId) -> Result<Deletion, PipelineError> {
        self.load_owned(owner, job_id)?;
        self.store
            .delete(job_id)
            .map_err(|err| missing_as_not_found(err.into(), job_id))?;

        info!(%job_id, %owner, "job deleted");
        Ok(Deletion {
            message: "Deleted",
            id: job_id.clone(),
        })
    }

    pub fn job_stats(&self, owner: &OwnerId) -> Result<PipelineStats, PipelineError> {
        let records = self.list_jobs(owner, None)?;
        Ok(compute_stats(&records))
    }

    pub fn job_board(
        &self,
        owner: &OwnerId,
        search: Option<&str>,
    ) -> Result<Vec<BoardColumn>, PipelineError> {
        let records = self.list_jobs(owner, search)?;
        Ok(board(&records, self.now()))
    }

    fn load_owned(&self, owner: &OwnerId, job_id: &JobId) -> Result<JobApplication, PipelineError> {
        let record = self
            .store
            .fetch(job_id)?
            .ok_or_else(|| PipelineError::NotFound { id: job_id.clone() })?;

        ensure_owned(owner, &record)?;
        Ok(record)
    }
}

fn ensure_owned(owner: &OwnerId, record: &JobApplication) -> Result<(), PipelineError> {
    if record.is_owned_by(owner) {
        return Ok(());
    }
    warn!(job_id = %record.id, %owner, "rejected access to job owned by another user");
    Err(PipelineError::Forbidden {
        id: record.id.clone(),
    })
}

fn missing_as_not_found(err: PipelineError, job_id: &JobId) -> PipelineError {
    match err {
        PipelineError::Store(RepositoryError::NotFound) => PipelineError::NotFound {
            id: job_id.clone(),
        },
        other => other,
    }
}
