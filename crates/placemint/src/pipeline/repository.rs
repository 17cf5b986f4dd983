use super::domain::{JobApplication, JobDraft, JobId, OwnerId};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Implementations must make each single-record write atomic. `update` runs `apply` against the
/// current record and stores its result without letting another writer in between.
pub trait JobStore: Send + Sync {
    /// Every record owned by `owner`, in no particular order.
    fn find(&self, owner: &OwnerId) -> Result<Vec<JobApplication>, RepositoryError>;
    /// Persist a draft, assigning its id.
    fn insert(&self, draft: JobDraft) -> Result<JobApplication, RepositoryError>;
    fn fetch(&self, id: &JobId) -> Result<Option<JobApplication>, RepositoryError>;
    /// Read-modify-write of one record. A missing record yields `RepositoryError::NotFound`
    /// through `E`; an `Err` from `apply` leaves the record untouched.
    fn update<E, F>(&self, id: &JobId, apply: F) -> Result<JobApplication, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&JobApplication) -> Result<JobApplication, E>;
    fn delete(&self, id: &JobId) -> Result<(), RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    /// Connectivity failures are the only class a caller may retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, RepositoryError::Unavailable(_))
    }
}
