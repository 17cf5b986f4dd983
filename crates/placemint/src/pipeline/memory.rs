use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::domain::{JobApplication, JobDraft, JobId, OwnerId};
use super::repository::{JobStore, RepositoryError};

/// Process-local [`JobStore`] backed by a mutex-guarded map.
#[derive(Debug)]
pub struct InMemoryJobStore {
    records: Mutex<HashMap<JobId, JobApplication>>,
    sequence: AtomicU64,
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            sequence: AtomicU64::new(1),
        }
    }
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<JobId, JobApplication>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("job store lock poisoned".to_string()))
    }

    fn next_id(&self) -> JobId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        JobId(format!("job-{id:06}"))
    }
}

impl JobStore for InMemoryJobStore {
    fn find(&self, owner: &OwnerId) -> Result<Vec<JobApplication>, RepositoryError> {
        let guard = self.records()?;
        Ok(guard
            .values()
            .filter(|record| record.is_owned_by(owner))
            .cloned()
            .collect())
    }

    fn insert(&self, draft: JobDraft) -> Result<JobApplication, RepositoryError> {
        let record = draft.into_record(self.next_id());
        let mut guard = self.records()?;
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<JobApplication>, RepositoryError> {
        let guard = self.records()?;
        Ok(guard.get(id).cloned())
    }

    fn update<E, F>(&self, id: &JobId, apply: F) -> Result<JobApplication, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&JobApplication) -> Result<JobApplication, E>,
    {
        let mut guard = self.records()?;
        let slot = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let next = apply(slot)?;
        *slot = next.clone();
        Ok(next)
    }

    fn delete(&self, id: &JobId) -> Result<(), RepositoryError> {
        let mut guard = self.records()?;
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}
