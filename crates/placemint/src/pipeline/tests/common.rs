use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::pipeline::domain::{
    JobApplication, JobCandidate, JobDraft, JobId, OwnerId, Stage,
};
use crate::pipeline::memory::InMemoryJobStore;
use crate::pipeline::repository::{JobStore, RepositoryError};
use crate::pipeline::router::pipeline_router;
use crate::pipeline::service::{Clock, PipelineService};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
}

pub(super) fn owner(raw: &str) -> OwnerId {
    OwnerId::parse(raw).expect("valid owner id")
}

pub(super) fn acme_candidate() -> JobCandidate {
    JobCandidate::new("Acme", "SWE Intern")
}

pub(super) fn stored_record(id: &str, owner_id: &str, stage: Stage) -> JobApplication {
    JobApplication {
        id: JobId(id.to_string()),
        owner_id: owner(owner_id),
        company: "Acme".to_string(),
        role: "SWE Intern".to_string(),
        notes: "referral from career fair".to_string(),
        deadline: Some(now() + Duration::days(10)),
        stage,
        created_at: now() - Duration::days(2),
    }
}

/// Clock pinned to a known instant that tests can move forward.
pub(super) struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub(super) fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub(super) fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().expect("clock mutex poisoned");
        *guard += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

pub(super) fn build_service() -> (
    PipelineService<InMemoryJobStore>,
    Arc<InMemoryJobStore>,
    Arc<TestClock>,
) {
    let store = Arc::new(InMemoryJobStore::new());
    let clock = Arc::new(TestClock::at(now()));
    let service = PipelineService::with_clock(store.clone(), clock.clone());
    (service, store, clock)
}

pub(super) fn router_with_service(service: PipelineService<InMemoryJobStore>) -> axum::Router {
    pipeline_router(Arc::new(service))
}

pub(super) struct UnavailableStore;

impl JobStore for UnavailableStore {
    fn find(&self, _owner: &OwnerId) -> Result<Vec<JobApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _draft: JobDraft) -> Result<JobApplication, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &JobId) -> Result<Option<JobApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update<E, F>(&self, _id: &JobId, _apply: F) -> Result<JobApplication, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&JobApplication) -> Result<JobApplication, E>,
    {
        Err(RepositoryError::Unavailable("database offline".to_string()).into())
    }

    fn delete(&self, _id: &JobId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Store whose `find` ignores the owner filter, as a misconfigured backend might.
#[derive(Default)]
pub(super) struct UnfilteredStore {
    pub(super) records: Mutex<Vec<JobApplication>>,
}

impl JobStore for UnfilteredStore {
    fn find(&self, _owner: &OwnerId) -> Result<Vec<JobApplication>, RepositoryError> {
        Ok(self.records.lock().expect("store mutex poisoned").clone())
    }

    fn insert(&self, draft: JobDraft) -> Result<JobApplication, RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = draft.into_record(JobId(format!("job-{}", guard.len() + 1)));
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<JobApplication>, RepositoryError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn update<E, F>(&self, id: &JobId, apply: F) -> Result<JobApplication, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&JobApplication) -> Result<JobApplication, E>,
    {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or(RepositoryError::NotFound)?;
        let next = apply(slot)?;
        *slot = next.clone();
        Ok(next)
    }

    fn delete(&self, _id: &JobId) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// In-memory store where another writer edits the notes of a record just before each update.
pub(super) struct InterleavingStore {
    pub(super) inner: InMemoryJobStore,
    pub(super) competing_notes: String,
}

impl InterleavingStore {
    pub(super) fn new(competing_notes: &str) -> Self {
        Self {
            inner: InMemoryJobStore::new(),
            competing_notes: competing_notes.to_string(),
        }
    }
}

impl JobStore for InterleavingStore {
    fn find(&self, owner: &OwnerId) -> Result<Vec<JobApplication>, RepositoryError> {
        self.inner.find(owner)
    }

    fn insert(&self, draft: JobDraft) -> Result<JobApplication, RepositoryError> {
        self.inner.insert(draft)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<JobApplication>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn update<E, F>(&self, id: &JobId, apply: F) -> Result<JobApplication, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&JobApplication) -> Result<JobApplication, E>,
    {
        self.inner.update(id, |current| {
            let mut edited = current.clone();
            edited.notes = self.competing_notes.clone();
            Ok::<_, RepositoryError>(edited)
        })?;
        self.inner.update(id, apply)
    }

    fn delete(&self, id: &JobId) -> Result<(), RepositoryError> {
        self.inner.delete(id)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
