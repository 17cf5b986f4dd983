use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{JobCandidate, JobId, JobPatch, JobView};
use super::repository::{JobStore, RepositoryError};
use super::service::{require_owner, PipelineError, PipelineService};

/// Header carrying the identity verified upstream.
pub const OWNER_HEADER: &str = "x-owner-id";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OwnerQuery {
    #[serde(default, alias = "userId")]
    pub(crate) owner_id: Option<String>,
    #[serde(default)]
    pub(crate) search: Option<String>,
}

/// Router builder exposing the job pipeline endpoints.
pub fn pipeline_router<S>(service: Arc<PipelineService<S>>) -> Router
where
    S: JobStore + 'static,
{
    Router::new()
        .route("/jobs", get(list_handler::<S>).post(create_handler::<S>))
        .route("/jobs/stats", get(stats_handler::<S>))
        .route("/jobs/board", get(board_handler::<S>))
        .route(
            "/jobs/:job_id",
            axum::routing::patch(update_handler::<S>).delete(delete_handler::<S>),
        )
        .with_state(service)
}

impl PipelineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::Validation(_)
            | PipelineError::MissingOwner
            | PipelineError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            PipelineError::Forbidden { .. } => StatusCode::FORBIDDEN,
            PipelineError::NotFound { .. } | PipelineError::Store(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            PipelineError::Store(RepositoryError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.to_string() });
        (self.status_code(), Json(payload)).into_response()
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, PipelineError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| PipelineError::MalformedBody(rejection.body_text()))
}

fn owner_from(headers: &HeaderMap, query: &OwnerQuery) -> Option<String> {
    headers
        .get(OWNER_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .or_else(|| query.owner_id.clone())
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<PipelineService<S>>>,
    headers: HeaderMap,
    Query(query): Query<OwnerQuery>,
) -> Response
where
    S: JobStore + 'static,
{
    let result = require_owner(owner_from(&headers, &query).as_deref())
        .and_then(|owner| service.list_jobs(&owner, query.search.as_deref()));

    match result {
        Ok(records) => {
            let now = service.now();
            let views: Vec<JobView> = records.iter().map(|record| record.view(now)).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<PipelineService<S>>>,
    headers: HeaderMap,
    Query(query): Query<OwnerQuery>,
    payload: Result<Json<JobCandidate>, JsonRejection>,
) -> Response
where
    S: JobStore + 'static,
{
    let candidate = match json_body(payload) {
        Ok(candidate) => candidate,
        Err(error) => return error.into_response(),
    };
    let owner = owner_from(&headers, &query).or_else(|| candidate.owner_id.clone());
    let result = require_owner(owner.as_deref())
        .and_then(|owner| service.create_job(&owner, candidate));

    match result {
        Ok(record) => (StatusCode::CREATED, Json(record.view(service.now()))).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn update_handler<S>(
    State(service): State<Arc<PipelineService<S>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<OwnerQuery>,
    payload: Result<Json<JobPatch>, JsonRejection>,
) -> Response
where
    S: JobStore + 'static,
{
    let job_id = JobId(job_id);
    let result = require_owner(owner_from(&headers, &query).as_deref()).and_then(|owner| {
        let patch = json_body(payload)?;
        service.update_job_stage(&owner, &job_id, patch)
    });

    match result {
        Ok(record) => (StatusCode::OK, Json(record.view(service.now()))).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn delete_handler<S>(
    State(service): State<Arc<PipelineService<S>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<OwnerQuery>,
) -> Response
where
    S: JobStore + 'static,
{
    let job_id = JobId(job_id);
    let result = require_owner(owner_from(&headers, &query).as_deref())
        .and_then(|owner| service.delete_job(&owner, &job_id));

    match result {
        Ok(deletion) => (StatusCode::OK, Json(deletion)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn stats_handler<S>(
    State(service): State<Arc<PipelineService<S>>>,
    headers: HeaderMap,
    Query(query): Query<OwnerQuery>,
) -> Response
where
    S: JobStore + 'static,
{
    let result = require_owner(owner_from(&headers, &query).as_deref())
        .and_then(|owner| service.job_stats(&owner));

    match result {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn board_handler<S>(
    State(service): State<Arc<PipelineService<S>>>,
    headers: HeaderMap,
    Query(query): Query<OwnerQuery>,
) -> Response
where
    S: JobStore + 'static,
{
    let result = require_owner(owner_from(&headers, &query).as_deref())
        .and_then(|owner| service.job_board(&owner, query.search.as_deref()));

    match result {
        Ok(columns) => (StatusCode::OK, Json(columns)).into_response(),
        Err(error) => error.into_response(),
    }
}
