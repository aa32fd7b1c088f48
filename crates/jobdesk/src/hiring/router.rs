//! HTTP surface for the hiring engine.
//!
//! Identity arrives as an `x-actor-id` header; requests without one are
//! rejected before any handler logic runs. Resume bytes travel as base64 in
//! the JSON body so the whole submission fits a single request.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use super::actor::ActorId;
use super::applications::domain::{ApplicationId, ApplicationStatus, ContactDetails, ResumeUpload};
use super::applications::service::ApplicationService;
use super::applications::submission::{ContactPhase, NextStep};
use super::artifacts::{ArtifactAccessService, BlobStore};
use super::audit::AuditSink;
use super::error::HiringError;
use super::jobs::domain::{JobDraft, JobId, JobStatus};
use super::jobs::service::JobService;
use super::store::{ApplicationStore, JobStore, SavedJobStore};

const ACTOR_HEADER: &str = "x-actor-id";

/// Shared handler state bundling the three services over one store set.
pub struct HiringState<J, A, S, B, O> {
    pub jobs: Arc<JobService<J, A, S, O>>,
    pub applications: Arc<ApplicationService<J, A, B, O>>,
    pub artifacts: Arc<ArtifactAccessService<J, A, B>>,
}

impl<J, A, S, B, O> Clone for HiringState<J, A, S, B, O> {
    fn clone(&self) -> Self {
        Self {
            jobs: Arc::clone(&self.jobs),
            applications: Arc::clone(&self.applications),
            artifacts: Arc::clone(&self.artifacts),
        }
    }
}

/// Router builder exposing the full job and application surface.
pub fn hiring_router<J, A, S, B, O>(state: HiringState<J, A, S, B, O>) -> Router
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs",
            get(board_handler::<J, A, S, B, O>).post(post_job_handler::<J, A, S, B, O>),
        )
        .route(
            "/api/v1/jobs/:job_id",
            get(job_detail_handler::<J, A, S, B, O>).patch(edit_job_handler::<J, A, S, B, O>),
        )
        .route(
            "/api/v1/jobs/:job_id/status",
            post(job_status_handler::<J, A, S, B, O>),
        )
        .route(
            "/api/v1/jobs/:job_id/applications",
            get(applicant_list_handler::<J, A, S, B, O>).post(apply_handler::<J, A, S, B, O>),
        )
        .route(
            "/api/v1/jobs/:job_id/save",
            post(save_job_handler::<J, A, S, B, O>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(application_status_handler::<J, A, S, B, O>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            post(application_decision_handler::<J, A, S, B, O>),
        )
        .route(
            "/api/v1/applications/:application_id/resume-link",
            get(resume_link_handler::<J, A, S, B, O>),
        )
        .route("/api/v1/saved-jobs", get(saved_jobs_handler::<J, A, S, B, O>))
        .route(
            "/api/v1/my-jobs",
            get(my_jobs_handler::<J, A, S, B, O>),
        )
        .route(
            "/api/v1/my-applications",
            get(my_applications_handler::<J, A, S, B, O>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct StatusChangeRequest<T> {
    status: T,
}

/// Base64-encoded resume file carried inline in the submission body.
#[derive(Debug, Deserialize)]
struct ResumePayload {
    file_name: String,
    content_type: String,
    content_base64: String,
}

#[derive(Debug, Deserialize)]
struct ApplyRequest {
    email: String,
    phone: String,
    resume: ResumePayload,
    #[serde(default)]
    answers: Vec<String>,
}

fn actor_from(headers: &HeaderMap) -> Result<ActorId, Response> {
    let value = headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());
    match value {
        Some(actor) => Ok(ActorId(actor.to_owned())),
        None => {
            let payload = json!({
                "error": "missing or unreadable x-actor-id header",
            });
            Err((StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response())
        }
    }
}

fn error_response(error: HiringError) -> Response {
    match error {
        HiringError::Validation(fields) => {
            let payload = json!({
                "error": "validation failed",
                "fields": fields,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        HiringError::Denied(_) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        HiringError::DuplicateApplication | HiringError::InvalidTransition { .. } => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        HiringError::NotFound(_) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        HiringError::Dependency(_) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

async fn post_job_handler<J, A, S, B, O>(
    State(state): State<HiringState<J, A, S, B, O>>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<JobDraft>,
) -> Response
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    let actor = match actor_from(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.jobs.create(&actor, draft) {
        Ok(job) => (StatusCode::CREATED, axum::Json(job)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn board_handler<J, A, S, B, O>(State(state): State<HiringState<J, A, S, B, O>>) -> Response
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    match state.jobs.board() {
        Ok(jobs) => (StatusCode::OK, axum::Json(jobs)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn job_detail_handler<J, A, S, B, O>(
    State(state): State<HiringState<J, A, S, B, O>>,
    Path(job_id): Path<String>,
) -> Response
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    match state.jobs.detail(&JobId(job_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn edit_job_handler<J, A, S, B, O>(
    State(state): State<HiringState<J, A, S, B, O>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    axum::Json(draft): axum::Json<JobDraft>,
) -> Response
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    let actor = match actor_from(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.jobs.edit(&actor, &JobId(job_id), draft) {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn job_status_handler<J, A, S, B, O>(
    State(state): State<HiringState<J, A, S, B, O>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    axum::Json(request): axum::Json<StatusChangeRequest<JobStatus>>,
) -> Response
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    let actor = match actor_from(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.jobs.change_status(&actor, &JobId(job_id), request.status) {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn applicant_list_handler<J, A, S, B, O>(
    State(state): State<HiringState<J, A, S, B, O>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Response
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    let actor = match actor_from(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.applications.list_for_job(&actor, &JobId(job_id)) {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Runs the whole submission protocol for one request: contact phase,
/// answers phase when the posting has screening questions, then finalize.
async fn apply_handler<J, A, S, B, O>(
    State(state): State<HiringState<J, A, S, B, O>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    axum::Json(request): axum::Json<ApplyRequest>,
) -> Response
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    let actor = match actor_from(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let bytes = match base64::engine::general_purpose::STANDARD.decode(&request.resume.content_base64)
    {
        Ok(bytes) => bytes,
        Err(_) => {
            return error_response(HiringError::validation(
                "resume",
                "resume content must be valid base64",
            ))
        }
    };

    let mut flow = match state.applications.begin_submission(&actor, &JobId(job_id)) {
        Ok(flow) => flow,
        Err(error) => return error_response(error),
    };

    let phase = ContactPhase {
        contact: ContactDetails {
            email: request.email,
            phone: request.phone,
        },
        resumes: vec![ResumeUpload {
            file_name: request.resume.file_name,
            content_type: request.resume.content_type,
            bytes,
        }],
    };
    let next = match flow.submit_contact(phase) {
        Ok(next) => next,
        Err(error) => return error_response(error),
    };
    if let NextStep::Answers(_) = next {
        if let Err(error) = flow.submit_answers(request.answers) {
            return error_response(error);
        }
    }

    match state.applications.finalize(flow) {
        Ok(application) => {
            (StatusCode::CREATED, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn save_job_handler<J, A, S, B, O>(
    State(state): State<HiringState<J, A, S, B, O>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Response
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    let actor = match actor_from(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.jobs.save_job(&actor, &JobId(job_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

async fn application_status_handler<J, A, S, B, O>(
    State(state): State<HiringState<J, A, S, B, O>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
) -> Response
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    let actor = match actor_from(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state
        .applications
        .status_view(&actor, &ApplicationId(application_id))
    {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn application_decision_handler<J, A, S, B, O>(
    State(state): State<HiringState<J, A, S, B, O>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<StatusChangeRequest<ApplicationStatus>>,
) -> Response
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    let actor = match actor_from(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.applications.change_status(
        &actor,
        &ApplicationId(application_id),
        request.status,
    ) {
        Ok(application) => {
            (StatusCode::OK, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn resume_link_handler<J, A, S, B, O>(
    State(state): State<HiringState<J, A, S, B, O>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
) -> Response
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    let actor = match actor_from(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state
        .artifacts
        .resume_link(&actor, &ApplicationId(application_id))
    {
        Ok(link) => (StatusCode::OK, axum::Json(link)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn saved_jobs_handler<J, A, S, B, O>(
    State(state): State<HiringState<J, A, S, B, O>>,
    headers: HeaderMap,
) -> Response
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    let actor = match actor_from(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.jobs.saved_jobs(&actor) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn my_jobs_handler<J, A, S, B, O>(
    State(state): State<HiringState<J, A, S, B, O>>,
    headers: HeaderMap,
) -> Response
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    let actor = match actor_from(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.jobs.posted_by(&actor) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn my_applications_handler<J, A, S, B, O>(
    State(state): State<HiringState<J, A, S, B, O>>,
    headers: HeaderMap,
) -> Response
where
    J: JobStore + 'static,
    A: ApplicationStore + 'static,
    S: SavedJobStore + 'static,
    B: BlobStore + 'static,
    O: AuditSink + 'static,
{
    let actor = match actor_from(&headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.applications.applied(&actor) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}
