use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use serde_json::Value;

use crate::hiring::actor::ActorId;
use crate::hiring::applications::domain::{Application, ApplicationId, ContactDetails, ResumeUpload};
use crate::hiring::applications::service::ApplicationService;
use crate::hiring::applications::submission::ContactPhase;
use crate::hiring::artifacts::{ArtifactAccessService, ArtifactRef, BlobError, BlobStore, SignedUrl};
use crate::hiring::audit::{AuditSink, StatusChangeEvent};
use crate::hiring::jobs::domain::{Job, JobDraft, JobId, JobStatus, JobType, SavedJob, WorkplaceMode};
use crate::hiring::jobs::service::JobService;
use crate::hiring::store::{ApplicationStore, JobStore, SavedJobStore, StoreError};

pub(super) fn poster() -> ActorId {
    ActorId::from("actor-poster")
}

pub(super) fn seeker() -> ActorId {
    ActorId::from("actor-seeker")
}

pub(super) fn other_seeker() -> ActorId {
    ActorId::from("actor-other")
}

pub(super) fn draft() -> JobDraft {
    JobDraft {
        title: "Backend Engineer".to_string(),
        company: "Northwind Logistics".to_string(),
        location: "Des Moines, IA".to_string(),
        job_type: JobType::FullTime,
        workplace: WorkplaceMode::Hybrid,
        description: "Build and run the order ingestion services.".to_string(),
        openings: 2,
        screening_questions: Vec::new(),
    }
}

pub(super) fn draft_with_questions() -> JobDraft {
    JobDraft {
        screening_questions: vec![
            "Years of Rust experience?".to_string(),
            "Are you authorized to work in the US?".to_string(),
        ],
        ..draft()
    }
}

pub(super) fn pdf_resume() -> ResumeUpload {
    ResumeUpload {
        file_name: "resume.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.7 minimal".to_vec(),
    }
}

pub(super) fn contact_phase() -> ContactPhase {
    ContactPhase {
        contact: ContactDetails {
            email: "applicant@example.com".to_string(),
            phone: "5155550123".to_string(),
        },
        resumes: vec![pdf_resume()],
    }
}

#[derive(Default)]
pub(super) struct MemoryJobStore {
    jobs: Mutex<HashMap<JobId, Job>>,
}

impl JobStore for MemoryJobStore {
    fn insert(&self, job: Job) -> Result<Job, StoreError> {
        let mut guard = self.jobs.lock().expect("job store mutex poisoned");
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let guard = self.jobs.lock().expect("job store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, job: Job) -> Result<(), StoreError> {
        let mut guard = self.jobs.lock().expect("job store mutex poisoned");
        if !guard.contains_key(&job.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(job.id.clone(), job);
        Ok(())
    }

    fn list_by_owner(&self, owner: &ActorId) -> Result<Vec<Job>, StoreError> {
        let guard = self.jobs.lock().expect("job store mutex poisoned");
        let mut jobs: Vec<Job> = guard
            .values()
            .filter(|job| job.owner_id == *owner)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(jobs)
    }

    fn list_open(&self) -> Result<Vec<Job>, StoreError> {
        let guard = self.jobs.lock().expect("job store mutex poisoned");
        let mut jobs: Vec<Job> = guard
            .values()
            .filter(|job| job.status == JobStatus::Open)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(jobs)
    }
}

#[derive(Default)]
pub(super) struct MemoryApplicationStore {
    applications: Mutex<HashMap<ApplicationId, Application>>,
}

impl ApplicationStore for MemoryApplicationStore {
    fn insert(&self, application: Application) -> Result<Application, StoreError> {
        let mut guard = self
            .applications
            .lock()
            .expect("application store mutex poisoned");
        let duplicate = guard.values().any(|existing| {
            existing.job_id == application.job_id
                && existing.applicant_id == application.applicant_id
        });
        if duplicate {
            return Err(StoreError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        let guard = self
            .applications
            .lock()
            .expect("application store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_for_applicant(
        &self,
        job: &JobId,
        applicant: &ActorId,
    ) -> Result<Option<Application>, StoreError> {
        let guard = self
            .applications
            .lock()
            .expect("application store mutex poisoned");
        Ok(guard
            .values()
            .find(|application| {
                application.job_id == *job && application.applicant_id == *applicant
            })
            .cloned())
    }

    fn list_by_job(&self, job: &JobId) -> Result<Vec<Application>, StoreError> {
        let guard = self
            .applications
            .lock()
            .expect("application store mutex poisoned");
        let mut applications: Vec<Application> = guard
            .values()
            .filter(|application| application.job_id == *job)
            .cloned()
            .collect();
        applications.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(applications)
    }

    fn count_by_job(&self, job: &JobId) -> Result<u64, StoreError> {
        Ok(self.list_by_job(job)?.len() as u64)
    }

    fn list_by_applicant(&self, applicant: &ActorId) -> Result<Vec<Application>, StoreError> {
        let guard = self
            .applications
            .lock()
            .expect("application store mutex poisoned");
        let mut applications: Vec<Application> = guard
            .values()
            .filter(|application| application.applicant_id == *applicant)
            .cloned()
            .collect();
        applications.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(applications)
    }

    fn update(&self, application: Application) -> Result<(), StoreError> {
        let mut guard = self
            .applications
            .lock()
            .expect("application store mutex poisoned");
        if !guard.contains_key(&application.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(application.id.clone(), application);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemorySavedJobStore {
    bookmarks: Mutex<Vec<SavedJob>>,
}

impl SavedJobStore for MemorySavedJobStore {
    fn save(&self, bookmark: SavedJob) -> Result<(), StoreError> {
        let mut guard = self.bookmarks.lock().expect("saved store mutex poisoned");
        let exists = guard
            .iter()
            .any(|saved| saved.job_id == bookmark.job_id && saved.actor_id == bookmark.actor_id);
        if !exists {
            guard.push(bookmark);
        }
        Ok(())
    }

    fn list_for_actor(&self, actor: &ActorId) -> Result<Vec<SavedJob>, StoreError> {
        let guard = self.bookmarks.lock().expect("saved store mutex poisoned");
        Ok(guard
            .iter()
            .filter(|saved| saved.actor_id == *actor)
            .cloned()
            .collect())
    }

    fn count_by_job(&self, job: &JobId) -> Result<u64, StoreError> {
        let guard = self.bookmarks.lock().expect("saved store mutex poisoned");
        Ok(guard.iter().filter(|saved| saved.job_id == *job).count() as u64)
    }
}

/// Blob fake recording uploads and issuing a distinct URL per signing call.
#[derive(Default)]
pub(super) struct MemoryBlob {
    uploads: Mutex<Vec<(String, usize)>>,
    signatures: AtomicU64,
    last_ttl: AtomicU64,
}

impl MemoryBlob {
    pub(super) fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().expect("blob mutex poisoned").clone()
    }

    pub(super) fn last_ttl(&self) -> u64 {
        self.last_ttl.load(Ordering::Relaxed)
    }
}

impl BlobStore for MemoryBlob {
    fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        _content_type: &mime::Mime,
    ) -> Result<ArtifactRef, BlobError> {
        self.uploads
            .lock()
            .expect("blob mutex poisoned")
            .push((path.to_string(), bytes.len()));
        Ok(ArtifactRef(path.to_string()))
    }

    fn signed_url(&self, artifact: &ArtifactRef, ttl_secs: u32) -> Result<SignedUrl, BlobError> {
        let signature = self.signatures.fetch_add(1, Ordering::Relaxed);
        self.last_ttl.store(u64::from(ttl_secs), Ordering::Relaxed);
        Ok(SignedUrl {
            url: format!("https://blobs.test/{}?sig={signature}", artifact.0),
            expires_at: Utc::now() + Duration::seconds(i64::from(ttl_secs)),
        })
    }
}

/// Store double simulating a concurrent submission that wins the insert race:
/// the duplicate pre-check sees nothing, then the insert conflicts.
pub(super) struct RacingApplicationStore;

impl ApplicationStore for RacingApplicationStore {
    fn insert(&self, _application: Application) -> Result<Application, StoreError> {
        Err(StoreError::Conflict)
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Ok(None)
    }

    fn find_for_applicant(
        &self,
        _job: &JobId,
        _applicant: &ActorId,
    ) -> Result<Option<Application>, StoreError> {
        Ok(None)
    }

    fn list_by_job(&self, _job: &JobId) -> Result<Vec<Application>, StoreError> {
        Ok(Vec::new())
    }

    fn count_by_job(&self, _job: &JobId) -> Result<u64, StoreError> {
        Ok(0)
    }

    fn list_by_applicant(&self, _applicant: &ActorId) -> Result<Vec<Application>, StoreError> {
        Ok(Vec::new())
    }

    fn update(&self, _application: Application) -> Result<(), StoreError> {
        Err(StoreError::NotFound)
    }
}

/// Store double whose reads succeed but whose insert finds the backend gone.
pub(super) struct UnavailableApplicationStore;

impl ApplicationStore for UnavailableApplicationStore {
    fn insert(&self, _application: Application) -> Result<Application, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Ok(None)
    }

    fn find_for_applicant(
        &self,
        _job: &JobId,
        _applicant: &ActorId,
    ) -> Result<Option<Application>, StoreError> {
        Ok(None)
    }

    fn list_by_job(&self, _job: &JobId) -> Result<Vec<Application>, StoreError> {
        Ok(Vec::new())
    }

    fn count_by_job(&self, _job: &JobId) -> Result<u64, StoreError> {
        Ok(0)
    }

    fn list_by_applicant(&self, _applicant: &ActorId) -> Result<Vec<Application>, StoreError> {
        Ok(Vec::new())
    }

    fn update(&self, _application: Application) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct FailingBlob;

impl BlobStore for FailingBlob {
    fn upload(
        &self,
        _path: &str,
        _bytes: &[u8],
        _content_type: &mime::Mime,
    ) -> Result<ArtifactRef, BlobError> {
        Err(BlobError::Backend("object store offline".to_string()))
    }

    fn signed_url(&self, _artifact: &ArtifactRef, _ttl_secs: u32) -> Result<SignedUrl, BlobError> {
        Err(BlobError::Backend("object store offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryAudit {
    events: Mutex<Vec<StatusChangeEvent>>,
}

impl MemoryAudit {
    pub(super) fn events(&self) -> Vec<StatusChangeEvent> {
        self.events.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, event: StatusChangeEvent) {
        self.events.lock().expect("audit mutex poisoned").push(event);
    }
}

pub(super) struct Harness {
    pub(super) job_store: Arc<MemoryJobStore>,
    pub(super) application_store: Arc<MemoryApplicationStore>,
    pub(super) saved_store: Arc<MemorySavedJobStore>,
    pub(super) blob: Arc<MemoryBlob>,
    pub(super) audit: Arc<MemoryAudit>,
    pub(super) jobs:
        Arc<JobService<MemoryJobStore, MemoryApplicationStore, MemorySavedJobStore, MemoryAudit>>,
    pub(super) applications:
        Arc<ApplicationService<MemoryJobStore, MemoryApplicationStore, MemoryBlob, MemoryAudit>>,
    pub(super) artifacts:
        Arc<ArtifactAccessService<MemoryJobStore, MemoryApplicationStore, MemoryBlob>>,
}

pub(super) const TEST_LINK_TTL: u32 = 60;

pub(super) fn harness() -> Harness {
    let job_store = Arc::new(MemoryJobStore::default());
    let application_store = Arc::new(MemoryApplicationStore::default());
    let saved_store = Arc::new(MemorySavedJobStore::default());
    let blob = Arc::new(MemoryBlob::default());
    let audit = Arc::new(MemoryAudit::default());

    let jobs = Arc::new(JobService::new(
        job_store.clone(),
        application_store.clone(),
        saved_store.clone(),
        audit.clone(),
    ));
    let applications = Arc::new(ApplicationService::new(
        job_store.clone(),
        application_store.clone(),
        blob.clone(),
        audit.clone(),
    ));
    let artifacts = Arc::new(ArtifactAccessService::new(
        job_store.clone(),
        application_store.clone(),
        blob.clone(),
        TEST_LINK_TTL,
    ));

    Harness {
        job_store,
        application_store,
        saved_store,
        blob,
        audit,
        jobs,
        applications,
        artifacts,
    }
}

pub(super) fn router_for(harness: &Harness) -> axum::Router {
    crate::hiring::router::hiring_router(crate::hiring::router::HiringState {
        jobs: harness.jobs.clone(),
        applications: harness.applications.clone(),
        artifacts: harness.artifacts.clone(),
    })
}

/// Drive the whole submission protocol with valid inputs.
pub(super) fn submit_application(
    harness: &Harness,
    applicant: &ActorId,
    job_id: &JobId,
    answers: Vec<String>,
) -> Application {
    let mut flow = harness
        .applications
        .begin_submission(applicant, job_id)
        .expect("submission begins");
    let next = flow.submit_contact(contact_phase()).expect("contact phase");
    if matches!(next, crate::hiring::applications::submission::NextStep::Answers(_)) {
        flow.submit_answers(answers).expect("answers phase");
    }
    harness.applications.finalize(flow).expect("finalize")
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
