use chrono::{Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use jobdesk::hiring::{
    ActorId, Application, ApplicationId, ApplicationService, ApplicationStore,
    ArtifactAccessService, ArtifactRef, AuditSink, BlobError, BlobStore, HiringState, Job, JobId,
    JobService, JobStatus, JobStore, SavedJob, SavedJobStore, SignedUrl, StatusChangeEvent,
    StoreError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
pub(crate) struct InMemoryJobStore {
    jobs: Mutex<HashMap<JobId, Job>>,
}

impl JobStore for InMemoryJobStore {
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
        if guard.contains_key(&job.id) {
            guard.insert(job.id.clone(), job);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn list_by_owner(&self, owner: &ActorId) -> Result<Vec<Job>, StoreError> {
        let guard = self.jobs.lock().expect("job store mutex poisoned");
        let mut jobs: Vec<Job> = guard
            .values()
            .filter(|job| job.owner_id == *owner)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(jobs)
    }

    fn list_open(&self) -> Result<Vec<Job>, StoreError> {
        let guard = self.jobs.lock().expect("job store mutex poisoned");
        let mut jobs: Vec<Job> = guard
            .values()
            .filter(|job| job.status == JobStatus::Open)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(jobs)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryApplicationStore {
    applications: Mutex<HashMap<ApplicationId, Application>>,
}

impl ApplicationStore for InMemoryApplicationStore {
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
        applications.sort_by(|a, b| a.created_at.cmp(&b.created_at));
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
        applications.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(applications)
    }

    fn update(&self, application: Application) -> Result<(), StoreError> {
        let mut guard = self
            .applications
            .lock()
            .expect("application store mutex poisoned");
        if guard.contains_key(&application.id) {
            guard.insert(application.id.clone(), application);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

#[derive(Default)]
pub(crate) struct InMemorySavedJobStore {
    bookmarks: Mutex<Vec<SavedJob>>,
}

impl SavedJobStore for InMemorySavedJobStore {
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

/// Process-local blob backend. Stored bytes never leave the process; signed
/// URLs are synthesized with a monotonically increasing signature so repeated
/// requests are distinguishable downstream.
#[derive(Default)]
pub(crate) struct InMemoryBlobStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    signatures: AtomicU64,
}

impl BlobStore for InMemoryBlobStore {
    fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &mime::Mime,
    ) -> Result<ArtifactRef, BlobError> {
        let mut guard = self.objects.lock().expect("blob mutex poisoned");
        guard.insert(path.to_string(), bytes.to_vec());
        tracing::debug!(path, size = bytes.len(), %content_type, "artifact stored");
        Ok(ArtifactRef(path.to_string()))
    }

    fn signed_url(&self, artifact: &ArtifactRef, ttl_secs: u32) -> Result<SignedUrl, BlobError> {
        let guard = self.objects.lock().expect("blob mutex poisoned");
        if !guard.contains_key(&artifact.0) {
            return Err(BlobError::Backend(format!(
                "unknown artifact {}",
                artifact.0
            )));
        }
        let signature = self.signatures.fetch_add(1, Ordering::Relaxed);
        Ok(SignedUrl {
            url: format!("https://artifacts.jobdesk.local/{}?sig={signature}", artifact.0),
            expires_at: Utc::now() + Duration::seconds(i64::from(ttl_secs)),
        })
    }
}

/// Audit sink that writes transitions to the structured log.
#[derive(Default)]
pub(crate) struct LogAuditSink;

impl AuditSink for LogAuditSink {
    fn record(&self, event: StatusChangeEvent) {
        tracing::info!(
            entity = ?event.entity,
            id = %event.id,
            from = event.from,
            to = event.to,
            actor = %event.actor,
            "status changed"
        );
    }
}

pub(crate) type ApiHiringState = HiringState<
    InMemoryJobStore,
    InMemoryApplicationStore,
    InMemorySavedJobStore,
    InMemoryBlobStore,
    LogAuditSink,
>;

/// Wire the full service stack over in-memory collaborators.
pub(crate) fn build_hiring_state(resume_link_ttl_secs: u32) -> ApiHiringState {
    let jobs = Arc::new(InMemoryJobStore::default());
    let applications = Arc::new(InMemoryApplicationStore::default());
    let saved = Arc::new(InMemorySavedJobStore::default());
    let blob = Arc::new(InMemoryBlobStore::default());
    let audit = Arc::new(LogAuditSink);

    HiringState {
        jobs: Arc::new(JobService::new(
            jobs.clone(),
            applications.clone(),
            saved,
            audit.clone(),
        )),
        applications: Arc::new(ApplicationService::new(
            jobs.clone(),
            applications.clone(),
            blob.clone(),
            audit,
        )),
        artifacts: Arc::new(ArtifactAccessService::new(
            jobs,
            applications,
            blob,
            resume_link_ttl_secs,
        )),
    }
}
