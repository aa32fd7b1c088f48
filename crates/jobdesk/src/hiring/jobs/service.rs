use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{Job, JobDraft, JobId, JobStatus, PostedJobView, SavedJob, SavedJobView};
use crate::hiring::actor::ActorId;
use crate::hiring::audit::{AuditEntity, AuditSink, StatusChangeEvent};
use crate::hiring::authz::{allows, Action, GuardContext};
use crate::hiring::error::HiringError;
use crate::hiring::store::{ApplicationStore, JobStore, SavedJobStore};

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

/// Manages posting creation, the applicant-count edit lock, the status
/// lifecycle, and bookmarks. Every mutation re-reads current state from the
/// stores before the guard is consulted.
pub struct JobService<J, A, S, O> {
    jobs: Arc<J>,
    applications: Arc<A>,
    saved: Arc<S>,
    audit: Arc<O>,
}

impl<J, A, S, O> JobService<J, A, S, O>
where
    J: JobStore,
    A: ApplicationStore,
    S: SavedJobStore,
    O: AuditSink,
{
    pub fn new(jobs: Arc<J>, applications: Arc<A>, saved: Arc<S>, audit: Arc<O>) -> Self {
        Self {
            jobs,
            applications,
            saved,
            audit,
        }
    }

    pub fn create(&self, actor: &ActorId, draft: JobDraft) -> Result<Job, HiringError> {
        let draft = draft.validated()?;
        let job = Job::from_draft(next_job_id(), actor.clone(), draft, Utc::now());
        let stored = self.jobs.insert(job)?;
        tracing::info!(job = %stored.id, owner = %stored.owner_id, "job posted");
        Ok(stored)
    }

    /// Edit posting fields. Rejected for non-owners and, independent of job
    /// status, once at least one application exists.
    pub fn edit(&self, actor: &ActorId, id: &JobId, draft: JobDraft) -> Result<Job, HiringError> {
        let mut job = self.jobs.fetch(id)?.ok_or(HiringError::NotFound("job"))?;
        let applicant_count = self.applications.count_by_job(id)?;
        let ctx = GuardContext {
            applicant_count,
            ..GuardContext::default()
        };
        if !allows(actor, Action::EditJob, &job, ctx) {
            return Err(HiringError::Denied(Action::EditJob));
        }

        let draft = draft.validated()?;
        job.apply_draft(draft);
        self.jobs.update(job.clone())?;
        Ok(job)
    }

    /// Apply a status transition per the lifecycle table, owner only.
    pub fn change_status(
        &self,
        actor: &ActorId,
        id: &JobId,
        to: JobStatus,
    ) -> Result<Job, HiringError> {
        let mut job = self.jobs.fetch(id)?.ok_or(HiringError::NotFound("job"))?;
        if !allows(actor, Action::ChangeJobStatus, &job, GuardContext::default()) {
            return Err(HiringError::Denied(Action::ChangeJobStatus));
        }

        let from = job.status;
        if !from.can_transition_to(to) {
            return Err(HiringError::InvalidTransition {
                entity: "job",
                from: from.label(),
                to: to.label(),
            });
        }

        job.status = to;
        self.jobs.update(job.clone())?;
        self.audit.record(StatusChangeEvent {
            entity: AuditEntity::Job,
            id: job.id.0.clone(),
            from: from.label(),
            to: to.label(),
            actor: actor.clone(),
            at: Utc::now(),
        });
        Ok(job)
    }

    pub fn get(&self, id: &JobId) -> Result<Job, HiringError> {
        self.jobs.fetch(id)?.ok_or(HiringError::NotFound("job"))
    }

    /// Posting detail with live counts, as shown on the poster's job page.
    pub fn detail(&self, id: &JobId) -> Result<PostedJobView, HiringError> {
        let job = self.get(id)?;
        let applicant_count = self.applications.count_by_job(id)?;
        let saved_count = self.saved.count_by_job(id)?;
        Ok(PostedJobView {
            job,
            applicant_count,
            saved_count,
        })
    }

    /// The public board: open postings only.
    pub fn board(&self) -> Result<Vec<Job>, HiringError> {
        Ok(self.jobs.list_open()?)
    }

    pub fn posted_by(&self, actor: &ActorId) -> Result<Vec<PostedJobView>, HiringError> {
        let jobs = self.jobs.list_by_owner(actor)?;
        let mut views = Vec::with_capacity(jobs.len());
        for job in jobs {
            let applicant_count = self.applications.count_by_job(&job.id)?;
            let saved_count = self.saved.count_by_job(&job.id)?;
            views.push(PostedJobView {
                job,
                applicant_count,
                saved_count,
            });
        }
        Ok(views)
    }

    /// Bookmark a posting. Idempotent: saving twice is not an error.
    pub fn save_job(&self, actor: &ActorId, id: &JobId) -> Result<(), HiringError> {
        let job = self.get(id)?;
        self.saved.save(SavedJob {
            job_id: job.id,
            actor_id: actor.clone(),
            saved_at: Utc::now(),
        })?;
        Ok(())
    }

    pub fn saved_jobs(&self, actor: &ActorId) -> Result<Vec<SavedJobView>, HiringError> {
        let bookmarks = self.saved.list_for_actor(actor)?;
        let mut views = Vec::with_capacity(bookmarks.len());
        for bookmark in bookmarks {
            // A bookmark may outlive its posting; skip dangling entries.
            if let Some(job) = self.jobs.fetch(&bookmark.job_id)? {
                views.push(SavedJobView {
                    job_id: job.id,
                    title: job.title,
                    company: job.company,
                    location: job.location,
                    status: job.status,
                    saved_at: bookmark.saved_at,
                });
            }
        }
        Ok(views)
    }
}
