use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationStatusView, AppliedJobView,
};
use super::submission::SubmissionFlow;
use crate::hiring::actor::ActorId;
use crate::hiring::artifacts::BlobStore;
use crate::hiring::audit::{AuditEntity, AuditSink, StatusChangeEvent};
use crate::hiring::authz::{allows, Action, GuardContext};
use crate::hiring::error::HiringError;
use crate::hiring::jobs::domain::JobId;
use crate::hiring::store::{ApplicationStore, JobStore, StoreError};

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Drives the submission protocol to a persisted record and manages
/// application status decisions.
pub struct ApplicationService<J, A, B, O> {
    jobs: Arc<J>,
    applications: Arc<A>,
    blob: Arc<B>,
    audit: Arc<O>,
}

impl<J, A, B, O> ApplicationService<J, A, B, O>
where
    J: JobStore,
    A: ApplicationStore,
    B: BlobStore,
    O: AuditSink,
{
    pub fn new(jobs: Arc<J>, applications: Arc<A>, blob: Arc<B>, audit: Arc<O>) -> Self {
        Self {
            jobs,
            applications,
            blob,
            audit,
        }
    }

    /// Start a submission attempt. The guard runs here, before phase 1, and
    /// again at finalization since the job may close in between.
    pub fn begin_submission(
        &self,
        actor: &ActorId,
        job_id: &JobId,
    ) -> Result<SubmissionFlow, HiringError> {
        let job = self
            .jobs
            .fetch(job_id)?
            .ok_or(HiringError::NotFound("job"))?;
        let existing = self.applications.find_for_applicant(job_id, actor)?;
        if existing.is_some() {
            return Err(HiringError::DuplicateApplication);
        }

        let ctx = GuardContext {
            already_applied: false,
            ..GuardContext::default()
        };
        if !allows(actor, Action::SubmitApplication, &job, ctx) {
            return Err(HiringError::Denied(Action::SubmitApplication));
        }

        Ok(SubmissionFlow::new(job, actor.clone()))
    }

    /// Finalize a completed flow: re-check authorization against fresh state,
    /// upload the resume, then insert exactly one application record.
    ///
    /// Upload failure aborts with no record. Insert failure after a
    /// successful upload leaves an orphaned artifact; that is logged with the
    /// artifact ref for reconciliation and surfaced as a dependency failure.
    pub fn finalize(&self, flow: SubmissionFlow) -> Result<Application, HiringError> {
        let (snapshot, applicant, contact, resume, answers) = flow.into_ready()?;
        let job_id = snapshot.id;

        // Fresh read: the snapshot may be stale by now.
        let job = self
            .jobs
            .fetch(&job_id)?
            .ok_or(HiringError::NotFound("job"))?;
        if self
            .applications
            .find_for_applicant(&job_id, &applicant)?
            .is_some()
        {
            return Err(HiringError::DuplicateApplication);
        }
        let ctx = GuardContext {
            already_applied: false,
            ..GuardContext::default()
        };
        if !allows(&applicant, Action::SubmitApplication, &job, ctx) {
            return Err(HiringError::Denied(Action::SubmitApplication));
        }

        let path = format!(
            "resume/{}/{}.pdf",
            applicant,
            Utc::now().timestamp_millis()
        );
        let content_type = resume
            .content_type
            .parse::<mime::Mime>()
            .map_err(|_| HiringError::validation("resume", "resume must be a PDF document"))?;
        let artifact = self.blob.upload(&path, &resume.bytes, &content_type)?;

        let application = Application {
            id: next_application_id(),
            job_id: job.id.clone(),
            applicant_id: applicant.clone(),
            contact_email: contact.email,
            contact_phone: contact.phone,
            resume: artifact.clone(),
            answers,
            status: ApplicationStatus::InProgress,
            created_at: Utc::now(),
        };

        match self.applications.insert(application) {
            Ok(stored) => {
                tracing::info!(
                    application = %stored.id,
                    job = %stored.job_id,
                    "application submitted"
                );
                Ok(stored)
            }
            Err(StoreError::Conflict) => {
                // Concurrent session won the race; the uploaded artifact is
                // garbage for reconciliation, not a partial application.
                tracing::warn!(
                    artifact = %artifact.0,
                    job = %job.id,
                    applicant = %applicant,
                    "duplicate submission lost the insert race; artifact orphaned"
                );
                Err(HiringError::DuplicateApplication)
            }
            Err(err) => {
                tracing::warn!(
                    artifact = %artifact.0,
                    job = %job.id,
                    applicant = %applicant,
                    error = %err,
                    "application insert failed after resume upload; artifact orphaned"
                );
                Err(HiringError::Dependency(err.to_string()))
            }
        }
    }

    /// Poster decision on an application. Re-decisions are permitted; every
    /// transition is audited with old and new status.
    pub fn change_status(
        &self,
        actor: &ActorId,
        id: &ApplicationId,
        to: ApplicationStatus,
    ) -> Result<Application, HiringError> {
        let mut application = self
            .applications
            .fetch(id)?
            .ok_or(HiringError::NotFound("application"))?;
        let job = self
            .jobs
            .fetch(&application.job_id)?
            .ok_or(HiringError::NotFound("job"))?;

        if !allows(
            actor,
            Action::ChangeApplicationStatus,
            &job,
            GuardContext::default(),
        ) {
            return Err(HiringError::Denied(Action::ChangeApplicationStatus));
        }

        let from = application.status;
        if !from.can_transition_to(to) {
            return Err(HiringError::InvalidTransition {
                entity: "application",
                from: from.label(),
                to: to.label(),
            });
        }

        application.status = to;
        self.applications.update(application.clone())?;
        self.audit.record(StatusChangeEvent {
            entity: AuditEntity::Application,
            id: application.id.0.clone(),
            from: from.label(),
            to: to.label(),
            actor: actor.clone(),
            at: Utc::now(),
        });
        Ok(application)
    }

    /// An applicant's view of their own application.
    pub fn status_view(
        &self,
        actor: &ActorId,
        id: &ApplicationId,
    ) -> Result<ApplicationStatusView, HiringError> {
        let application = self
            .applications
            .fetch(id)?
            .ok_or(HiringError::NotFound("application"))?;
        let job = self
            .jobs
            .fetch(&application.job_id)?
            .ok_or(HiringError::NotFound("job"))?;

        let ctx = GuardContext {
            application: Some(&application),
            ..GuardContext::default()
        };
        if !allows(actor, Action::ViewOwnApplicationStatus, &job, ctx) {
            return Err(HiringError::Denied(Action::ViewOwnApplicationStatus));
        }

        Ok(application.status_view())
    }

    /// The applicant list for a posting, poster only.
    pub fn list_for_job(
        &self,
        actor: &ActorId,
        job_id: &JobId,
    ) -> Result<Vec<Application>, HiringError> {
        let job = self
            .jobs
            .fetch(job_id)?
            .ok_or(HiringError::NotFound("job"))?;
        if !allows(
            actor,
            Action::ViewApplicantList,
            &job,
            GuardContext::default(),
        ) {
            return Err(HiringError::Denied(Action::ViewApplicantList));
        }
        Ok(self.applications.list_by_job(job_id)?)
    }

    /// Seeker dashboard: every application this actor has submitted, joined
    /// to its posting summary.
    pub fn applied(&self, actor: &ActorId) -> Result<Vec<AppliedJobView>, HiringError> {
        let applications = self.applications.list_by_applicant(actor)?;
        let mut views = Vec::with_capacity(applications.len());
        for application in applications {
            if let Some(job) = self.jobs.fetch(&application.job_id)? {
                views.push(AppliedJobView {
                    application_id: application.id,
                    job_id: job.id,
                    title: job.title,
                    company: job.company,
                    location: job.location,
                    job_status: job.status,
                    status: application.status.label(),
                    applied_at: application.created_at,
                });
            }
        }
        Ok(views)
    }
}
