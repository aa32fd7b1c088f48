use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::hiring::actor::ActorId;
use crate::hiring::artifacts::ArtifactRef;
use crate::hiring::jobs::domain::{JobId, JobStatus};

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Application status. `InProgress` is the single canonical initial status —
/// the value stored is the value displayed, with no renaming in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    InProgress,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::InProgress => "in_progress",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Posters may move an application between any two distinct statuses;
    /// re-deciding `Accepted ⇄ Rejected` is explicitly permitted.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        self != next
    }
}

/// Phase-1 contact fields, validated with field-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContactDetails {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 10, message = "phone must have at least 10 digits"))]
    pub phone: String,
}

/// One uploaded resume file as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A screening answer paired with the question text it answered, captured at
/// submission time. Later edits to a job's questions never touch these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningAnswer {
    pub question: String,
    pub answer: String,
}

/// A submitted application. Exactly one exists per `(job_id, applicant_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub applicant_id: ActorId,
    pub contact_email: String,
    pub contact_phone: String,
    pub resume: ArtifactRef,
    pub answers: Vec<ScreeningAnswer>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

/// Seeker-facing status view: an applicant sees their own application only.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub job_id: JobId,
    pub status: &'static str,
    pub applied_at: DateTime<Utc>,
}

impl Application {
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            job_id: self.job_id.clone(),
            status: self.status.label(),
            applied_at: self.created_at,
        }
    }
}

/// Seeker dashboard entry joining the application to its posting summary.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedJobView {
    pub application_id: ApplicationId,
    pub job_id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_status: JobStatus,
    pub status: &'static str,
    pub applied_at: DateTime<Utc>,
}
