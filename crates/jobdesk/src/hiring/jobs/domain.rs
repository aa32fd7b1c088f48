use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::hiring::actor::ActorId;
use crate::hiring::error::{FieldError, HiringError};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Paused,
    Closed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Paused => "paused",
            JobStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkplaceMode {
    OnSite,
    Remote,
    Hybrid,
}

/// Poster-supplied fields for creating or editing a posting. Status is not a
/// draft field; it only moves through the lifecycle service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct JobDraft {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
    pub job_type: JobType,
    pub workplace: WorkplaceMode,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(range(min = 1, message = "at least one opening is required"))]
    pub openings: u32,
    #[serde(default)]
    pub screening_questions: Vec<String>,
}

impl JobDraft {
    /// Field-level validation: derive rules plus a blank-question check.
    pub fn validated(self) -> Result<Self, HiringError> {
        let mut fields = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => crate::hiring::applications::submission::field_errors_from(&errors),
        };

        for (index, question) in self.screening_questions.iter().enumerate() {
            if question.trim().is_empty() {
                fields.push(FieldError::new(
                    format!("screening_questions[{index}]"),
                    "screening question text must not be blank",
                ));
            }
        }

        if fields.is_empty() {
            Ok(self)
        } else {
            Err(HiringError::Validation(fields))
        }
    }
}

/// A job posting. `owner_id` never changes after creation; all fields other
/// than `status` are frozen once the posting has applicants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub owner_id: ActorId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: JobType,
    pub workplace: WorkplaceMode,
    pub description: String,
    pub openings: u32,
    pub screening_questions: Vec<String>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn from_draft(id: JobId, owner_id: ActorId, draft: JobDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id,
            title: draft.title,
            company: draft.company,
            location: draft.location,
            job_type: draft.job_type,
            workplace: draft.workplace,
            description: draft.description,
            openings: draft.openings,
            screening_questions: draft.screening_questions,
            status: JobStatus::Open,
            created_at: now,
        }
    }

    /// Overwrite every draft field, leaving id, owner, status, and creation
    /// time untouched. Callers enforce the edit lock before reaching here.
    pub fn apply_draft(&mut self, draft: JobDraft) {
        self.title = draft.title;
        self.company = draft.company;
        self.location = draft.location;
        self.job_type = draft.job_type;
        self.workplace = draft.workplace;
        self.description = draft.description;
        self.openings = draft.openings;
        self.screening_questions = draft.screening_questions;
    }
}

/// Bookmark recording that an actor saved a job. No status, no lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedJob {
    pub job_id: JobId,
    pub actor_id: ActorId,
    pub saved_at: DateTime<Utc>,
}

/// Poster dashboard entry: one owned posting with live counts.
#[derive(Debug, Clone, Serialize)]
pub struct PostedJobView {
    pub job: Job,
    pub applicant_count: u64,
    pub saved_count: u64,
}

/// Seeker dashboard entry: a bookmarked posting summary.
#[derive(Debug, Clone, Serialize)]
pub struct SavedJobView {
    pub job_id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub status: JobStatus,
    pub saved_at: DateTime<Utc>,
}
