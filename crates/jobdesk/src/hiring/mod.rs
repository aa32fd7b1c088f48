//! Job/application lifecycle engine.
//!
//! Entities are mutated only through the services in `jobs` and
//! `applications`, which re-read current state from the stores immediately
//! before evaluating any transition. The authorization guard in `authz` is a
//! pure predicate re-evaluated on every action.

pub mod actor;
pub mod applications;
pub mod artifacts;
pub mod audit;
pub mod authz;
mod error;
pub mod jobs;
pub mod router;
pub mod store;

#[cfg(test)]
mod tests;

pub use actor::{ActorId, JobRole};
pub use applications::domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationStatusView, AppliedJobView,
    ContactDetails, ResumeUpload, ScreeningAnswer,
};
pub use applications::service::ApplicationService;
pub use applications::submission::{ContactPhase, NextStep, SubmissionFlow};
pub use artifacts::{ArtifactAccessService, ArtifactRef, BlobError, BlobStore, SignedUrl};
pub use audit::{AuditEntity, AuditSink, StatusChangeEvent};
pub use authz::{allows, Action, GuardContext};
pub use error::{FieldError, HiringError};
pub use jobs::domain::{
    Job, JobDraft, JobId, JobStatus, JobType, PostedJobView, SavedJob, SavedJobView, WorkplaceMode,
};
pub use jobs::service::JobService;
pub use router::{hiring_router, HiringState};
pub use store::{ApplicationStore, JobStore, SavedJobStore, StoreError};
