pub mod domain;
pub mod lifecycle;
pub mod service;

pub use domain::{Job, JobDraft, JobId, JobStatus, JobType, SavedJob, WorkplaceMode};
pub use service::JobService;
