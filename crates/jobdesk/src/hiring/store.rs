//! Persistence collaborator traits.
//!
//! Implementations live outside the engine (a relational store in production,
//! in-memory fakes in tests). The uniqueness constraint on
//! `(job_id, applicant_id)` belongs to [`ApplicationStore::insert`]; it is the
//! sole concurrency safeguard for duplicate submissions, since independent
//! processes may serve requests concurrently.

use super::actor::ActorId;
use super::applications::domain::{Application, ApplicationId};
use super::jobs::domain::{Job, JobId, SavedJob};

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub trait JobStore: Send + Sync {
    fn insert(&self, job: Job) -> Result<Job, StoreError>;
    fn fetch(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    fn update(&self, job: Job) -> Result<(), StoreError>;
    fn list_by_owner(&self, owner: &ActorId) -> Result<Vec<Job>, StoreError>;
    fn list_open(&self) -> Result<Vec<Job>, StoreError>;
}

pub trait ApplicationStore: Send + Sync {
    /// Insert a new application. Must fail with [`StoreError::Conflict`] when
    /// an application for the same `(job_id, applicant_id)` pair exists.
    fn insert(&self, application: Application) -> Result<Application, StoreError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;
    fn find_for_applicant(
        &self,
        job: &JobId,
        applicant: &ActorId,
    ) -> Result<Option<Application>, StoreError>;
    fn list_by_job(&self, job: &JobId) -> Result<Vec<Application>, StoreError>;
    fn count_by_job(&self, job: &JobId) -> Result<u64, StoreError>;
    fn list_by_applicant(&self, applicant: &ActorId) -> Result<Vec<Application>, StoreError>;
    fn update(&self, application: Application) -> Result<(), StoreError>;
}

pub trait SavedJobStore: Send + Sync {
    /// Record a bookmark. Saving the same pair twice has no additional effect.
    fn save(&self, bookmark: SavedJob) -> Result<(), StoreError>;
    fn list_for_actor(&self, actor: &ActorId) -> Result<Vec<SavedJob>, StoreError>;
    fn count_by_job(&self, job: &JobId) -> Result<u64, StoreError>;
}
