//! Blob-store collaborator and the artifact access service.
//!
//! Resumes are referenced through opaque [`ArtifactRef`]s, never raw storage
//! paths. Read access goes through short-lived signed URLs requested from the
//! blob store on every call; the engine never caches a link.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::actor::ActorId;
use super::applications::domain::ApplicationId;
use super::authz::{allows, Action, GuardContext};
use super::error::HiringError;
use super::store::{ApplicationStore, JobStore};

/// Opaque reference into the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef(pub String);

/// A time-limited, single-purpose access link. Expiry enforcement is the blob
/// store's job; the engine only ever requests the minimum viable TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("blob store operation failed: {0}")]
    Backend(String),
}

pub trait BlobStore: Send + Sync {
    fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &mime::Mime,
    ) -> Result<ArtifactRef, BlobError>;
    fn signed_url(&self, artifact: &ArtifactRef, ttl_secs: u32) -> Result<SignedUrl, BlobError>;
}

/// Issues resume access links for the job's poster or the applicant themself.
pub struct ArtifactAccessService<J, A, B> {
    jobs: Arc<J>,
    applications: Arc<A>,
    blob: Arc<B>,
    ttl_secs: u32,
}

impl<J, A, B> ArtifactAccessService<J, A, B>
where
    J: JobStore,
    A: ApplicationStore,
    B: BlobStore,
{
    pub fn new(jobs: Arc<J>, applications: Arc<A>, blob: Arc<B>, ttl_secs: u32) -> Self {
        Self {
            jobs,
            applications,
            blob,
            ttl_secs,
        }
    }

    /// Issue a fresh signed URL for the resume attached to an application.
    pub fn resume_link(
        &self,
        actor: &ActorId,
        application_id: &ApplicationId,
    ) -> Result<SignedUrl, HiringError> {
        let application = self
            .applications
            .fetch(application_id)?
            .ok_or(HiringError::NotFound("application"))?;
        let job = self
            .jobs
            .fetch(&application.job_id)?
            .ok_or(HiringError::NotFound("job"))?;

        let poster_access = allows(
            actor,
            Action::ViewApplicantList,
            &job,
            GuardContext::default(),
        );
        if !poster_access && application.applicant_id != *actor {
            return Err(HiringError::Denied(Action::ViewApplicantList));
        }

        let link = self.blob.signed_url(&application.resume, self.ttl_secs)?;
        Ok(link)
    }
}
