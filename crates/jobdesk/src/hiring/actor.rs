use std::fmt;

use serde::{Deserialize, Serialize};

use super::jobs::domain::Job;

/// Opaque identifier for an authenticated caller. The identity collaborator
/// verifies it upstream; the engine never inspects its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Role an actor holds relative to a specific job. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobRole {
    Poster,
    Seeker,
}

impl ActorId {
    pub fn role_for(&self, job: &Job) -> JobRole {
        if *self == job.owner_id {
            JobRole::Poster
        } else {
            JobRole::Seeker
        }
    }
}
