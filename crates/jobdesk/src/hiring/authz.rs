//! Ownership-based authorization guard.
//!
//! A pure predicate: no side effects, nothing cached. Callers must re-read
//! job and application state and rebuild the [`GuardContext`] on every action
//! because both can change between requests.

use super::actor::ActorId;
use super::applications::domain::Application;
use super::jobs::domain::{Job, JobStatus};

/// Actions the guard can rule on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    EditJob,
    ChangeJobStatus,
    ViewApplicantList,
    ChangeApplicationStatus,
    SubmitApplication,
    ViewOwnApplicationStatus,
}

/// Volatile facts the guard needs but must not fetch itself.
///
/// `applicant_count` is computed from the application store at decision time,
/// never read from a cached field on the job record.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardContext<'a> {
    pub applicant_count: u64,
    pub already_applied: bool,
    pub application: Option<&'a Application>,
}

/// Rules are evaluated in order; the first matching rule decides. Any
/// combination not covered below is denied.
pub fn allows(actor: &ActorId, action: Action, job: &Job, ctx: GuardContext<'_>) -> bool {
    let is_owner = *actor == job.owner_id;
    match action {
        Action::EditJob => is_owner && ctx.applicant_count == 0,
        Action::ChangeJobStatus | Action::ViewApplicantList | Action::ChangeApplicationStatus => {
            is_owner
        }
        Action::SubmitApplication => {
            !is_owner && job.status == JobStatus::Open && !ctx.already_applied
        }
        Action::ViewOwnApplicationStatus => ctx
            .application
            .map(|application| application.applicant_id == *actor)
            .unwrap_or(false),
    }
}
