//! Job status transition table.
//!
//! `Open → Paused → Open → Closed` and `Open → Closed` directly. `Closed` is
//! terminal; nothing leaves it, including a re-open. Self-transitions are
//! rejected so a stale client cannot silently "confirm" the current state.

use super::domain::JobStatus;

impl JobStatus {
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Open, JobStatus::Paused)
                | (JobStatus::Open, JobStatus::Closed)
                | (JobStatus::Paused, JobStatus::Open)
                | (JobStatus::Paused, JobStatus::Closed)
        )
    }
}
