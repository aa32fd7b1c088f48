//! Job posting and application lifecycle engine.
//!
//! The `hiring` module owns every invariant with teeth: job status
//! transitions, the applicant-count edit lock, ownership-based authorization,
//! the two-phase application submission protocol, and time-limited resume
//! access. Persistence, blob storage, and audit logging are collaborator
//! traits so the whole engine runs against in-memory fakes in tests.

pub mod config;
pub mod error;
pub mod hiring;
pub mod telemetry;
