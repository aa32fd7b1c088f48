pub mod domain;
pub mod service;
pub mod submission;

pub use domain::{Application, ApplicationId, ApplicationStatus};
pub use service::ApplicationService;
pub use submission::SubmissionFlow;
