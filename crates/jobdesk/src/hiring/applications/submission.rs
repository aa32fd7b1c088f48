//! Two-phase application submission protocol.
//!
//! One [`SubmissionFlow`] is scoped to a single actor's submission attempt:
//! `CollectingContact → CollectingAnswers → ReadyToSubmit`, skipping the
//! answers phase when the job has no screening questions. Validation failures
//! return field-level errors and leave the state unchanged. Finalization —
//! the upload and the insert — lives in the service, which re-checks
//! authorization against freshly read state.

use validator::Validate;

use super::domain::{ContactDetails, ResumeUpload, ScreeningAnswer};
use crate::hiring::actor::ActorId;
use crate::hiring::error::{FieldError, HiringError};
use crate::hiring::jobs::domain::Job;

/// The single accepted resume document type.
const ACCEPTED_RESUME_MIME: &str = "application/pdf";

/// Phase-1 input: contact fields plus the uploaded file list. The list form
/// mirrors the upload widget; exactly one file is accepted.
#[derive(Debug, Clone)]
pub struct ContactPhase {
    pub contact: ContactDetails,
    pub resumes: Vec<ResumeUpload>,
}

/// What the caller must do after a successful phase 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// The job has screening questions; answer them in order.
    Answers(Vec<String>),
    /// No questions; the flow is ready to finalize immediately.
    Ready,
}

#[derive(Debug)]
enum FlowState {
    CollectingContact,
    CollectingAnswers {
        contact: ContactDetails,
        resume: ResumeUpload,
    },
    ReadyToSubmit {
        contact: ContactDetails,
        resume: ResumeUpload,
        answers: Vec<ScreeningAnswer>,
    },
}

/// Per-attempt submission state machine holding a snapshot of the job taken
/// when the flow began. The snapshot's question list is what the answers are
/// matched against; the service re-reads the job again at finalization.
#[derive(Debug)]
pub struct SubmissionFlow {
    job: Job,
    applicant: ActorId,
    state: FlowState,
}

impl SubmissionFlow {
    pub(crate) fn new(job: Job, applicant: ActorId) -> Self {
        Self {
            job,
            applicant,
            state: FlowState::CollectingContact,
        }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn applicant(&self) -> &ActorId {
        &self.applicant
    }

    /// Validate phase-1 input and advance. Returns the screening questions
    /// when phase 2 is required, or `Ready` when the job has none.
    pub fn submit_contact(&mut self, phase: ContactPhase) -> Result<NextStep, HiringError> {
        if !matches!(self.state, FlowState::CollectingContact) {
            return Err(HiringError::validation(
                "contact",
                "contact details were already submitted for this attempt",
            ));
        }

        let mut fields = match phase.contact.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => field_errors_from(&errors),
        };

        if !phone_is_digits(&phase.contact.phone) {
            fields.push(FieldError::new("phone", "phone must contain only digits"));
        }

        let resume = validate_resume(&phase.resumes, &mut fields);

        let (Some(resume), true) = (resume, fields.is_empty()) else {
            return Err(HiringError::Validation(fields));
        };

        if self.job.screening_questions.is_empty() {
            self.state = FlowState::ReadyToSubmit {
                contact: phase.contact,
                resume,
                answers: Vec::new(),
            };
            Ok(NextStep::Ready)
        } else {
            let questions = self.job.screening_questions.clone();
            self.state = FlowState::CollectingAnswers {
                contact: phase.contact,
                resume,
            };
            Ok(NextStep::Answers(questions))
        }
    }

    /// Validate phase-2 answers: one non-empty answer per question, order
    /// matched. Any blank answer blocks submission.
    pub fn submit_answers(&mut self, answers: Vec<String>) -> Result<(), HiringError> {
        let FlowState::CollectingAnswers { .. } = &self.state else {
            return Err(HiringError::validation(
                "answers",
                "this submission is not collecting answers",
            ));
        };

        let questions = &self.job.screening_questions;
        if answers.len() != questions.len() {
            return Err(HiringError::validation(
                "answers",
                "one answer per screening question is required",
            ));
        }

        let mut fields = Vec::new();
        for (index, answer) in answers.iter().enumerate() {
            if answer.trim().is_empty() {
                fields.push(FieldError::new(
                    format!("answers[{index}]"),
                    "answer must not be blank",
                ));
            }
        }
        if !fields.is_empty() {
            return Err(HiringError::Validation(fields));
        }

        let FlowState::CollectingAnswers { contact, resume } = std::mem::replace(
            &mut self.state,
            FlowState::CollectingContact,
        ) else {
            unreachable!("state checked above");
        };

        let answers = questions
            .iter()
            .cloned()
            .zip(answers)
            .map(|(question, answer)| ScreeningAnswer { question, answer })
            .collect();

        self.state = FlowState::ReadyToSubmit {
            contact,
            resume,
            answers,
        };
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, FlowState::ReadyToSubmit { .. })
    }

    /// Consume the flow once both phases have passed validation.
    pub(crate) fn into_ready(
        self,
    ) -> Result<(Job, ActorId, ContactDetails, ResumeUpload, Vec<ScreeningAnswer>), HiringError>
    {
        match self.state {
            FlowState::ReadyToSubmit {
                contact,
                resume,
                answers,
            } => Ok((self.job, self.applicant, contact, resume, answers)),
            _ => Err(HiringError::validation(
                "submission",
                "submission is incomplete",
            )),
        }
    }
}

fn phone_is_digits(phone: &str) -> bool {
    let trimmed = phone.strip_prefix('+').unwrap_or(phone);
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

fn validate_resume(resumes: &[ResumeUpload], fields: &mut Vec<FieldError>) -> Option<ResumeUpload> {
    let [resume] = resumes else {
        fields.push(FieldError::new("resume", "exactly one resume is required"));
        return None;
    };

    match resume.content_type.parse::<mime::Mime>() {
        Ok(parsed) if parsed.essence_str() == ACCEPTED_RESUME_MIME => Some(resume.clone()),
        _ => {
            fields.push(FieldError::new("resume", "resume must be a PDF document"));
            None
        }
    }
}

/// Flatten `validator` derive output into the engine's field-error shape.
pub fn field_errors_from(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut fields = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| format!("invalid value for {field}"));
            fields.push(FieldError::new(field.to_string(), message));
        }
    }
    fields
}
