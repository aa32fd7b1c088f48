use crate::infra::{build_hiring_state, ApiHiringState};
use clap::Args;
use jobdesk::error::AppError;
use jobdesk::hiring::{
    ActorId, ApplicationStatus, ContactDetails, ContactPhase, JobDraft, JobStatus, JobType,
    NextStep, ResumeUpload, WorkplaceMode,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Post the demo job without screening questions.
    #[arg(long)]
    pub(crate) no_questions: bool,
    /// Stop after submission, before the poster's decision.
    #[arg(long)]
    pub(crate) skip_decision: bool,
}

/// Walk one posting from creation to decision on an in-memory stack,
/// printing what each side of the marketplace sees along the way.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let state = build_hiring_state(60);
    let poster = ActorId::from("demo-poster");
    let seeker = ActorId::from("demo-seeker");

    println!("Jobdesk demo");

    let questions = if args.no_questions {
        Vec::new()
    } else {
        vec![
            "How many years of backend experience do you have?".to_string(),
            "What interests you about this role?".to_string(),
        ]
    };
    let job = state.jobs.create(
        &poster,
        JobDraft {
            title: "Backend Engineer".to_string(),
            company: "Cedar Systems".to_string(),
            location: "Des Moines, IA".to_string(),
            job_type: JobType::FullTime,
            workplace: WorkplaceMode::Hybrid,
            description: "Design and operate the order ingestion pipeline.".to_string(),
            openings: 2,
            screening_questions: questions,
        },
    )?;
    println!("- Posted {} ({} / {})", job.id, job.title, job.status.label());

    state.jobs.save_job(&seeker, &job.id)?;
    println!("- Seeker bookmarked the posting");

    let mut flow = state.applications.begin_submission(&seeker, &job.id)?;
    let next = flow.submit_contact(ContactPhase {
        contact: ContactDetails {
            email: "demo.seeker@example.com".to_string(),
            phone: "+15155550142".to_string(),
        },
        resumes: vec![ResumeUpload {
            file_name: "resume.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: b"%PDF-1.7 demo resume".to_vec(),
        }],
    })?;

    match next {
        NextStep::Ready => println!("- Contact details accepted; no screening questions"),
        NextStep::Answers(questions) => {
            println!("- Contact details accepted; answering {} questions", questions.len());
            let answers = questions
                .iter()
                .map(|question| format!("Demo answer to: {question}"))
                .collect();
            flow.submit_answers(answers)?;
        }
    }

    let application = state.applications.finalize(flow)?;
    println!(
        "- Application {} submitted -> status {}",
        application.id,
        application.status.label()
    );

    let applicants = state.applications.list_for_job(&poster, &job.id)?;
    println!("- Poster sees {} applicant(s)", applicants.len());

    let link = state.artifacts.resume_link(&poster, &application.id)?;
    println!("- Resume link (expires {}): {}", link.expires_at, link.url);

    if !args.skip_decision {
        let decided = state.applications.change_status(
            &poster,
            &application.id,
            ApplicationStatus::Accepted,
        )?;
        println!("- Poster decision: {}", decided.status.label());

        state.jobs.change_status(&poster, &job.id, JobStatus::Closed)?;
        println!("- Posting closed");
    }

    print_dashboards(&state, &poster, &seeker)?;
    Ok(())
}

fn print_dashboards(
    state: &ApiHiringState,
    poster: &ActorId,
    seeker: &ActorId,
) -> Result<(), AppError> {
    println!("\nPoster dashboard");
    for view in state.jobs.posted_by(poster)? {
        println!(
            "- {} | {} | {} applicant(s), {} save(s)",
            view.job.title,
            view.job.status.label(),
            view.applicant_count,
            view.saved_count
        );
    }

    println!("\nSeeker dashboard");
    for view in state.applications.applied(seeker)? {
        println!(
            "- {} at {} | application {} | job {}",
            view.title,
            view.company,
            view.status,
            view.job_status.label()
        );
    }
    for view in state.jobs.saved_jobs(seeker)? {
        println!("- Saved: {} ({})", view.title, view.status.label());
    }

    Ok(())
}
