use super::common::*;

use std::sync::Arc;

use crate::hiring::applications::domain::ApplicationId;
use crate::hiring::artifacts::ArtifactAccessService;
use crate::hiring::authz::Action;
use crate::hiring::error::HiringError;

#[test]
fn poster_and_applicant_both_get_resume_links() {
    let harness = harness();
    let job = harness.jobs.create(&poster(), draft()).expect("job posted");
    let application = submit_application(&harness, &seeker(), &job.id, Vec::new());

    let poster_link = harness
        .artifacts
        .resume_link(&poster(), &application.id)
        .expect("poster link");
    let applicant_link = harness
        .artifacts
        .resume_link(&seeker(), &application.id)
        .expect("applicant link");

    assert!(poster_link.url.contains(&application.resume.0));
    assert!(applicant_link.url.contains(&application.resume.0));
}

#[test]
fn strangers_are_denied_resume_access() {
    let harness = harness();
    let job = harness.jobs.create(&poster(), draft()).expect("job posted");
    let application = submit_application(&harness, &seeker(), &job.id, Vec::new());

    assert!(matches!(
        harness.artifacts.resume_link(&other_seeker(), &application.id),
        Err(HiringError::Denied(Action::ViewApplicantList))
    ));
}

#[test]
fn every_request_signs_a_fresh_url() {
    let harness = harness();
    let job = harness.jobs.create(&poster(), draft()).expect("job posted");
    let application = submit_application(&harness, &seeker(), &job.id, Vec::new());

    let first = harness
        .artifacts
        .resume_link(&poster(), &application.id)
        .expect("first link");
    let second = harness
        .artifacts
        .resume_link(&poster(), &application.id)
        .expect("second link");

    assert_ne!(first.url, second.url, "links are never cached or reissued");
}

#[test]
fn configured_ttl_is_passed_to_the_blob_store() {
    let harness = harness();
    let job = harness.jobs.create(&poster(), draft()).expect("job posted");
    let application = submit_application(&harness, &seeker(), &job.id, Vec::new());

    harness
        .artifacts
        .resume_link(&poster(), &application.id)
        .expect("link");
    assert_eq!(harness.blob.last_ttl(), u64::from(TEST_LINK_TTL));

    let short_lived = ArtifactAccessService::new(
        harness.job_store.clone(),
        harness.application_store.clone(),
        harness.blob.clone(),
        5,
    );
    short_lived
        .resume_link(&poster(), &application.id)
        .expect("short link");
    assert_eq!(harness.blob.last_ttl(), 5);
}

#[test]
fn missing_application_is_not_found() {
    let harness = harness();
    assert!(matches!(
        harness
            .artifacts
            .resume_link(&poster(), &ApplicationId("app-missing".to_string())),
        Err(HiringError::NotFound("application"))
    ));
}

#[test]
fn blob_outage_surfaces_as_dependency_failure() {
    let harness = harness();
    let job = harness.jobs.create(&poster(), draft()).expect("job posted");
    let application = submit_application(&harness, &seeker(), &job.id, Vec::new());

    let artifacts = ArtifactAccessService::new(
        harness.job_store.clone(),
        harness.application_store.clone(),
        Arc::new(FailingBlob),
        TEST_LINK_TTL,
    );
    assert!(matches!(
        artifacts.resume_link(&poster(), &application.id),
        Err(HiringError::Dependency(_))
    ));
}
