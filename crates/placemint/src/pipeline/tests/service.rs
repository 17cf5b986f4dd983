use super::common::*;
use chrono::Duration;
use std::sync::Arc;

use crate::pipeline::domain::{JobCandidate, JobId, JobPatch, Stage};
use crate::pipeline::lifecycle::ValidationError;
use crate::pipeline::repository::{JobStore, RepositoryError};
use crate::pipeline::service::{require_owner, PipelineError, PipelineService};

#[test]
fn create_assigns_id_and_defaults_to_to_apply() {
    let (service, store, _) = build_service();

    let record = service
        .create_job(&owner("u1"), acme_candidate())
        .expect("job created");

    assert_eq!(record.stage, Stage::ToApply);
    assert_eq!(record.created_at, now());
    assert!(!record.id.0.is_empty());
    let stored = store.fetch(&record.id).expect("fetch").expect("present");
    assert_eq!(stored, record);
}

#[test]
fn create_binds_the_caller_identity_over_body_owner() {
    let (service, _, _) = build_service();
    let candidate = JobCandidate {
        owner_id: Some("someone-else".to_string()),
        ..acme_candidate()
    };

    let record = service
        .create_job(&owner("u1"), candidate)
        .expect("job created");

    assert_eq!(record.owner_id, owner("u1"));
}

#[test]
fn create_propagates_validation_errors() {
    let (service, _, _) = build_service();

    match service.create_job(&owner("u1"), JobCandidate::new("", "SWE Intern")) {
        Err(PipelineError::Validation(ValidationError::EmptyField { field: "company" })) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn list_is_newest_first_and_scoped_to_owner() {
    let (service, _, clock) = build_service();
    let first = service
        .create_job(&owner("u1"), JobCandidate::new("Acme", "SWE Intern"))
        .expect("create");
    clock.advance(Duration::hours(1));
    service
        .create_job(&owner("u2"), JobCandidate::new("Globex", "PM Intern"))
        .expect("create");
    clock.advance(Duration::hours(1));
    let third = service
        .create_job(&owner("u1"), JobCandidate::new("Initech", "QA Intern"))
        .expect("create");

    let listed = service.list_jobs(&owner("u1"), None).expect("list");

    let ids: Vec<&JobId> = listed.iter().map(|record| &record.id).collect();
    assert_eq!(ids, vec![&third.id, &first.id]);
    assert!(listed.iter().all(|record| record.owner_id == owner("u1")));
}

#[test]
fn list_breaks_created_at_ties_by_id() {
    let (service, _, _) = build_service();
    let first = service
        .create_job(&owner("u1"), acme_candidate())
        .expect("create");
    let second = service
        .create_job(&owner("u1"), JobCandidate::new("Globex", "Data Intern"))
        .expect("create");

    let listed = service.list_jobs(&owner("u1"), None).expect("list");

    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

#[test]
fn list_applies_search_filter() {
    let (service, _, _) = build_service();
    service
        .create_job(&owner("u1"), JobCandidate::new("Acme", "Firmware Intern"))
        .expect("create");
    service
        .create_job(&owner("u1"), JobCandidate::new("Globex", "Data Intern"))
        .expect("create");

    let listed = service
        .list_jobs(&owner("u1"), Some("firmware"))
        .expect("list");

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].company, "Acme");
}

#[test]
fn list_drops_foreign_records_returned_by_the_store() {
    let store = Arc::new(UnfilteredStore::default());
    let service = PipelineService::new(store.clone());
    service
        .create_job(&owner("u1"), acme_candidate())
        .expect("create");
    service
        .create_job(&owner("u2"), JobCandidate::new("Globex", "PM Intern"))
        .expect("create");

    let listed = service.list_jobs(&owner("u2"), None).expect("list");

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].owner_id, owner("u2"));
}

#[test]
fn missing_owner_is_rejected_before_touching_the_store() {
    assert!(matches!(require_owner(None), Err(PipelineError::MissingOwner)));
    assert!(matches!(
        require_owner(Some("   ")),
        Err(PipelineError::MissingOwner)
    ));
    assert_eq!(require_owner(Some("u1")).expect("owner"), owner("u1"));
}

#[test]
fn update_transitions_any_stage_for_the_owner() {
    let (service, _, _) = build_service();
    let record = service
        .create_job(&owner("u1"), acme_candidate())
        .expect("create");

    let path = [
        Stage::Rejected,
        Stage::Interviewing,
        Stage::ToApply,
        Stage::Offered,
        Stage::Applied,
    ];
    for stage in path {
        let updated = service
            .update_job_stage(&owner("u1"), &record.id, JobPatch::stage(stage))
            .expect("transition allowed");
        assert_eq!(updated.stage, stage);
        assert_eq!(updated.id, record.id);
        assert_eq!(updated.created_at, record.created_at);
    }
}

#[test]
fn update_of_foreign_record_is_forbidden_and_leaves_it_untouched() {
    let (service, store, _) = build_service();
    let record = service
        .create_job(&owner("u1"), acme_candidate())
        .expect("create");

    match service.update_job_stage(&owner("u2"), &record.id, JobPatch::stage(Stage::Rejected)) {
        Err(PipelineError::Forbidden { id }) => assert_eq!(id, record.id),
        other => panic!("expected forbidden, got {other:?}"),
    }

    let stored = store.fetch(&record.id).expect("fetch").expect("present");
    assert_eq!(stored.stage, Stage::ToApply);
}

#[test]
fn update_of_missing_record_is_not_found() {
    let (service, _, _) = build_service();
    let missing = JobId("job-404".to_string());

    match service.update_job_stage(&owner("u1"), &missing, JobPatch::stage(Stage::Applied)) {
        Err(PipelineError::NotFound { id }) => assert_eq!(id, missing),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn update_merges_onto_the_latest_stored_version() {
    let store = Arc::new(InterleavingStore::new("recruiter replied"));
    let service = PipelineService::new(store.clone());
    let record = service
        .create_job(&owner("u1"), acme_candidate())
        .expect("create");

    let updated = service
        .update_job_stage(&owner("u1"), &record.id, JobPatch::stage(Stage::Offered))
        .expect("update");

    assert_eq!(updated.stage, Stage::Offered);
    assert_eq!(updated.notes, "recruiter replied");
    let stored = store.fetch(&record.id).expect("fetch").expect("present");
    assert_eq!(stored.notes, "recruiter replied");
    assert_eq!(stored.stage, Stage::Offered);
}

#[test]
fn update_of_foreign_record_inside_the_store_is_forbidden() {
    let store = Arc::new(InterleavingStore::new("edited by u1"));
    let service = PipelineService::new(store.clone());
    let record = service
        .create_job(&owner("u1"), acme_candidate())
        .expect("create");

    let outcome =
        service.update_job_stage(&owner("u2"), &record.id, JobPatch::stage(Stage::Rejected));

    assert!(matches!(outcome, Err(PipelineError::Forbidden { .. })));
    let stored = store.fetch(&record.id).expect("fetch").expect("present");
    assert_eq!(stored.stage, Stage::ToApply);
}

#[test]
fn update_rejects_identity_changes() {
    let (service, _, _) = build_service();
    let record = service
        .create_job(&owner("u1"), acme_candidate())
        .expect("create");
    let patch = JobPatch {
        owner_id: Some("u2".to_string()),
        ..JobPatch::default()
    };

    match service.update_job_stage(&owner("u1"), &record.id, patch) {
        Err(PipelineError::Validation(ValidationError::ImmutableField { field: "ownerId" })) => {}
        other => panic!("expected immutable owner, got {other:?}"),
    }
}

#[test]
fn delete_by_non_owner_is_forbidden_and_record_survives() {
    let (service, _, _) = build_service();
    let record = service
        .create_job(&owner("u1"), acme_candidate())
        .expect("create");

    match service.delete_job(&owner("u2"), &record.id) {
        Err(PipelineError::Forbidden { .. }) => {}
        other => panic!("expected forbidden, got {other:?}"),
    }

    let remaining = service.list_jobs(&owner("u1"), None).expect("list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, record.id);
}

#[test]
fn delete_removes_the_record_once() {
    let (service, store, _) = build_service();
    let record = service
        .create_job(&owner("u1"), acme_candidate())
        .expect("create");

    let deletion = service
        .delete_job(&owner("u1"), &record.id)
        .expect("delete");
    assert_eq!(deletion.message, "Deleted");
    assert_eq!(deletion.id, record.id);
    assert!(store.fetch(&record.id).expect("fetch").is_none());

    match service.delete_job(&owner("u1"), &record.id) {
        Err(PipelineError::NotFound { .. }) => {}
        other => panic!("second delete must not succeed, got {other:?}"),
    }
}

#[test]
fn offered_scenario_produces_full_success_rate() {
    let (service, _, _) = build_service();
    let record = service
        .create_job(&owner("u1"), acme_candidate())
        .expect("create");
    assert_eq!(record.stage, Stage::ToApply);

    let offered = service
        .update_job_stage(&owner("u1"), &record.id, JobPatch::stage(Stage::Offered))
        .expect("update");
    assert_eq!(offered.stage, Stage::Offered);

    let stats = service.job_stats(&owner("u1")).expect("stats");
    assert_eq!(stats.total, 1);
    assert_eq!(stats.offer_count, 1);
    assert_eq!(stats.interview_count, 0);
    assert_eq!(stats.success_rate, 100.0);
}

#[test]
fn stats_for_an_owner_without_jobs_are_zero() {
    let (service, _, _) = build_service();
    service
        .create_job(&owner("u1"), acme_candidate())
        .expect("create");

    let stats = service.job_stats(&owner("u2")).expect("stats");

    assert_eq!(stats.total, 0);
    assert_eq!(stats.success_rate, 0.0);
}

#[test]
fn board_groups_owner_jobs_by_stage() {
    let (service, _, _) = build_service();
    let record = service
        .create_job(&owner("u1"), acme_candidate())
        .expect("create");
    service
        .update_job_stage(&owner("u1"), &record.id, JobPatch::stage(Stage::Interviewing))
        .expect("update");
    service
        .create_job(&owner("u1"), JobCandidate::new("Globex", "Data Intern"))
        .expect("create");

    let columns = service.job_board(&owner("u1"), None).expect("board");

    assert_eq!(columns.len(), 5);
    assert_eq!(columns[0].jobs.len(), 1);
    assert_eq!(columns[2].jobs.len(), 1);
    assert_eq!(columns[2].jobs[0].job.id, record.id);
}

#[test]
fn store_outages_are_transient() {
    let service = PipelineService::new(Arc::new(UnavailableStore));

    let error = service
        .list_jobs(&owner("u1"), None)
        .expect_err("store offline");

    assert!(matches!(
        error,
        PipelineError::Store(RepositoryError::Unavailable(_))
    ));
    assert!(error.is_transient());
    assert!(!PipelineError::MissingOwner.is_transient());
}
