//! Tests for the record service.

use std::sync::{Arc, Mutex};

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::ports::{DocumentStoreError, MockDocumentStore};
use crate::domain::test_fixtures::{
    admin_viewer, doc_id, document, fixture_clock, fixture_timestamp, user_viewer,
};
use crate::domain::{ErrorCode, ProjectTab, RecordStatus, SearchTerm};

fn service(store: MockDocumentStore) -> RecordService<MockDocumentStore> {
    RecordService::new(Arc::new(store), fixture_clock())
}

fn sample_documents() -> Vec<Document> {
    vec![
        document(
            "r1",
            json!({ "name": "Tech Solutions Inc.", "website": "techsolutions.com",
                    "status": "Active", "createdBy": "uid-a" }),
        ),
        document(
            "r2",
            json!({ "name": "Creative Studios", "status": "Completed", "createdBy": "uid-b" }),
        ),
        document("r3", json!({ "name": "Global Retail", "status": "In Progress" })),
    ]
}

#[tokio::test]
async fn admin_overview_counts_all_records_and_filters_by_search() {
    let mut store = MockDocumentStore::new();
    store
        .expect_fetch_all()
        .times(1)
        .return_once(|_| Ok(sample_documents()));
    let listing = RecordListing {
        search: SearchTerm::new("TECH"),
        tab: ProjectTab::All,
    };

    let overview = service(store)
        .overview(&admin_viewer(), &listing)
        .await
        .expect("overview");

    assert_eq!(overview.total, 3);
    assert_eq!(overview.counts.get(StatusBucket::Active), 1);
    assert_eq!(overview.counts.get(StatusBucket::Completed), 1);
    assert_eq!(overview.counts.total(), 2);
    assert_eq!(overview.records.len(), 1);
    assert_eq!(overview.records[0].id.as_ref(), "r1");
}

#[tokio::test]
async fn user_overview_reads_only_their_records() {
    let mut store = MockDocumentStore::new();
    store.expect_fetch_all().times(0);
    store
        .expect_fetch_where()
        .withf(|collection, field, value| {
            *collection == CollectionName::Records && field == "createdBy" && value == "uid-b"
        })
        .times(1)
        .return_once(|_, _, _| Ok(vec![sample_documents().remove(1)]));
    let listing = RecordListing {
        search: SearchTerm::default(),
        tab: ProjectTab::Active,
    };

    let overview = service(store)
        .overview(&user_viewer("uid-b"), &listing)
        .await
        .expect("overview");

    assert_eq!(overview.counts.get(StatusBucket::Completed), 1);
    assert!(overview.records.is_empty(), "completed records leave the active tab");
}

#[tokio::test]
async fn anonymous_overview_is_unauthorised() {
    let error = service(MockDocumentStore::new())
        .overview(&Viewer::Anonymous, &RecordListing::default())
        .await
        .expect_err("anonymous");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn malformed_documents_fail_the_overview() {
    let mut store = MockDocumentStore::new();
    store
        .expect_fetch_all()
        .return_once(|_| Ok(vec![document("bad", json!({ "progress": 250 }))]));

    let error = service(store)
        .overview(&admin_viewer(), &RecordListing::default())
        .await
        .expect_err("malformed");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert!(error.message().contains("bad"));
}

#[rstest]
#[case("uid-a", true)]
#[case("uid-z", false)]
#[tokio::test]
async fn get_record_is_limited_to_owner_and_admin(#[case] uid: &str, #[case] visible: bool) {
    let mut store = MockDocumentStore::new();
    store
        .expect_fetch_by_id()
        .times(1)
        .return_once(|_, _| Ok(Some(sample_documents().remove(0))));

    let result = service(store).get_record(&user_viewer(uid), &doc_id("r1")).await;

    match (visible, result) {
        (true, Ok(record)) => assert_eq!(record.id.as_ref(), "r1"),
        (false, Err(err)) => assert_eq!(err.code(), ErrorCode::NotFound),
        (_, other) => panic!("unexpected result {other:?}"),
    }
}

#[tokio::test]
async fn submit_project_creates_submitted_record_with_history() {
    let captured = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&captured);
    let mut store = MockDocumentStore::new();
    store
        .expect_insert()
        .times(1)
        .returning(move |collection, fields| {
            assert_eq!(collection, CollectionName::Records);
            *sink.lock().expect("lock") = Some(fields);
            Ok(doc_id("new-1"))
        });

    let record = service(store)
        .submit_project(
            &user_viewer("uid-a"),
            ProjectSubmission {
                name: "  Bakery site  ".to_owned(),
                website: Some("   ".to_owned()),
                description: Some("Online orders".to_owned()),
                requirements: None,
            },
        )
        .await
        .expect("submitted");

    assert_eq!(record.id.as_ref(), "new-1");
    assert_eq!(record.name.as_deref(), Some("Bakery site"));
    assert!(record.website.is_none());
    assert_eq!(record.status, RecordStatus::Bucket(StatusBucket::Submitted));
    assert_eq!(record.progress.value(), SUBMITTED_PROGRESS);
    assert_eq!(
        record.history,
        vec![HistoryEntry::new(fixture_timestamp(), "Project information submitted")]
    );
    let fields = captured.lock().expect("lock").take().expect("insert called");
    assert_eq!(fields.get("createdBy"), Some(&json!("uid-a")));
}

#[tokio::test]
async fn submit_project_requires_a_name() {
    let mut store = MockDocumentStore::new();
    store.expect_insert().times(0);

    let error = service(store)
        .submit_project(&user_viewer("uid-a"), ProjectSubmission::default())
        .await
        .expect_err("blank name");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(user_viewer("uid-a"), ErrorCode::Forbidden)]
#[case(Viewer::Anonymous, ErrorCode::Unauthorized)]
#[tokio::test]
async fn add_customer_is_admin_only(#[case] viewer: Viewer, #[case] expected: ErrorCode) {
    let mut store = MockDocumentStore::new();
    store.expect_insert().times(0);
    let entry = CustomerEntry {
        name: "Health Services".to_owned(),
        email: "contact@healthservices.com".to_owned(),
        ..CustomerEntry::default()
    };

    let error = service(store)
        .add_customer(&viewer, entry)
        .await
        .expect_err("not admin");

    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn add_customer_rejects_invalid_email() {
    let entry = CustomerEntry {
        name: "Health Services".to_owned(),
        email: "not-an-email".to_owned(),
        ..CustomerEntry::default()
    };

    let error = service(MockDocumentStore::new())
        .add_customer(&admin_viewer(), entry)
        .await
        .expect_err("invalid email");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn add_customer_stores_active_record() {
    let mut store = MockDocumentStore::new();
    store
        .expect_insert()
        .times(1)
        .return_once(|_, _| Ok(doc_id("cust-1")));
    let entry = CustomerEntry {
        name: "Education Portal".to_owned(),
        email: "Info@EducationPortal.org".to_owned(),
        phone: Some("+44 20 7946 0000".to_owned()),
        website: Some("educationportal.org".to_owned()),
        notes: None,
    };

    let record = service(store)
        .add_customer(&admin_viewer(), entry)
        .await
        .expect("customer added");

    assert_eq!(record.status.bucket(), Some(StatusBucket::Active));
    assert_eq!(record.progress.value(), 0);
    assert_eq!(record.email.as_deref(), Some("info@educationportal.org"));
    assert_eq!(record.history[0].action, "Customer added");
}

#[tokio::test]
async fn change_status_appends_history_and_merges_fields() {
    let mut store = MockDocumentStore::new();
    store
        .expect_fetch_by_id()
        .return_once(|_, _| Ok(Some(sample_documents().remove(0))));
    store
        .expect_update()
        .withf(|collection, id, fields| {
            *collection == CollectionName::Records
                && id.as_ref() == "r1"
                && fields.get("status") == Some(&json!("Completed"))
                && fields.get("progress") == Some(&json!(100))
                && !fields.contains_key("name")
        })
        .times(1)
        .return_once(|_, _, _| Ok(()));

    let record = service(store)
        .change_status(
            &admin_viewer(),
            &doc_id("r1"),
            StatusChange {
                status: StatusBucket::Completed,
                progress: Some(Progress::new(100).expect("progress")),
            },
        )
        .await
        .expect("status changed");

    assert_eq!(record.status.bucket(), Some(StatusBucket::Completed));
    assert_eq!(
        record.history.last().map(|entry| entry.action.as_str()),
        Some("Status changed to Completed")
    );
}

#[tokio::test]
async fn change_status_of_missing_record_is_not_found() {
    let mut store = MockDocumentStore::new();
    store.expect_fetch_by_id().return_once(|_, _| Ok(None));
    store.expect_update().times(0);

    let error = service(store)
        .change_status(
            &admin_viewer(),
            &doc_id("ghost"),
            StatusChange {
                status: StatusBucket::Inactive,
                progress: None,
            },
        )
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(Ok(()), None)]
#[case(Err(DocumentStoreError::not_found("records", "r9")), Some(ErrorCode::NotFound))]
#[case(Err(DocumentStoreError::permission_denied("rules")), Some(ErrorCode::Forbidden))]
#[tokio::test]
async fn delete_record_surfaces_store_outcome(
    #[case] outcome: Result<(), DocumentStoreError>,
    #[case] expected: Option<ErrorCode>,
) {
    let mut store = MockDocumentStore::new();
    store.expect_delete().times(1).return_once(move |_, _| outcome);

    let result = service(store).delete_record(&admin_viewer(), &doc_id("r9")).await;

    assert_eq!(result.err().map(|err| err.code()), expected);
}
