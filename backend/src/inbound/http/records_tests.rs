//! Tests for the record handlers.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::test_fixtures::{doc_id, document};
use crate::domain::{Error, Role, summarise};
use crate::inbound::http::test_utils::{
    MockPorts, identity, session_cookie, sign_in_request, test_session_middleware, test_sign_in,
};

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(ports.into_state())
        .wrap(test_session_middleware())
        .service(test_sign_in)
        .service(
            web::scope("/api/v1")
                .service(list_records)
                .service(get_record)
                .service(submit_project)
                .service(add_customer)
                .service(change_status)
                .service(delete_record),
        )
}

fn record(id: &str, fields: Value) -> Record {
    Record::try_from_document(&document(id, fields)).expect("valid record")
}

fn sample_records() -> Vec<Record> {
    vec![
        record(
            "r1",
            json!({ "name": "Tech Solutions Inc.", "website": "techsolutions.com",
                    "status": "Active", "progress": 40 }),
        ),
        record("r2", json!({ "name": "Creative Studios", "status": "Completed" })),
        record("r3", json!({ "name": "Legacy", "status": "Archived" })),
    ]
}

#[actix_web::test]
async fn overview_forwards_search_and_tab() {
    let mut ports = MockPorts::default();
    ports
        .records
        .expect_overview()
        .withf(|viewer, listing| {
            viewer.is_admin()
                && listing.search == SearchTerm::new("tech")
                && listing.tab == ProjectTab::Active
        })
        .times(1)
        .return_once(|_, listing| {
            let records = sample_records();
            Ok(summarise(&records, &listing.search))
        });
    let app = actix_test::init_service(test_app(ports)).await;
    let login = sign_in_request(&identity("admin-1", Role::Admin)).to_request();
    let cookie = session_cookie(&actix_test::call_service(&app, login).await);

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/records?search=TECH&tab=active")
        .cookie(cookie)
        .to_request();
    let body: RecordOverviewResponse = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body.total_records, 3);
    assert_eq!(body.counts.active, 1);
    assert_eq!(body.counts.completed, 1);
    assert_eq!(body.counts.total, 2);
    assert_eq!(body.records.len(), 1);
    assert_eq!(body.records[0].progress, 40);
}

#[actix_web::test]
async fn anonymous_overview_is_unauthorised() {
    let mut ports = MockPorts::default();
    ports
        .records
        .expect_overview()
        .withf(|viewer, _| viewer.identity().is_none())
        .return_once(|_, _| Err(Error::unauthorized("sign in required")));
    let app = actix_test::init_service(test_app(ports)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/records")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn unknown_statuses_are_passed_through() {
    let mut ports = MockPorts::default();
    ports
        .records
        .expect_get_record()
        .withf(|_, id| id.as_ref() == "r3")
        .return_once(|_, _| Ok(sample_records().remove(2)));
    let app = actix_test::init_service(test_app(ports)).await;
    let login = sign_in_request(&identity("uid-a", Role::User)).to_request();
    let cookie = session_cookie(&actix_test::call_service(&app, login).await);

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/records/r3")
        .cookie(cookie)
        .to_request();
    let body: RecordResponse = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body.status.as_deref(), Some("Archived"));
}

#[actix_web::test]
async fn submit_project_answers_created() {
    let mut ports = MockPorts::default();
    ports
        .records_command
        .expect_submit_project()
        .withf(|viewer, submission| {
            viewer.uid().map(AsRef::as_ref) == Some("uid-a") && submission.name == "Bakery site"
        })
        .times(1)
        .return_once(|_, _| {
            Ok(record(
                "new-1",
                json!({ "name": "Bakery site", "status": "Submitted", "progress": 10,
                        "createdBy": "uid-a" }),
            ))
        });
    let app = actix_test::init_service(test_app(ports)).await;
    let login = sign_in_request(&identity("uid-a", Role::User)).to_request();
    let cookie = session_cookie(&actix_test::call_service(&app, login).await);

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/records")
        .cookie(cookie)
        .set_json(json!({ "name": "Bakery site", "website": "bakery.example" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: RecordResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.id, "new-1");
    assert_eq!(body.created_by.as_deref(), Some("uid-a"));
}

#[rstest]
#[case(json!({ "status": "Completed", "progress": 150 }))]
#[case(json!({ "status": "Archived" }))]
#[case(json!({ "status": "completed" }))]
#[actix_web::test]
async fn invalid_status_changes_never_reach_the_service(#[case] body: Value) {
    let mut ports = MockPorts::default();
    ports.records_command.expect_change_status().times(0);
    let app = actix_test::init_service(test_app(ports)).await;
    let login = sign_in_request(&identity("admin-1", Role::Admin)).to_request();
    let cookie = session_cookie(&actix_test::call_service(&app, login).await);

    let request = actix_test::TestRequest::put()
        .uri("/api/v1/records/r1/status")
        .cookie(cookie)
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn status_change_returns_updated_record() {
    let mut ports = MockPorts::default();
    ports
        .records_command
        .expect_change_status()
        .withf(|_, id, change| {
            *id == doc_id("r1")
                && change.status == StatusBucket::Completed
                && change.progress.map(|p| p.value()) == Some(100)
        })
        .times(1)
        .return_once(|_, _, _| {
            Ok(record(
                "r1",
                json!({ "name": "Tech Solutions Inc.", "status": "Completed", "progress": 100 }),
            ))
        });
    let app = actix_test::init_service(test_app(ports)).await;
    let login = sign_in_request(&identity("admin-1", Role::Admin)).to_request();
    let cookie = session_cookie(&actix_test::call_service(&app, login).await);

    let request = actix_test::TestRequest::put()
        .uri("/api/v1/records/r1/status")
        .cookie(cookie)
        .set_json(json!({ "status": "Completed", "progress": 100 }))
        .to_request();
    let body: RecordResponse = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body.status.as_deref(), Some("Completed"));
    assert_eq!(body.progress, 100);
}

#[rstest]
#[case(Ok(()), StatusCode::NO_CONTENT)]
#[case(Err(Error::forbidden("admin role required")), StatusCode::FORBIDDEN)]
#[case(Err(Error::not_found("record r1 not found")), StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn delete_maps_service_outcome(
    #[case] outcome: Result<(), Error>,
    #[case] expected: StatusCode,
) {
    let mut ports = MockPorts::default();
    ports
        .records_command
        .expect_delete_record()
        .times(1)
        .return_once(move |_, _| outcome);
    let app = actix_test::init_service(test_app(ports)).await;
    let login = sign_in_request(&identity("uid-a", Role::User)).to_request();
    let cookie = session_cookie(&actix_test::call_service(&app, login).await);

    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/records/r1")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), expected);
}

#[actix_web::test]
async fn customer_validation_errors_keep_details() {
    let mut ports = MockPorts::default();
    ports
        .records_command
        .expect_add_customer()
        .return_once(|_, _| {
            Err(Error::invalid_request("email must look like name@domain")
                .with_details(json!({ "field": "email", "code": "invalid" })))
        });
    let app = actix_test::init_service(test_app(ports)).await;
    let login = sign_in_request(&identity("admin-1", Role::Admin)).to_request();
    let cookie = session_cookie(&actix_test::call_service(&app, login).await);

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/customers")
        .cookie(cookie)
        .set_json(json!({ "name": "Health Services", "email": "nope" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["details"]["field"], "email");
}
