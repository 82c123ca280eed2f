//! In-process tracker application for HTTP integration tests.
//!
//! Wires the real services over `MemoryDocumentStore` and a fixture auth
//! provider holding one admin and two regular users.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use mockable::{Clock, DefaultClock};
use serde_json::json;

use tracker::Trace;
use tracker::domain::ports::{FixtureAccount, FixtureAuthProvider};
use tracker::domain::{
    AccountLoginService, BroadcastService, CollectionName, DisplayName, Document, DocumentId,
    EmailAddress, RecordService, ReviewService, UserId,
};
use tracker::inbound::http::{auth, broadcasts, records, reviews, state::HttpState};
use tracker::outbound::persistence::MemoryDocumentStore;

pub const PASSWORD: &str = "correct horse";
pub const ADMIN: &str = "admin@tracker.test";
pub const ALICE: &str = "alice@tracker.test";
pub const BOB: &str = "bob@tracker.test";

const ACCOUNTS: [(&str, &str, &str, &str); 3] = [
    ("admin-1", ADMIN, "Ada Admin", "admin"),
    ("user-alice", ALICE, "Alice", "user"),
    ("user-bob", BOB, "Bob", "user"),
];

/// Running application state plus the backing store for assertions.
pub struct Harness {
    pub store: Arc<MemoryDocumentStore>,
    pub state: web::Data<HttpState>,
}

pub fn harness() -> Harness {
    let profiles = ACCOUNTS.iter().map(|(uid, _, name, role)| {
        let fields = json!({ "name": name, "role": role })
            .as_object()
            .cloned()
            .expect("profile object");
        (
            CollectionName::Users,
            Document::new(DocumentId::new(uid).expect("profile id"), fields),
        )
    });
    let store = Arc::new(MemoryDocumentStore::with_documents(profiles));
    let accounts = ACCOUNTS
        .iter()
        .map(|(uid, email, name, _)| FixtureAccount {
            uid: UserId::new(*uid).expect("uid"),
            email: EmailAddress::new(email).expect("email"),
            password: PASSWORD.to_owned(),
            display_name: Some(DisplayName::new(name).expect("name")),
        })
        .collect();
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = HttpState::from_services(
        Arc::new(AccountLoginService::new(
            Arc::new(FixtureAuthProvider::new(accounts)),
            store.clone(),
        )),
        Arc::new(RecordService::new(store.clone(), clock.clone())),
        Arc::new(ReviewService::new(store.clone(), clock.clone())),
        Arc::new(BroadcastService::new(store.clone(), clock)),
    );
    Harness {
        store,
        state: web::Data::new(state),
    }
}

pub fn app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build();
    App::new().app_data(state).wrap(Trace).service(
        web::scope("/api/v1")
            .wrap(session)
            .service(auth::login)
            .service(auth::logout)
            .service(auth::request_password_reset)
            .service(auth::current_session)
            .service(records::list_records)
            .service(records::get_record)
            .service(records::submit_project)
            .service(records::add_customer)
            .service(records::change_status)
            .service(records::delete_record)
            .service(reviews::list_reviews)
            .service(reviews::submit_review)
            .service(reviews::list_pending_reviews)
            .service(reviews::decide_review)
            .service(broadcasts::list_broadcasts)
            .service(broadcasts::publish_broadcast),
    )
}

pub fn login_request(email: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": email, "password": PASSWORD }))
}

/// Session cookie set by a login response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}
