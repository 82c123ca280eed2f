//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, post, test as actix_test, web};

use crate::domain::ports::{
    MockBroadcastsCommand, MockBroadcastsQuery, MockLoginService, MockRecordsCommand,
    MockRecordsQuery, MockReviewModeration, MockReviewsCommand, MockReviewsQuery,
};
use crate::domain::{DisplayName, EmailAddress, Identity, Role, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// One mock per driving port; set expectations, then call [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub records: MockRecordsQuery,
    pub records_command: MockRecordsCommand,
    pub reviews: MockReviewsQuery,
    pub reviews_command: MockReviewsCommand,
    pub moderation: MockReviewModeration,
    pub broadcasts: MockBroadcastsQuery,
    pub broadcasts_command: MockBroadcastsCommand,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            login: Arc::new(self.login),
            records: Arc::new(self.records),
            records_command: Arc::new(self.records_command),
            reviews: Arc::new(self.reviews),
            reviews_command: Arc::new(self.reviews_command),
            moderation: Arc::new(self.moderation),
            broadcasts: Arc::new(self.broadcasts),
            broadcasts_command: Arc::new(self.broadcasts_command),
        })
    }
}

/// Session middleware with a fresh key and the `Secure` flag off for plain HTTP.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set on `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Identity with predictable name and e-mail derived from `uid`.
pub fn identity(uid: &str, role: Role) -> Identity {
    Identity::new(
        UserId::new(uid).expect("fixture uid"),
        DisplayName::new(format!("User {uid}")).expect("fixture name"),
        EmailAddress::new(format!("{uid}@example.com")).expect("fixture email"),
        role,
    )
}

/// Stores the posted identity in the session, skipping the login flow.
#[post("/test/sign-in")]
pub async fn test_sign_in(
    session: SessionContext,
    identity: web::Json<Identity>,
) -> ApiResult<HttpResponse> {
    session.persist_identity(&identity)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Request for [`test_sign_in`]; mount the handler at the app root.
pub fn sign_in_request(identity: &Identity) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/test/sign-in")
        .set_json(identity)
}
