//! OpenAPI document for the tracker API.
//!
//! Served by Swagger UI in debug builds and written out by the
//! `openapi-dump` binary. Domain types are described through the wrappers in
//! [`crate::inbound::http::schemas`].

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::auth::{
    IdentityResponse, LoginRequest, PasswordResetRequest, SessionResponse,
};
use crate::inbound::http::broadcasts::{BroadcastRequest, BroadcastResponse};
use crate::inbound::http::records::{
    CustomerRequest, HistoryEntryResponse, ProjectSubmissionRequest, RecordOverviewResponse,
    RecordResponse, StatusChangeRequest, StatusCountsResponse, TabParam,
};
use crate::inbound::http::reviews::{DecisionRequest, ReviewRequest, ReviewResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for every `/api/v1` route plus the health probes.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Project tracker API",
        description = "Customer and project records, moderated reviews and admin broadcasts.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::request_password_reset,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::records::list_records,
        crate::inbound::http::records::get_record,
        crate::inbound::http::records::submit_project,
        crate::inbound::http::records::add_customer,
        crate::inbound::http::records::change_status,
        crate::inbound::http::records::delete_record,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::submit_review,
        crate::inbound::http::reviews::list_pending_reviews,
        crate::inbound::http::reviews::decide_review,
        crate::inbound::http::broadcasts::list_broadcasts,
        crate::inbound::http::broadcasts::publish_broadcast,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        PasswordResetRequest,
        IdentityResponse,
        SessionResponse,
        TabParam,
        HistoryEntryResponse,
        RecordResponse,
        StatusCountsResponse,
        RecordOverviewResponse,
        ProjectSubmissionRequest,
        CustomerRequest,
        StatusChangeRequest,
        ReviewResponse,
        ReviewRequest,
        DecisionRequest,
        BroadcastResponse,
        BroadcastRequest,
    )),
    tags(
        (name = "auth", description = "Sign-in, sign-out and password reset"),
        (name = "records", description = "Customer and project records"),
        (name = "reviews", description = "Public reviews and review submission"),
        (name = "moderation", description = "Admin review moderation"),
        (name = "broadcasts", description = "Admin announcements"),
        (name = "health", description = "Readiness and liveness probes")
    )
)]
pub struct ApiDoc;
