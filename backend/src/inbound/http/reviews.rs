//! Review listing, submission and moderation endpoints.
//!
//! ```text
//! GET  /api/v1/reviews
//! POST /api/v1/reviews {"message":"Quick and friendly","rating":4,"scale":"emoji"}
//! GET  /api/v1/admin/reviews/pending
//! POST /api/v1/admin/reviews/{id}/decision {"approved":true}
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ReviewSubmission;
use crate::domain::{Decision, Moderation, RatingScale, Review};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_document_id;

/// A review as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub user_id: String,
    pub author_name: Option<String>,
    pub project_id: Option<String>,
    pub message: String,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: u8,
    #[schema(value_type = String, example = "stars")]
    pub scale: RatingScale,
    /// Face glyph for emoji-scale ratings.
    pub emoji: Option<String>,
    #[schema(value_type = String, example = "pending")]
    pub moderation: Moderation,
    pub created_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decided_by: Option<String>,
}

impl From<&Review> for ReviewResponse {
    fn from(value: &Review) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.user_id.to_string(),
            author_name: value.author_name.clone(),
            project_id: value.project_id.as_ref().map(ToString::to_string),
            message: value.message.clone(),
            rating: value.rating.value(),
            scale: value.rating.scale(),
            emoji: value.rating.emoji().map(str::to_owned),
            moderation: value.moderation,
            created_at: value.created_at,
            decided_at: value.decided_at,
            decided_by: value.decided_by.as_ref().map(ToString::to_string),
        }
    }
}

fn to_responses(reviews: &[Review]) -> Vec<ReviewResponse> {
    reviews.iter().map(ReviewResponse::from).collect()
}

/// Body of `POST /api/v1/reviews`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub project_id: Option<String>,
    #[schema(example = "Quick and friendly")]
    pub message: String,
    #[schema(example = 4)]
    pub rating: i64,
    /// Defaults to `stars`.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "emoji")]
    pub scale: RatingScale,
}

/// Body of `POST /api/v1/admin/reviews/{id}/decision`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    /// `true` approves, `false` rejects.
    pub approved: bool,
}

/// Approved reviews for the public page.
#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    responses(
        (status = 200, description = "Approved reviews", body = [ReviewResponse]),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "listApprovedReviews",
    security([])
)]
#[get("/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    let reviews = state.reviews.list_approved().await?;
    Ok(web::Json(to_responses(&reviews)))
}

/// Submit a review; it stays hidden until an admin approves it.
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review awaiting moderation", body = ReviewResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "submitReview"
)]
#[post("/reviews")]
pub async fn submit_review(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer();
    let ReviewRequest {
        project_id,
        message,
        rating,
        scale,
    } = payload.into_inner();
    let project_id = project_id
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_document_id("projectId", &raw))
        .transpose()?;
    let review = state
        .reviews_command
        .submit_review(
            &viewer,
            ReviewSubmission {
                project_id,
                message,
                rating,
                scale,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(ReviewResponse::from(&review)))
}

/// Reviews awaiting a decision. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/admin/reviews/pending",
    responses(
        (status = 200, description = "Pending reviews", body = [ReviewResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["moderation"],
    operation_id = "listPendingReviews"
)]
#[get("/admin/reviews/pending")]
pub async fn list_pending_reviews(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    let viewer = session.viewer();
    let reviews = state.reviews.list_pending(&viewer).await?;
    Ok(web::Json(to_responses(&reviews)))
}

/// Approve or reject a pending review. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/admin/reviews/{id}/decision",
    params(("id" = String, Path, description = "Review identifier")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decision recorded", body = ReviewResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Already decided", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["moderation"],
    operation_id = "decideReview"
)]
#[post("/admin/reviews/{id}/decision")]
pub async fn decide_review(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<DecisionRequest>,
) -> ApiResult<web::Json<ReviewResponse>> {
    let viewer = session.viewer();
    let id = parse_document_id("id", &path)?;
    let review = state
        .moderation
        .decide(&viewer, &id, Decision::from(payload.approved))
        .await?;
    Ok(web::Json(ReviewResponse::from(&review)))
}
