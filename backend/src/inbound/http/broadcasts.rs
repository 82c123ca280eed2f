//! Broadcast feed and composer endpoints.
//!
//! ```text
//! GET  /api/v1/broadcasts
//! POST /api/v1/admin/broadcasts {"message":"Maintenance at 18:00"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Broadcast, BroadcastMessage};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ValidationCode, field_error};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResponse {
    pub id: String,
    pub author_id: String,
    pub author_name: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Broadcast> for BroadcastResponse {
    fn from(value: &Broadcast) -> Self {
        Self {
            id: value.id.to_string(),
            author_id: value.author_id.to_string(),
            author_name: value.author_name.clone(),
            message: value.message.clone(),
            created_at: value.created_at,
        }
    }
}

/// Body of `POST /api/v1/admin/broadcasts`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRequest {
    #[schema(max_length = 500, example = "Maintenance tonight at 18:00")]
    pub message: String,
}

/// Broadcasts for signed-in users, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/broadcasts",
    responses(
        (status = 200, description = "Broadcasts", body = [BroadcastResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["broadcasts"],
    operation_id = "listBroadcasts"
)]
#[get("/broadcasts")]
pub async fn list_broadcasts(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<BroadcastResponse>>> {
    let viewer = session.viewer();
    let broadcasts = state.broadcasts.list(&viewer).await?;
    Ok(web::Json(
        broadcasts.iter().map(BroadcastResponse::from).collect(),
    ))
}

/// Publish a broadcast to every user. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/admin/broadcasts",
    request_body = BroadcastRequest,
    responses(
        (status = 201, description = "Broadcast published", body = BroadcastResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["broadcasts"],
    operation_id = "publishBroadcast"
)]
#[post("/admin/broadcasts")]
pub async fn publish_broadcast(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<BroadcastRequest>,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer();
    let message = BroadcastMessage::new(&payload.message).map_err(|err| {
        field_error("message", ValidationCode::InvalidMessage, err.to_string())
    })?;
    let broadcast = state.broadcasts_command.publish(&viewer, message).await?;
    Ok(HttpResponse::Created().json(BroadcastResponse::from(&broadcast)))
}
