//! Record dashboard and record management endpoints.
//!
//! ```text
//! GET    /api/v1/records?search=tech&tab=active
//! GET    /api/v1/records/{id}
//! POST   /api/v1/records            {"name":"Bakery site","website":"bakery.example"}
//! POST   /api/v1/customers          {"name":"Health Services","email":"info@health.example"}
//! PUT    /api/v1/records/{id}/status {"status":"Completed","progress":100}
//! DELETE /api/v1/records/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CustomerEntry, ProjectSubmission, RecordListing, StatusChange};
use crate::domain::{
    HistoryEntry, ProjectTab, Record, RecordOverview, SearchTerm, StatusBucket,
    StatusCounts,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_document_id, parse_progress};

/// Tab filter accepted by the record listing.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TabParam {
    #[default]
    All,
    Active,
    Completed,
}

impl From<TabParam> for ProjectTab {
    fn from(value: TabParam) -> Self {
        match value {
            TabParam::All => Self::All,
            TabParam::Active => Self::Active,
            TabParam::Completed => Self::Completed,
        }
    }
}

/// Query string for `GET /api/v1/records`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecordListQuery {
    /// Case-insensitive substring matched against name and website.
    pub search: Option<String>,
    /// "My projects" tab.
    pub tab: Option<TabParam>,
}

impl From<RecordListQuery> for RecordListing {
    fn from(value: RecordListQuery) -> Self {
        Self {
            search: SearchTerm::new(value.search.unwrap_or_default()),
            tab: value.tab.unwrap_or_default().into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub date: DateTime<Utc>,
    pub action: String,
}

impl From<&HistoryEntry> for HistoryEntryResponse {
    fn from(value: &HistoryEntry) -> Self {
        Self {
            date: value.date,
            action: value.action.clone(),
        }
    }
}

/// A record as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub id: String,
    pub name: Option<String>,
    pub website: Option<String>,
    /// Stored status text; unknown values are passed through unchanged.
    #[schema(example = "Active")]
    pub status: Option<String>,
    pub created_by: Option<String>,
    #[schema(minimum = 0, maximum = 100)]
    pub progress: u8,
    pub history: Vec<HistoryEntryResponse>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Record> for RecordResponse {
    fn from(value: &Record) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.clone(),
            website: value.website.clone(),
            status: value.status.as_str().map(str::to_owned),
            created_by: value.created_by.as_ref().map(ToString::to_string),
            progress: value.progress.value(),
            history: value.history.iter().map(HistoryEntryResponse::from).collect(),
            email: value.email.clone(),
            phone: value.phone.clone(),
            description: value.description.clone(),
            requirements: value.requirements.clone(),
            notes: value.notes.clone(),
            created_at: value.created_at,
        }
    }
}

/// Records per status bucket.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCountsResponse {
    pub active: usize,
    pub completed: usize,
    pub inactive: usize,
    pub submitted: usize,
    /// Sum of the four buckets; records with other statuses are excluded.
    pub total: usize,
}

impl From<&StatusCounts> for StatusCountsResponse {
    fn from(value: &StatusCounts) -> Self {
        Self {
            active: value.get(StatusBucket::Active),
            completed: value.get(StatusBucket::Completed),
            inactive: value.get(StatusBucket::Inactive),
            submitted: value.get(StatusBucket::Submitted),
            total: value.total(),
        }
    }
}

/// Dashboard payload.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordOverviewResponse {
    pub counts: StatusCountsResponse,
    /// Number of records visible to the viewer before search and tab filters.
    pub total_records: usize,
    pub records: Vec<RecordResponse>,
}

impl From<&RecordOverview> for RecordOverviewResponse {
    fn from(value: &RecordOverview) -> Self {
        Self {
            counts: StatusCountsResponse::from(&value.counts),
            total_records: value.total,
            records: value.records.iter().map(RecordResponse::from).collect(),
        }
    }
}

/// Body of `POST /api/v1/records`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSubmissionRequest {
    #[schema(example = "Bakery site")]
    pub name: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
}

impl From<ProjectSubmissionRequest> for ProjectSubmission {
    fn from(value: ProjectSubmissionRequest) -> Self {
        Self {
            name: value.name,
            website: value.website,
            description: value.description,
            requirements: value.requirements,
        }
    }
}

/// Body of `POST /api/v1/customers`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    #[schema(example = "Health Services")]
    pub name: String,
    #[schema(example = "contact@healthservices.com")]
    pub email: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}

impl From<CustomerRequest> for CustomerEntry {
    fn from(value: CustomerRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
            website: value.website,
            notes: value.notes,
        }
    }
}

/// Body of `PUT /api/v1/records/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    #[schema(value_type = String, example = "Completed")]
    pub status: StatusBucket,
    #[schema(minimum = 0, maximum = 100)]
    pub progress: Option<i64>,
}

/// Status counts and search results over the records the viewer may see.
#[utoipa::path(
    get,
    path = "/api/v1/records",
    params(RecordListQuery),
    responses(
        (status = 200, description = "Record overview", body = RecordOverviewResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "listRecords"
)]
#[get("/records")]
pub async fn list_records(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<RecordListQuery>,
) -> ApiResult<web::Json<RecordOverviewResponse>> {
    let viewer = session.viewer();
    let listing = RecordListing::from(query.into_inner());
    let overview = state.records.overview(&viewer, &listing).await?;
    Ok(web::Json(RecordOverviewResponse::from(&overview)))
}

/// One record, visible to admins and to its creator.
#[utoipa::path(
    get,
    path = "/api/v1/records/{id}",
    params(("id" = String, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Record", body = RecordResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "getRecord"
)]
#[get("/records/{id}")]
pub async fn get_record(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RecordResponse>> {
    let viewer = session.viewer();
    let id = parse_document_id("id", &path)?;
    let record = state.records.get_record(&viewer, &id).await?;
    Ok(web::Json(RecordResponse::from(&record)))
}

/// Submit a new project for the signed-in user.
#[utoipa::path(
    post,
    path = "/api/v1/records",
    request_body = ProjectSubmissionRequest,
    responses(
        (status = 201, description = "Project submitted", body = RecordResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "submitProject"
)]
#[post("/records")]
pub async fn submit_project(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<ProjectSubmissionRequest>,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer();
    let record = state
        .records_command
        .submit_project(&viewer, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(RecordResponse::from(&record)))
}

/// Add a customer record. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body = CustomerRequest,
    responses(
        (status = 201, description = "Customer added", body = RecordResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "addCustomer"
)]
#[post("/customers")]
pub async fn add_customer(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<CustomerRequest>,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer();
    let record = state
        .records_command
        .add_customer(&viewer, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(RecordResponse::from(&record)))
}

/// Move a record to another status bucket. Admin only.
#[utoipa::path(
    put,
    path = "/api/v1/records/{id}/status",
    params(("id" = String, Path, description = "Record identifier")),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Status changed", body = RecordResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "changeRecordStatus"
)]
#[put("/records/{id}/status")]
pub async fn change_status(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<StatusChangeRequest>,
) -> ApiResult<web::Json<RecordResponse>> {
    let viewer = session.viewer();
    let id = parse_document_id("id", &path)?;
    let StatusChangeRequest { status, progress } = payload.into_inner();
    let change = StatusChange {
        status,
        progress: parse_progress(progress)?,
    };
    let record = state
        .records_command
        .change_status(&viewer, &id, change)
        .await?;
    Ok(web::Json(RecordResponse::from(&record)))
}

/// Delete a record. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/records/{id}",
    params(("id" = String, Path, description = "Record identifier")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "deleteRecord"
)]
#[delete("/records/{id}")]
pub async fn delete_record(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer();
    let id = parse_document_id("id", &path)?;
    state.records_command.delete_record(&viewer, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
