//! OpenAPI schemas for domain types that stay free of utoipa derives.
//!
//! Each wrapper mirrors its domain counterpart and registers under the domain
//! type's path via `#[schema(as = ...)]`.

use utoipa::ToSchema;

/// Stable machine-readable error codes.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    /// The resource changed state already, e.g. a review that was decided.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store or the auth provider could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Error envelope returned by every failing endpoint.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
#[expect(dead_code, reason = "only read by utoipa when generating the schema")]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "email must look like name@domain")]
    message: String,
    /// Matches the `trace-id` response header.
    #[schema(example = "8f0e2b9e-4a0c-4d7e-9b8e-1c2d3e4f5a6b")]
    trace_id: Option<String>,
    /// Field-level context such as `{"field":"email","code":"invalid_email"}`.
    details: Option<serde_json::Value>,
}
