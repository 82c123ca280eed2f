//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `invalid_request` error whose `details` name the
//! offending field and a stable machine-readable code.

use serde_json::json;

use crate::domain::{DocumentId, Error, Progress};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    EmptyId,
    OutOfRange,
    InvalidEmail,
    InvalidMessage,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::EmptyId => "empty_id",
            Self::OutOfRange => "out_of_range",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidMessage => "invalid_message",
        }
    }
}

/// `invalid_request` carrying `{"field": .., "code": ..}` details.
pub(crate) fn field_error(field: &str, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

/// Parse a path segment into a [`DocumentId`].
pub(crate) fn parse_document_id(field: &str, raw: &str) -> Result<DocumentId, Error> {
    DocumentId::new(raw).map_err(|err| field_error(field, ValidationCode::EmptyId, err.to_string()))
}

/// Parse an optional progress percentage.
pub(crate) fn parse_progress(raw: Option<i64>) -> Result<Option<Progress>, Error> {
    raw.map(Progress::new)
        .transpose()
        .map_err(|err| field_error("progress", ValidationCode::OutOfRange, err.to_string()))
}
