//! Translation of document store failures into domain errors.

use crate::domain::Error;
use crate::domain::ports::DocumentStoreError;

/// Map a store failure onto the matching [`Error`] code.
///
/// Connection failures become `service_unavailable`, permission failures
/// `forbidden`, missing documents `not_found`, lost guarded writes
/// `conflict`; anything else is internal.
pub(crate) fn map_store_error(error: DocumentStoreError) -> Error {
    match error {
        DocumentStoreError::Connection { message } => {
            Error::service_unavailable(format!("document store unavailable: {message}"))
        }
        DocumentStoreError::Query { message } => {
            Error::internal(format!("document store error: {message}"))
        }
        DocumentStoreError::PermissionDenied { message } => {
            Error::forbidden(format!("document store denied the request: {message}"))
        }
        DocumentStoreError::NotFound { collection, id } => {
            Error::not_found(format!("{collection}/{id} not found"))
        }
        DocumentStoreError::Conflict { collection, id, .. } => {
            Error::conflict(format!("{collection}/{id} was changed concurrently"))
        }
    }
}
