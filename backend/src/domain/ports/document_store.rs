//! Driven port for the collection-oriented document store.
//!
//! The store holds JSON documents grouped into named collections. Adapters
//! own connection handling and query translation; callers see documents and
//! the error taxonomy below.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{CollectionName, Document, DocumentId, Fields};

use super::define_port_error;

define_port_error! {
    /// Errors raised by document store adapters.
    pub enum DocumentStoreError {
        /// The store could not be reached.
        Connection { message: String } => "document store connection failed: {message}",
        /// A read or write failed while executing.
        Query { message: String } => "document store query failed: {message}",
        /// The store refused the operation.
        PermissionDenied { message: String } =>
            "document store denied the request: {message}",
        /// The referenced document does not exist.
        NotFound { collection: String, id: String } => "{collection}/{id} not found",
        /// A guarded write found the guard field already set.
        Conflict { collection: String, id: String, field: String } =>
            "{collection}/{id} already has {field} set",
    }
}

/// Port for reading and writing documents.
///
/// Reads return documents in insertion order. `update` merges the given
/// top-level fields into the stored document; `update`, `update_unless_set`
/// and `delete` report [`DocumentStoreError::NotFound`] when the document is
/// absent.
/// `update_unless_set` checks its guard and merges in one atomic step.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in `collection`.
    async fn fetch_all(&self, collection: CollectionName)
    -> Result<Vec<Document>, DocumentStoreError>;

    /// Documents whose top-level `field` equals `value`.
    async fn fetch_where(
        &self,
        collection: CollectionName,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, DocumentStoreError>;

    /// One document by identifier.
    async fn fetch_by_id(
        &self,
        collection: CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError>;

    /// Store a new document and return its assigned identifier.
    async fn insert(
        &self,
        collection: CollectionName,
        fields: Fields,
    ) -> Result<DocumentId, DocumentStoreError>;

    /// Merge `fields` into an existing document.
    async fn update(
        &self,
        collection: CollectionName,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError>;

    /// Merge `fields` only while `guard_field` is absent or null.
    ///
    /// Reports [`DocumentStoreError::Conflict`] when the guard is already
    /// set, leaving the document untouched.
    async fn update_unless_set(
        &self,
        collection: CollectionName,
        id: &DocumentId,
        guard_field: &str,
        fields: Fields,
    ) -> Result<(), DocumentStoreError>;

    /// Remove a document.
    async fn delete(
        &self,
        collection: CollectionName,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError>;
}

impl DocumentStoreError {
    /// Shorthand for a missing document in `collection`.
    pub fn missing(collection: CollectionName, id: &DocumentId) -> Self {
        Self::not_found(collection.as_str(), id.as_ref())
    }

    /// Shorthand for a guarded write that lost to an earlier one.
    pub fn guard_set(collection: CollectionName, id: &DocumentId, field: &str) -> Self {
        Self::conflict(collection.as_str(), id.as_ref(), field)
    }
}
