//! In-process `DocumentStore` used for local development and tests.
//!
//! Documents live in a `tokio::sync::RwLock`-guarded map of collections.
//! Each collection is a `Vec` so reads come back in insertion order.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{DocumentStore, DocumentStoreError};
use crate::domain::{CollectionName, Document, DocumentId, Fields};

/// Document store backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<CollectionName, Vec<Document>>>,
}

impl MemoryDocumentStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `documents`, keeping their order per collection.
    pub fn with_documents(documents: impl IntoIterator<Item = (CollectionName, Document)>) -> Self {
        let mut collections: HashMap<CollectionName, Vec<Document>> = HashMap::new();
        for (collection, document) in documents {
            collections.entry(collection).or_default().push(document);
        }
        Self {
            collections: RwLock::new(collections),
        }
    }

    /// Number of documents currently held in `collection`.
    pub async fn len(&self, collection: CollectionName) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn fetch_all(
        &self,
        collection: CollectionName,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let guard = self.collections.read().await;
        Ok(guard.get(&collection).cloned().unwrap_or_default())
    }

    async fn fetch_where(
        &self,
        collection: CollectionName,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|doc| doc.field(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_by_id(
        &self,
        collection: CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(&collection)
            .and_then(|documents| documents.iter().find(|doc| &doc.id == id))
            .cloned())
    }

    async fn insert(
        &self,
        collection: CollectionName,
        fields: Fields,
    ) -> Result<DocumentId, DocumentStoreError> {
        let id = DocumentId::random();
        let mut guard = self.collections.write().await;
        guard
            .entry(collection)
            .or_default()
            .push(Document::new(id.clone(), fields));
        debug!(%collection, document_id = %id, "document inserted");
        Ok(id)
    }

    async fn update(
        &self,
        collection: CollectionName,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        let mut guard = self.collections.write().await;
        let document = guard
            .get_mut(&collection)
            .and_then(|documents| documents.iter_mut().find(|doc| &doc.id == id))
            .ok_or_else(|| DocumentStoreError::missing(collection, id))?;
        document.fields.extend(fields);
        Ok(())
    }

    async fn update_unless_set(
        &self,
        collection: CollectionName,
        id: &DocumentId,
        guard_field: &str,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        let mut guard = self.collections.write().await;
        let document = guard
            .get_mut(&collection)
            .and_then(|documents| documents.iter_mut().find(|doc| &doc.id == id))
            .ok_or_else(|| DocumentStoreError::missing(collection, id))?;
        if document.field(guard_field).is_some_and(|value| !value.is_null()) {
            return Err(DocumentStoreError::guard_set(collection, id, guard_field));
        }
        document.fields.extend(fields);
        Ok(())
    }

    async fn delete(
        &self,
        collection: CollectionName,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError> {
        let mut guard = self.collections.write().await;
        let documents = guard
            .get_mut(&collection)
            .ok_or_else(|| DocumentStoreError::missing(collection, id))?;
        let position = documents
            .iter()
            .position(|doc| &doc.id == id)
            .ok_or_else(|| DocumentStoreError::missing(collection, id))?;
        documents.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().expect("object fields")
    }

    fn doc(id: &str, value: Value) -> Document {
        Document::new(DocumentId::new(id).expect("id"), fields(value))
    }

    #[fixture]
    fn store() -> MemoryDocumentStore {
        MemoryDocumentStore::with_documents([
            (
                CollectionName::Reviews,
                doc("a", json!({ "approved": true, "message": "first" })),
            ),
            (
                CollectionName::Reviews,
                doc("b", json!({ "approved": false, "message": "second" })),
            ),
            (
                CollectionName::Reviews,
                doc("c", json!({ "approved": true, "message": "third" })),
            ),
        ])
    }

    #[rstest]
    #[tokio::test]
    async fn fetch_where_matches_equal_values_in_order(store: MemoryDocumentStore) {
        let approved = store
            .fetch_where(CollectionName::Reviews, "approved", &json!(true))
            .await
            .expect("query");
        let ids: Vec<_> = approved.iter().map(|doc| doc.id.as_ref()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[rstest]
    #[tokio::test]
    async fn update_merges_top_level_fields(store: MemoryDocumentStore) {
        let id = DocumentId::new("b").expect("id");
        store
            .update(
                CollectionName::Reviews,
                &id,
                fields(json!({ "approved": true, "moderation": "approved" })),
            )
            .await
            .expect("update");

        let stored = store
            .fetch_by_id(CollectionName::Reviews, &id)
            .await
            .expect("read")
            .expect("present");
        assert_eq!(stored.field("approved"), Some(&json!(true)));
        assert_eq!(stored.field("message"), Some(&json!("second")));
    }

    #[rstest]
    #[tokio::test]
    async fn update_and_delete_report_missing_documents(store: MemoryDocumentStore) {
        let ghost = DocumentId::new("ghost").expect("id");
        let update = store
            .update(CollectionName::Reviews, &ghost, Fields::new())
            .await;
        let delete = store.delete(CollectionName::Records, &ghost).await;
        let guarded = store
            .update_unless_set(CollectionName::Reviews, &ghost, "decidedAt", Fields::new())
            .await;

        assert!(matches!(update, Err(DocumentStoreError::NotFound { .. })));
        assert!(matches!(guarded, Err(DocumentStoreError::NotFound { .. })));
        assert!(matches!(delete, Err(DocumentStoreError::NotFound { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn guarded_update_applies_once(store: MemoryDocumentStore) {
        let id = DocumentId::new("b").expect("id");
        let first = store
            .update_unless_set(
                CollectionName::Reviews,
                &id,
                "decidedAt",
                fields(json!({ "decidedAt": "2024-05-01T00:00:00Z", "approved": true })),
            )
            .await;
        let second = store
            .update_unless_set(
                CollectionName::Reviews,
                &id,
                "decidedAt",
                fields(json!({ "decidedAt": "2024-05-02T00:00:00Z", "approved": false })),
            )
            .await;

        assert!(first.is_ok());
        assert!(matches!(second, Err(DocumentStoreError::Conflict { .. })));
        let stored = store
            .fetch_by_id(CollectionName::Reviews, &id)
            .await
            .expect("read")
            .expect("present");
        assert_eq!(stored.field("approved"), Some(&json!(true)));
    }

    #[rstest]
    #[tokio::test]
    async fn guarded_update_treats_null_as_unset() {
        let store = MemoryDocumentStore::with_documents([(
            CollectionName::Reviews,
            doc("n", json!({ "decidedAt": null })),
        )]);
        let id = DocumentId::new("n").expect("id");

        store
            .update_unless_set(
                CollectionName::Reviews,
                &id,
                "decidedAt",
                fields(json!({ "decidedAt": "2024-05-01T00:00:00Z" })),
            )
            .await
            .expect("null guard is unset");
    }

    #[rstest]
    #[tokio::test]
    async fn insert_appends_with_fresh_id(store: MemoryDocumentStore) {
        let id = store
            .insert(CollectionName::Reviews, fields(json!({ "message": "fourth" })))
            .await
            .expect("insert");

        let all = store
            .fetch_all(CollectionName::Reviews)
            .await
            .expect("read");
        assert_eq!(all.len(), 4);
        assert_eq!(all.last().map(|doc| &doc.id), Some(&id));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_the_document(store: MemoryDocumentStore) {
        let id = DocumentId::new("a").expect("id");
        store
            .delete(CollectionName::Reviews, &id)
            .await
            .expect("delete");
        assert_eq!(store.len(CollectionName::Reviews).await, 2);
    }
}
