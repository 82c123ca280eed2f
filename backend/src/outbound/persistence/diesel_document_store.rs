//! PostgreSQL-backed `DocumentStore` implementation using Diesel ORM.
//!
//! All collections share the `documents` table. Equality queries use JSONB
//! containment (`fields @> {"field": value}`) and merge updates use JSONB
//! concatenation (`fields || patch`), so both run as single statements.
//! Guarded updates add `fields ->> guard IS NULL` to the same statement.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::ports::{DocumentStore, DocumentStoreError};
use crate::domain::{CollectionName, Document, DocumentId, Fields};

use super::models::{DocumentRow, NewDocumentRow};
use super::pool::{DbPool, PoolError};
use super::schema::documents;

/// Diesel-backed implementation of the [`DocumentStore`] port.
#[derive(Clone)]
pub struct DieselDocumentStore {
    pool: DbPool,
}

impl DieselDocumentStore {
    /// Create a store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DocumentStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DocumentStoreError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> DocumentStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DocumentStoreError::connection("database connection error")
        }
        DieselError::DatabaseError(_, info) if is_permission_denied(info.message()) => {
            DocumentStoreError::permission_denied("database refused the operation")
        }
        DieselError::QueryBuilderError(_) => DocumentStoreError::query("database query error"),
        _ => DocumentStoreError::query("database error"),
    }
}

fn is_permission_denied(message: &str) -> bool {
    message.to_lowercase().contains("permission denied")
}

fn row_to_document(row: DocumentRow) -> Result<Document, DocumentStoreError> {
    let id = DocumentId::new(&row.id)
        .map_err(|err| DocumentStoreError::query(format!("stored row id is invalid: {err}")))?;
    match row.fields {
        Value::Object(fields) => Ok(Document::new(id, fields)),
        other => Err(DocumentStoreError::query(format!(
            "document {id} body is not an object: {other}"
        ))),
    }
}

fn rows_to_documents(rows: Vec<DocumentRow>) -> Result<Vec<Document>, DocumentStoreError> {
    rows.into_iter().map(row_to_document).collect()
}

fn containment_filter(field: &str, value: &Value) -> Value {
    let mut filter = Map::new();
    filter.insert(field.to_owned(), value.clone());
    Value::Object(filter)
}

#[async_trait]
impl DocumentStore for DieselDocumentStore {
    async fn fetch_all(
        &self,
        collection: CollectionName,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DocumentRow> = documents::table
            .filter(documents::collection.eq(collection.as_str()))
            .order_by(documents::seq.asc())
            .select(DocumentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_documents(rows)
    }

    async fn fetch_where(
        &self,
        collection: CollectionName,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DocumentRow> = documents::table
            .filter(documents::collection.eq(collection.as_str()))
            .filter(documents::fields.contains(containment_filter(field, value)))
            .order_by(documents::seq.asc())
            .select(DocumentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_documents(rows)
    }

    async fn fetch_by_id(
        &self,
        collection: CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<DocumentRow> = documents::table
            .filter(documents::collection.eq(collection.as_str()))
            .filter(documents::id.eq(id.as_ref()))
            .select(DocumentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_document).transpose()
    }

    async fn insert(
        &self,
        collection: CollectionName,
        fields: Fields,
    ) -> Result<DocumentId, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = DocumentId::random();

        diesel::insert_into(documents::table)
            .values(&NewDocumentRow {
                collection: collection.as_str(),
                id: id.as_ref(),
                fields: Value::Object(fields),
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(id)
    }

    async fn update(
        &self,
        collection: CollectionName,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated_rows = diesel::update(documents::table)
            .filter(documents::collection.eq(collection.as_str()))
            .filter(documents::id.eq(id.as_ref()))
            .set(documents::fields.eq(documents::fields.concat(Value::Object(fields))))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated_rows == 0 {
            return Err(DocumentStoreError::missing(collection, id));
        }
        Ok(())
    }

    async fn update_unless_set(
        &self,
        collection: CollectionName,
        id: &DocumentId,
        guard_field: &str,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated_rows = diesel::update(documents::table)
            .filter(documents::collection.eq(collection.as_str()))
            .filter(documents::id.eq(id.as_ref()))
            .filter(documents::fields.retrieve_as_text(guard_field).is_null())
            .set(documents::fields.eq(documents::fields.concat(Value::Object(fields))))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated_rows > 0 {
            return Ok(());
        }

        let existing: i64 = documents::table
            .filter(documents::collection.eq(collection.as_str()))
            .filter(documents::id.eq(id.as_ref()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if existing == 0 {
            Err(DocumentStoreError::missing(collection, id))
        } else {
            Err(DocumentStoreError::guard_set(collection, id, guard_field))
        }
    }

    async fn delete(
        &self,
        collection: CollectionName,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted_rows = diesel::delete(
            documents::table
                .filter(documents::collection.eq(collection.as_str()))
                .filter(documents::id.eq(id.as_ref())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if deleted_rows == 0 {
            return Err(DocumentStoreError::missing(collection, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the pure mapping helpers; queries need a live database.

    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::json;

    fn row(id: &str, fields: Value) -> DocumentRow {
        DocumentRow {
            id: id.to_owned(),
            fields,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn object_rows_become_documents() {
        let document = row_to_document(row("r1", json!({ "name": "Acme" }))).expect("document");
        assert_eq!(document.id.as_ref(), "r1");
        assert_eq!(document.field("name"), Some(&json!("Acme")));
    }

    #[rstest]
    #[case(row("r1", json!([1, 2])))]
    #[case(row("  ", json!({})))]
    fn malformed_rows_are_query_errors(#[case] input: DocumentRow) {
        let error = row_to_document(input).expect_err("malformed");
        assert!(matches!(error, DocumentStoreError::Query { .. }));
    }

    #[rstest]
    fn containment_filter_wraps_a_single_field() {
        assert_eq!(
            containment_filter("approved", &json!(true)),
            json!({ "approved": true })
        );
    }

    #[rstest]
    fn pool_failures_are_connection_errors() {
        let error = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(error, DocumentStoreError::connection("timed out"));
    }

    #[rstest]
    #[case("permission denied for table documents", true)]
    #[case("duplicate key value", false)]
    fn recognises_permission_failures(#[case] message: &str, #[case] expected: bool) {
        assert_eq!(is_permission_denied(message), expected);
    }
}
