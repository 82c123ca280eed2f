//! Internal Diesel row structs for the documents table.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::documents;

/// Row read from `documents`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DocumentRow {
    pub id: String,
    pub fields: Value,
    #[expect(dead_code, reason = "kept for operators inspecting rows")]
    pub created_at: DateTime<Utc>,
}

/// Insertable document row; `seq` and `created_at` use column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub(crate) struct NewDocumentRow<'a> {
    pub collection: &'a str,
    pub id: &'a str,
    pub fields: Value,
}
