//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Every collection's documents in one table.
    ///
    /// `(collection, id)` is the primary key. `seq` preserves insertion order
    /// for reads; `fields` holds the document body as a JSON object.
    documents (collection, id) {
        /// Collection name, e.g. `records` or `reviews`.
        collection -> Varchar,
        /// Document identifier, unique within its collection.
        id -> Varchar,
        /// Monotonic insertion sequence.
        seq -> Int8,
        /// Document body.
        fields -> Jsonb,
        /// Insertion timestamp.
        created_at -> Timestamptz,
    }
}
