//! Document store adapters.
//!
//! `MemoryDocumentStore` keeps documents in process memory for development
//! and tests. `DieselDocumentStore` persists them in PostgreSQL through
//! `diesel-async` with a `bb8` pool; its row structs and schema stay private
//! to this module.

mod diesel_document_store;
mod memory_document_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_document_store::DieselDocumentStore;
pub use memory_document_store::MemoryDocumentStore;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
