//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: document stores (in-memory and PostgreSQL via Diesel)
//! - **identity**: password sign-in and reset through Identity Toolkit
//!
//! Adapters translate between domain types and infrastructure payloads and
//! hold no business rules.

pub mod identity;
pub mod persistence;
