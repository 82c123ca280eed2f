//! Project tracker backend library.
//!
//! Hexagonal layout: `domain` holds the records, reviews, broadcasts and
//! viewer model plus its ports; `inbound` adapts HTTP onto the driving
//! ports; `outbound` implements the driven ports over PostgreSQL, process
//! memory and the Identity Toolkit.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
