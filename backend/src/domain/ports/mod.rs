//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`AuthProvider`, `DocumentStore`) are implemented by outbound
//! adapters. Driving ports are implemented by domain services and called by
//! the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_provider;
mod broadcasts;
mod document_store;
mod login_service;
mod records_command;
mod records_query;
mod reviews;

#[cfg(test)]
pub use auth_provider::MockAuthProvider;
pub use auth_provider::{
    AuthProvider, AuthProviderError, AuthenticatedAccount, FixtureAccount, FixtureAuthProvider,
};
#[cfg(test)]
pub use broadcasts::{MockBroadcastsCommand, MockBroadcastsQuery};
pub use broadcasts::{BroadcastsCommand, BroadcastsQuery};
#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{DocumentStore, DocumentStoreError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use records_command::MockRecordsCommand;
pub use records_command::{CustomerEntry, ProjectSubmission, RecordsCommand, StatusChange};
#[cfg(test)]
pub use records_query::MockRecordsQuery;
pub use records_query::{RecordListing, RecordsQuery};
#[cfg(test)]
pub use reviews::{MockReviewModeration, MockReviewsCommand, MockReviewsQuery};
pub use reviews::{ReviewModeration, ReviewSubmission, ReviewsCommand, ReviewsQuery};
