//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities for records, reviews, broadcasts
//! and the signed-in viewer, plus the services implementing the driving
//! ports. Nothing in here depends on actix, Diesel or reqwest; adapters live
//! under `inbound` and `outbound`.
//!
//! Public surface:
//! - `Error`/`ErrorCode`: transport-agnostic use-case failures.
//! - `Viewer`: the per-request identity context threaded into every call.
//! - `Record`, `Review`, `Broadcast`: validated documents.
//! - `summarise`, `StatusCounts`, `SearchTerm`: the dashboard aggregation.
//! - `PendingReviews`: caller-held moderation working set.

pub mod aggregation;
pub mod auth;
pub mod broadcast;
pub mod broadcast_service;
pub mod document;
pub mod error;
pub mod login_service;
pub mod pending_reviews;
pub mod ports;
pub mod record;
pub mod record_service;
pub mod review;
pub mod review_service;
mod store_errors;
#[cfg(test)]
pub(crate) mod test_fixtures;
pub mod trace_id;
pub mod user;
pub mod viewer;

pub use self::aggregation::{
    ProjectTab, RecordOverview, RecordScope, SearchTerm, StatusCounts, filter_records, summarise,
};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::broadcast::{
    BROADCAST_MESSAGE_MAX, Broadcast, BroadcastDraft, BroadcastMessage, BroadcastValidationError,
    newest_first,
};
pub use self::broadcast_service::BroadcastService;
pub use self::document::{CollectionName, Document, DocumentId, EmptyDocumentId, Fields};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::login_service::AccountLoginService;
pub use self::pending_reviews::PendingReviews;
pub use self::record::{
    HistoryEntry, PROGRESS_MAX, Progress, Record, RecordDraft, RecordStatus,
    RecordValidationError, StatusBucket, StatusUpdate,
};
pub use self::record_service::RecordService;
pub use self::review::{
    Decision, Moderation, ModerationChange, ModerationError, REVIEW_MESSAGE_MAX, Rating,
    RatingScale, Review, ReviewDraft, ReviewValidationError,
};
pub use self::review_service::ReviewService;
pub use self::trace_id::TraceId;
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EmailAddress, Identity, Role, USER_ID_MAX, UserId,
    UserValidationError,
};
pub use self::viewer::{NavLink, Viewer, ViewerRole, navigation_links};
