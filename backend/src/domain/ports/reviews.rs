//! Driving ports for reviews: listing, submission and moderation.

use async_trait::async_trait;

use crate::domain::{Decision, DocumentId, Error, RatingScale, Review, Viewer};

/// A review as typed by a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSubmission {
    pub project_id: Option<DocumentId>,
    pub message: String,
    pub rating: i64,
    pub scale: RatingScale,
}

/// Driving port for review reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewsQuery: Send + Sync {
    /// Approved reviews, for the public page.
    async fn list_approved(&self) -> Result<Vec<Review>, Error>;

    /// Reviews awaiting a decision. Admin only.
    async fn list_pending(&self, viewer: &Viewer) -> Result<Vec<Review>, Error>;
}

/// Driving port for submitting reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewsCommand: Send + Sync {
    /// Store a new pending review authored by the viewer.
    async fn submit_review(
        &self,
        viewer: &Viewer,
        submission: ReviewSubmission,
    ) -> Result<Review, Error>;
}

/// Driving port for the moderation decision.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewModeration: Send + Sync {
    /// Approve or reject a pending review. Admin only.
    ///
    /// Fails with `not_found` for unknown reviews and `conflict` for reviews
    /// that were already decided. A failed write is reported once.
    async fn decide(
        &self,
        viewer: &Viewer,
        id: &DocumentId,
        decision: Decision,
    ) -> Result<Review, Error>;
}
