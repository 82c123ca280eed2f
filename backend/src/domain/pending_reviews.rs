//! Caller-held working set of reviews awaiting moderation.
//!
//! The set only changes after the store confirms a decision: a failed write
//! leaves the review in place so the operator can retry.

use tracing::debug;

use crate::domain::ports::{ReviewModeration, ReviewsQuery};
use crate::domain::{Decision, DocumentId, Error, Review, Viewer};

/// Pending reviews as last fetched, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingReviews {
    reviews: Vec<Review>,
}

impl PendingReviews {
    /// Build a working set, keeping only reviews that are still pending.
    pub fn new(reviews: Vec<Review>) -> Self {
        Self {
            reviews: reviews.into_iter().filter(Review::is_pending).collect(),
        }
    }

    /// Fetch the current pending reviews.
    pub async fn load<Q>(query: &Q, viewer: &Viewer) -> Result<Self, Error>
    where
        Q: ReviewsQuery + ?Sized,
    {
        query.list_pending(viewer).await.map(Self::new)
    }

    /// Replace the set with a fresh fetch. On failure the set is unchanged.
    pub async fn refresh<Q>(&mut self, query: &Q, viewer: &Viewer) -> Result<(), Error>
    where
        Q: ReviewsQuery + ?Sized,
    {
        *self = Self::load(query, viewer).await?;
        Ok(())
    }

    /// Reviews in the set.
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Whether `id` is in the set.
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.reviews.iter().any(|review| &review.id == id)
    }

    /// Number of pending reviews held.
    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// Approve (`true`) or reject (`false`) a review through `moderation`.
    ///
    /// The review leaves the set only when the decision was persisted; any
    /// error is returned untouched and the set is left as it was.
    pub async fn handle_review_approval<M>(
        &mut self,
        moderation: &M,
        viewer: &Viewer,
        id: &DocumentId,
        approved: bool,
    ) -> Result<Review, Error>
    where
        M: ReviewModeration + ?Sized,
    {
        let decided = moderation
            .decide(viewer, id, Decision::from(approved))
            .await?;
        self.reviews.retain(|review| &review.id != id);
        debug!(review_id = %id, remaining = self.reviews.len(), "pending review removed");
        Ok(decided)
    }
}
