//! Review services: public listing, submission and moderation.
//!
//! A moderation decision is a read followed by exactly one merge update of
//! `moderation`, `approved`, `decidedAt` and `decidedBy`. The update is
//! guarded on `decidedAt` still being unset, so of two concurrent decisions
//! only one is written. Store failures are reported to the caller once and
//! never retried here.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::ports::{
    DocumentStore, DocumentStoreError, ReviewModeration, ReviewSubmission, ReviewsCommand, ReviewsQuery,
};
use crate::domain::store_errors::map_store_error;
use crate::domain::{
    CollectionName, Decision, Document, DocumentId, Error, Moderation, ModerationError, Rating,
    Review, ReviewDraft, ReviewValidationError, Viewer,
};

/// Field whose presence marks a review as decided in storage.
const DECIDED_AT: &str = "decidedAt";

fn map_validation_error(id: &DocumentId, error: ReviewValidationError) -> Error {
    Error::internal(format!("review {id} is malformed: {error}"))
}

fn map_draft_error(error: ReviewValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

fn validate_all(documents: &[Document]) -> Result<Vec<Review>, Error> {
    documents
        .iter()
        .map(|doc| Review::try_from_document(doc).map_err(|err| map_validation_error(&doc.id, err)))
        .collect()
}

/// Review service implementing the review driving ports.
#[derive(Clone)]
pub struct ReviewService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> ReviewService<S> {
    /// Create a review service over `store`.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

impl<S> ReviewService<S>
where
    S: DocumentStore,
{
    async fn fetch_approved(&self) -> Result<Vec<Review>, Error> {
        let documents = self
            .store
            .fetch_where(CollectionName::Reviews, "approved", &Value::Bool(true))
            .await
            .map_err(map_store_error)?;
        validate_all(&documents)
    }
}

#[async_trait]
impl<S> ReviewsQuery for ReviewService<S>
where
    S: DocumentStore,
{
    async fn list_approved(&self) -> Result<Vec<Review>, Error> {
        let reviews = self.fetch_approved().await?;
        Ok(reviews
            .into_iter()
            .filter(|review| review.moderation == Moderation::Approved)
            .collect())
    }

    async fn list_pending(&self, viewer: &Viewer) -> Result<Vec<Review>, Error> {
        viewer.require_admin()?;
        // Reviews written without an `approved` flag are pending too.
        let documents = self
            .store
            .fetch_all(CollectionName::Reviews)
            .await
            .map_err(map_store_error)?;
        let reviews = validate_all(&documents)?;
        Ok(reviews.into_iter().filter(Review::is_pending).collect())
    }
}

#[async_trait]
impl<S> ReviewsCommand for ReviewService<S>
where
    S: DocumentStore,
{
    async fn submit_review(
        &self,
        viewer: &Viewer,
        submission: ReviewSubmission,
    ) -> Result<Review, Error> {
        let identity = viewer.require_identity()?;
        let rating = Rating::new(submission.scale, submission.rating).map_err(map_draft_error)?;
        let fields = ReviewDraft::new(
            identity.uid().clone(),
            identity.name().as_ref(),
            submission.project_id,
            &submission.message,
            rating,
            self.clock.utc(),
        )
        .and_then(ReviewDraft::into_fields)
        .map_err(map_draft_error)?;
        let id = self
            .store
            .insert(CollectionName::Reviews, fields.clone())
            .await
            .map_err(map_store_error)?;
        let review = Review::try_from_document(&Document::new(id.clone(), fields))
            .map_err(|err| map_validation_error(&id, err))?;
        info!(review_id = %review.id, uid = %identity.uid(), "review submitted for moderation");
        Ok(review)
    }
}

#[async_trait]
impl<S> ReviewModeration for ReviewService<S>
where
    S: DocumentStore,
{
    async fn decide(
        &self,
        viewer: &Viewer,
        id: &DocumentId,
        decision: Decision,
    ) -> Result<Review, Error> {
        let admin = viewer.require_admin()?;
        let document = self
            .store
            .fetch_by_id(CollectionName::Reviews, id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("review {id} not found")))?;
        let mut review =
            Review::try_from_document(&document).map_err(|err| map_validation_error(id, err))?;
        let change = review
            .decide(decision, admin.uid(), self.clock.utc())
            .map_err(|err| match err {
                ModerationError::AlreadyDecided { .. } => Error::conflict(err.to_string()),
            })?;
        let fields = change
            .into_fields()
            .map_err(|err| Error::internal(err.to_string()))?;
        self.store
            .update_unless_set(CollectionName::Reviews, id, DECIDED_AT, fields)
            .await
            .map_err(|err| match err {
                DocumentStoreError::Conflict { .. } => {
                    info!(review_id = %id, "review was decided concurrently");
                    Error::conflict(format!("review {id} has already been decided"))
                }
                other => {
                    warn!(review_id = %id, error = %other, "moderation write failed");
                    map_store_error(other)
                }
            })?;
        info!(review_id = %id, outcome = %review.moderation, "review moderated");
        Ok(review)
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
