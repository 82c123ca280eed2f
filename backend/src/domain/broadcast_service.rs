//! Broadcast service: admins publish, signed-in users read.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{BroadcastsCommand, BroadcastsQuery, DocumentStore};
use crate::domain::store_errors::map_store_error;
use crate::domain::{
    Broadcast, BroadcastDraft, BroadcastMessage, CollectionName, Document, Error, Viewer,
    newest_first,
};

/// Broadcast service implementing [`BroadcastsQuery`] and [`BroadcastsCommand`].
#[derive(Clone)]
pub struct BroadcastService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> BroadcastService<S> {
    /// Create a broadcast service over `store`.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

#[async_trait]
impl<S> BroadcastsQuery for BroadcastService<S>
where
    S: DocumentStore,
{
    async fn list(&self, viewer: &Viewer) -> Result<Vec<Broadcast>, Error> {
        viewer.require_identity()?;
        let documents = self
            .store
            .fetch_all(CollectionName::Broadcasts)
            .await
            .map_err(map_store_error)?;
        let broadcasts = documents
            .iter()
            .map(|doc| {
                Broadcast::try_from_document(doc).map_err(|err| {
                    Error::internal(format!("broadcast {} is malformed: {err}", doc.id))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(newest_first(broadcasts))
    }
}

#[async_trait]
impl<S> BroadcastsCommand for BroadcastService<S>
where
    S: DocumentStore,
{
    async fn publish(
        &self,
        viewer: &Viewer,
        message: BroadcastMessage,
    ) -> Result<Broadcast, Error> {
        let admin = viewer.require_admin()?;
        let fields = BroadcastDraft {
            author_id: admin.uid().clone(),
            author_name: admin.name().to_string(),
            message,
            created_at: self.clock.utc(),
        }
        .into_fields()
        .map_err(|err| Error::internal(err.to_string()))?;
        let id = self
            .store
            .insert(CollectionName::Broadcasts, fields.clone())
            .await
            .map_err(map_store_error)?;
        let broadcast = Broadcast::try_from_document(&Document::new(id, fields))
            .map_err(|err| Error::internal(err.to_string()))?;
        info!(broadcast_id = %broadcast.id, author = %admin.uid(), "broadcast published");
        Ok(broadcast)
    }
}

#[cfg(test)]
#[path = "broadcast_service_tests.rs"]
mod tests;
