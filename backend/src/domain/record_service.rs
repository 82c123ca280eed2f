//! Record services implementing the record driving ports.
//!
//! Reads validate every fetched document before aggregation; a malformed
//! record fails the whole request instead of being silently skipped.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::Value;
use tracing::info;

use crate::domain::ports::{
    CustomerEntry, DocumentStore, ProjectSubmission, RecordListing, RecordsCommand, RecordsQuery,
    StatusChange,
};
use crate::domain::store_errors::map_store_error;
use crate::domain::{
    CollectionName, Document, DocumentId, EmailAddress, Error, Fields, HistoryEntry, Progress,
    Record, RecordDraft, RecordOverview, RecordScope, RecordValidationError, StatusBucket,
    StatusUpdate, Viewer, summarise,
};

/// Progress assigned to a freshly submitted project.
pub const SUBMITTED_PROGRESS: u8 = 10;

fn map_validation_error(id: &DocumentId, error: RecordValidationError) -> Error {
    Error::internal(format!("record {id} is malformed: {error}"))
}

fn validate_all(documents: &[Document]) -> Result<Vec<Record>, Error> {
    documents
        .iter()
        .map(|doc| Record::try_from_document(doc).map_err(|err| map_validation_error(&doc.id, err)))
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

fn required(value: String, field: &'static str) -> Result<String, Error> {
    non_blank(Some(value)).ok_or_else(|| {
        Error::invalid_request(format!("{field} must not be empty"))
            .with_details(serde_json::json!({ "field": field, "code": "empty" }))
    })
}

fn record_not_found(id: &DocumentId) -> Error {
    Error::not_found(format!("record {id} not found"))
}

/// Record service implementing [`RecordsQuery`] and [`RecordsCommand`].
#[derive(Clone)]
pub struct RecordService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> RecordService<S> {
    /// Create a record service over `store`, stamping history with `clock`.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

impl<S> RecordService<S>
where
    S: DocumentStore,
{
    async fn fetch_scoped(&self, scope: &RecordScope) -> Result<Vec<Record>, Error> {
        let documents = match scope {
            RecordScope::All => self.store.fetch_all(CollectionName::Records).await,
            RecordScope::OwnedBy(uid) => {
                self.store
                    .fetch_where(
                        CollectionName::Records,
                        "createdBy",
                        &Value::String(uid.to_string()),
                    )
                    .await
            }
        }
        .map_err(map_store_error)?;
        validate_all(&documents)
    }

    async fn fetch_record(&self, id: &DocumentId) -> Result<Record, Error> {
        let document = self
            .store
            .fetch_by_id(CollectionName::Records, id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| record_not_found(id))?;
        Record::try_from_document(&document).map_err(|err| map_validation_error(id, err))
    }

    async fn insert(&self, fields: Fields) -> Result<Record, Error> {
        let id = self
            .store
            .insert(CollectionName::Records, fields.clone())
            .await
            .map_err(map_store_error)?;
        let record = Record::try_from_document(&Document::new(id.clone(), fields))
            .map_err(|err| map_validation_error(&id, err))?;
        Ok(record)
    }
}

#[async_trait]
impl<S> RecordsQuery for RecordService<S>
where
    S: DocumentStore,
{
    async fn overview(
        &self,
        viewer: &Viewer,
        listing: &RecordListing,
    ) -> Result<RecordOverview, Error> {
        let scope = RecordScope::for_viewer(viewer)
            .ok_or_else(|| Error::unauthorized("sign in required"))?;
        let records = self.fetch_scoped(&scope).await?;
        let mut overview = summarise(&records, &listing.search);
        overview.records = listing.tab.apply(overview.records);
        Ok(overview)
    }

    async fn get_record(&self, viewer: &Viewer, id: &DocumentId) -> Result<Record, Error> {
        let identity = viewer.require_identity()?;
        let record = self.fetch_record(id).await?;
        if identity.is_admin() || record.is_owned_by(identity.uid()) {
            Ok(record)
        } else {
            Err(record_not_found(id))
        }
    }
}

#[async_trait]
impl<S> RecordsCommand for RecordService<S>
where
    S: DocumentStore,
{
    async fn submit_project(
        &self,
        viewer: &Viewer,
        submission: ProjectSubmission,
    ) -> Result<Record, Error> {
        let identity = viewer.require_identity()?;
        let name = required(submission.name, "name")?;
        let now = self.clock.utc();
        let progress = Progress::new(i64::from(SUBMITTED_PROGRESS))
            .map_err(|err| Error::internal(err.to_string()))?;
        let fields = RecordDraft {
            name,
            website: non_blank(submission.website),
            status: StatusBucket::Submitted,
            created_by: identity.uid().clone(),
            progress,
            history: vec![HistoryEntry::new(now, "Project information submitted")],
            email: Some(identity.email().to_string()),
            phone: None,
            description: non_blank(submission.description),
            requirements: non_blank(submission.requirements),
            notes: None,
            created_at: now,
        }
        .into_fields()
        .map_err(|err| Error::internal(err.to_string()))?;
        let record = self.insert(fields).await?;
        info!(record_id = %record.id, uid = %identity.uid(), "project submitted");
        Ok(record)
    }

    async fn add_customer(&self, viewer: &Viewer, entry: CustomerEntry) -> Result<Record, Error> {
        let identity = viewer.require_admin()?;
        let name = required(entry.name, "name")?;
        let email = EmailAddress::new(required(entry.email, "email")?).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(serde_json::json!({ "field": "email", "code": "invalid" }))
        })?;
        let now = self.clock.utc();
        let fields = RecordDraft {
            name,
            website: non_blank(entry.website),
            status: StatusBucket::Active,
            created_by: identity.uid().clone(),
            progress: Progress::default(),
            history: vec![HistoryEntry::new(now, "Customer added")],
            email: Some(email.into()),
            phone: non_blank(entry.phone),
            description: None,
            requirements: None,
            notes: non_blank(entry.notes),
            created_at: now,
        }
        .into_fields()
        .map_err(|err| Error::internal(err.to_string()))?;
        let record = self.insert(fields).await?;
        info!(record_id = %record.id, "customer added");
        Ok(record)
    }

    async fn change_status(
        &self,
        viewer: &Viewer,
        id: &DocumentId,
        change: StatusChange,
    ) -> Result<Record, Error> {
        viewer.require_admin()?;
        let mut record = self.fetch_record(id).await?;
        record.history.push(HistoryEntry::new(
            self.clock.utc(),
            format!("Status changed to {}", change.status),
        ));
        let fields = StatusUpdate {
            status: change.status,
            progress: change.progress,
            history: record.history.clone(),
        }
        .into_fields()
        .map_err(|err| Error::internal(err.to_string()))?;
        self.store
            .update(CollectionName::Records, id, fields)
            .await
            .map_err(map_store_error)?;
        record.status = change.status.into();
        if let Some(progress) = change.progress {
            record.progress = progress;
        }
        info!(record_id = %id, status = %change.status, "record status changed");
        Ok(record)
    }

    async fn delete_record(&self, viewer: &Viewer, id: &DocumentId) -> Result<(), Error> {
        viewer.require_admin()?;
        self.store
            .delete(CollectionName::Records, id)
            .await
            .map_err(map_store_error)?;
        info!(record_id = %id, "record deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "record_service_tests.rs"]
mod tests;
