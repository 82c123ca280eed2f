//! Driving port for record mutations.

use async_trait::async_trait;

use crate::domain::{DocumentId, Error, Progress, Record, StatusBucket, Viewer};

/// Project details submitted by a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectSubmission {
    pub name: String,
    pub website: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
}

/// Customer details entered by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomerEntry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}

/// Admin status transition, optionally updating progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub status: StatusBucket,
    pub progress: Option<Progress>,
}

/// Driving port for record writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsCommand: Send + Sync {
    /// Create a `Submitted` project owned by the viewer.
    async fn submit_project(
        &self,
        viewer: &Viewer,
        submission: ProjectSubmission,
    ) -> Result<Record, Error>;

    /// Create an `Active` customer record. Admin only.
    async fn add_customer(&self, viewer: &Viewer, entry: CustomerEntry) -> Result<Record, Error>;

    /// Move a record to a new status and log it in the history. Admin only.
    async fn change_status(
        &self,
        viewer: &Viewer,
        id: &DocumentId,
        change: StatusChange,
    ) -> Result<Record, Error>;

    /// Delete a record. Admin only.
    async fn delete_record(&self, viewer: &Viewer, id: &DocumentId) -> Result<(), Error>;
}
