//! Driving port for reading customer/project records.

use async_trait::async_trait;

use crate::domain::{DocumentId, Error, ProjectTab, Record, RecordOverview, SearchTerm, Viewer};

/// Filters applied to a record listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordListing {
    /// Free-text search over name and website.
    pub search: SearchTerm,
    /// "My projects" tab to apply after scoping.
    pub tab: ProjectTab,
}

/// Driving port for record reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsQuery: Send + Sync {
    /// Status counts and search results over the records `viewer` may see.
    ///
    /// Admins see every record; users see the records they created.
    async fn overview(&self, viewer: &Viewer, listing: &RecordListing)
    -> Result<RecordOverview, Error>;

    /// One record, visible to admins and to its creator.
    async fn get_record(&self, viewer: &Viewer, id: &DocumentId) -> Result<Record, Error>;
}
