//! Driving ports for admin broadcasts.

use async_trait::async_trait;

use crate::domain::{Broadcast, BroadcastMessage, Error, Viewer};

/// Driving port for reading broadcasts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BroadcastsQuery: Send + Sync {
    /// Broadcasts visible to signed-in users, newest first.
    async fn list(&self, viewer: &Viewer) -> Result<Vec<Broadcast>, Error>;
}

/// Driving port for publishing broadcasts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BroadcastsCommand: Send + Sync {
    /// Publish a message to every user. Admin only.
    async fn publish(&self, viewer: &Viewer, message: BroadcastMessage)
    -> Result<Broadcast, Error>;
}
