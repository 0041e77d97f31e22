//! Persistence seam between the HTTP handlers and the database.

mod mongo;
#[cfg(test)]
pub mod memory;

pub use mongo::MongoItemStore;

use anyhow::Result;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::item::{Item, ItemChanges, NewItem};

/// Filters accepted by [`ItemStore::find`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Exact category match
    pub category: Option<String>,
    pub is_active: Option<bool>,
    /// Case-insensitive literal substring of `name` or `description`
    pub search: Option<String>,
}

/// Slice of the sorted result set to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    pub limit: u64,
}

/// Result of a list query with pagination info
#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Item>,
    /// Number of items matching the filter, ignoring the window
    pub total_count: u64,
}

/// Item persistence.
///
/// Results are sorted newest first (`createdAt` descending). Lookups by id
/// return `Ok(None)` when no record matches; `Err` is reserved for failures
/// of the storage layer itself.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Persist a new item, assigning its id and timestamps
    async fn insert(&self, item: NewItem) -> Result<Item>;

    async fn find(&self, filter: &ItemFilter, window: PageWindow) -> Result<ListResult>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Item>>;

    /// Apply `changes`, refresh `updatedAt` and return the updated record
    async fn update_by_id(&self, id: ObjectId, changes: &ItemChanges) -> Result<Option<Item>>;

    /// Remove the item and return its last state
    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Item>>;

    /// Round-trip to the database to confirm it is reachable
    async fn ping(&self) -> Result<()>;

    /// Release connections; called once on shutdown
    async fn close(&self);
}
