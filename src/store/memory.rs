//! In-process [`ItemStore`] used by handler tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use regex::RegexBuilder;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ItemFilter, ItemStore, ListResult, PageWindow};
use crate::item::{now_millis, Item, ItemChanges, NewItem};

#[derive(Default)]
pub struct MemoryItemStore {
    // Insertion order; newest last.
    items: Mutex<Vec<Item>>,
    calls: AtomicUsize,
    offline: AtomicBool,
    stalled: AtomicBool,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations attempted so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent operation fail as if the database were gone
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make `ping` hang, like a database that accepts connections but never answers
    pub fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    fn begin(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(anyhow!("connection refused"));
        }
        Ok(())
    }

    fn matches(item: &Item, filter: &ItemFilter) -> Result<bool> {
        if let Some(category) = &filter.category {
            if &item.category != category {
                return Ok(false);
            }
        }
        if let Some(is_active) = filter.is_active {
            if item.is_active != is_active {
                return Ok(false);
            }
        }
        if let Some(search) = &filter.search {
            let pattern = RegexBuilder::new(&regex::escape(search))
                .case_insensitive(true)
                .build()?;
            let in_description = item
                .description
                .as_deref()
                .is_some_and(|d| pattern.is_match(d));
            if !pattern.is_match(&item.name) && !in_description {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn insert(&self, item: NewItem) -> Result<Item> {
        self.begin()?;
        let item = item.into_item(ObjectId::new(), now_millis());
        self.items.lock().map_err(|_| anyhow!("store poisoned"))?.push(item.clone());
        Ok(item)
    }

    async fn find(&self, filter: &ItemFilter, window: PageWindow) -> Result<ListResult> {
        self.begin()?;
        let items = self.items.lock().map_err(|_| anyhow!("store poisoned"))?;

        let mut matching = Vec::new();
        for item in items.iter().rev() {
            if Self::matches(item, filter)? {
                matching.push(item.clone());
            }
        }
        // Stable sort keeps newer insertions first on equal timestamps.
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total_count = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(window.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
            .collect();

        Ok(ListResult { items, total_count })
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Item>> {
        self.begin()?;
        let items = self.items.lock().map_err(|_| anyhow!("store poisoned"))?;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn update_by_id(&self, id: ObjectId, changes: &ItemChanges) -> Result<Option<Item>> {
        self.begin()?;
        let mut items = self.items.lock().map_err(|_| anyhow!("store poisoned"))?;
        Ok(items.iter_mut().find(|item| item.id == id).map(|item| {
            changes.apply_to(item, now_millis());
            item.clone()
        }))
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Item>> {
        self.begin()?;
        let mut items = self.items.lock().map_err(|_| anyhow!("store poisoned"))?;
        Ok(items
            .iter()
            .position(|item| item.id == id)
            .map(|index| items.remove(index)))
    }

    async fn ping(&self) -> Result<()> {
        self.begin()?;
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn close(&self) {}
}
