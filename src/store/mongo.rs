use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc, Document};
use mongodb::options::{ClientOptions, FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use super::{ItemFilter, ItemStore, ListResult, PageWindow};
use crate::config::{Config, DEFAULT_DATABASE};
use crate::item::{now_millis, Item, ItemChanges, NewItem, DEFAULT_CATEGORY, DEFAULT_IS_ACTIVE};

const COLLECTION: &str = "items";
const APP_NAME: &str = "items-api";

/// Item as stored in the `items` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ItemDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default = "default_category")]
    category: String,
    #[serde(rename = "isActive", default = "default_is_active")]
    is_active: bool,
    #[serde(rename = "createdAt")]
    created_at: bson::DateTime,
    #[serde(rename = "updatedAt")]
    updated_at: bson::DateTime,
    #[serde(rename = "__v", default)]
    version: i32,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_is_active() -> bool {
    DEFAULT_IS_ACTIVE
}

fn to_bson_datetime(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn from_bson_datetime(at: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}

impl From<&Item> for ItemDocument {
    fn from(item: &Item) -> Self {
        ItemDocument {
            id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            is_active: item.is_active,
            created_at: to_bson_datetime(item.created_at),
            updated_at: to_bson_datetime(item.updated_at),
            version: 0,
        }
    }
}

impl From<ItemDocument> for Item {
    fn from(doc: ItemDocument) -> Self {
        Item {
            id: doc.id,
            name: doc.name,
            description: doc.description,
            category: doc.category,
            is_active: doc.is_active,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

/// Build the query document for a list filter
fn filter_document(filter: &ItemFilter) -> Document {
    let mut query = Document::new();

    if let Some(category) = &filter.category {
        query.insert("category", category.as_str());
    }

    if let Some(is_active) = filter.is_active {
        query.insert("isActive", is_active);
    }

    if let Some(search) = &filter.search {
        let pattern = regex::escape(search);
        query.insert(
            "$or",
            vec![
                doc! { "name": { "$regex": pattern.as_str(), "$options": "i" } },
                doc! { "description": { "$regex": pattern.as_str(), "$options": "i" } },
            ],
        );
    }

    query
}

/// Build the `$set`/`$unset` modifier for a partial update
fn update_document(changes: &ItemChanges, now: DateTime<Utc>) -> Document {
    let mut set = doc! { "updatedAt": to_bson_datetime(now) };
    let mut unset = Document::new();

    if let Some(name) = &changes.name {
        set.insert("name", name.as_str());
    }
    match &changes.description {
        Some(Some(description)) => {
            set.insert("description", description.as_str());
        }
        Some(None) => {
            unset.insert("description", "");
        }
        None => {}
    }
    if let Some(category) = &changes.category {
        set.insert("category", category.as_str());
    }
    if let Some(is_active) = changes.is_active {
        set.insert("isActive", is_active);
    }

    let mut update = doc! { "$set": set };
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    update
}

/// Shareable MongoDB-backed item store
#[derive(Clone)]
pub struct MongoItemStore {
    client: Client,
    database: Database,
    items: Collection<ItemDocument>,
}

impl MongoItemStore {
    /// Connect using the configured URI and verify the server answers.
    ///
    /// The database is taken from the URI when it names one, then from
    /// `MONGODB_DATABASE`, then falls back to `test`.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.mongodb_uri)
            .await
            .context("Failed to parse MONGODB_URI")?;
        options.server_selection_timeout = Some(config.server_selection_timeout);
        options.connect_timeout = Some(config.connect_timeout);
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options).context("Failed to create MongoDB client")?;

        let database = client.default_database().unwrap_or_else(|| {
            client.database(config.mongodb_database.as_deref().unwrap_or(DEFAULT_DATABASE))
        });
        tracing::info!("Connecting to MongoDB database: {}", database.name());

        let store = Self {
            items: database.collection(COLLECTION),
            database,
            client,
        };

        store.ping().await.context("Failed to connect to MongoDB")?;
        tracing::info!("MongoDB connected successfully");

        Ok(store)
    }
}

#[async_trait]
impl ItemStore for MongoItemStore {
    async fn insert(&self, item: NewItem) -> Result<Item> {
        let item = item.into_item(ObjectId::new(), now_millis());

        self.items
            .insert_one(ItemDocument::from(&item), None)
            .await
            .context("Failed to insert item")?;

        tracing::debug!("Inserted item with id: {}", item.id);
        Ok(item)
    }

    async fn find(&self, filter: &ItemFilter, window: PageWindow) -> Result<ListResult> {
        let query = filter_document(filter);

        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .skip(window.skip)
            .limit(i64::try_from(window.limit).unwrap_or(i64::MAX))
            .build();

        let mut cursor = self
            .items
            .find(query.clone(), options)
            .await
            .context("Failed to query items")?;

        let mut items = Vec::new();
        while cursor.advance().await.context("Failed to read items")? {
            let document = cursor
                .deserialize_current()
                .context("Failed to decode item document")?;
            items.push(Item::from(document));
        }

        let total_count = self
            .items
            .count_documents(query, None)
            .await
            .context("Failed to count items")?;

        tracing::debug!(
            "Found {} items (total: {}, filter: {:?}, window: {:?})",
            items.len(),
            total_count,
            filter,
            window
        );

        Ok(ListResult { items, total_count })
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Item>> {
        let document = self
            .items
            .find_one(doc! { "_id": id }, None)
            .await
            .context("Failed to read item")?;

        Ok(document.map(Item::from))
    }

    async fn update_by_id(&self, id: ObjectId, changes: &ItemChanges) -> Result<Option<Item>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let document = self
            .items
            .find_one_and_update(doc! { "_id": id }, update_document(changes, now_millis()), options)
            .await
            .context("Failed to update item")?;

        Ok(document.map(Item::from))
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Item>> {
        let document = self
            .items
            .find_one_and_delete(doc! { "_id": id }, None)
            .await
            .context("Failed to delete item")?;

        Ok(document.map(Item::from))
    }

    async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .context("MongoDB ping failed")?;
        Ok(())
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB connection closed");
    }
}
