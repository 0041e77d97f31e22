use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Uniform body of every successful item response
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Envelope {
            success: true,
            message: None,
            data,
            pagination: None,
        }
    }

    pub fn with_message(message: &str, data: T) -> Self {
        Envelope {
            message: Some(message.to_string()),
            ..Envelope::data(data)
        }
    }

    pub fn page(data: T, pagination: Pagination) -> Self {
        Envelope {
            pagination: Some(pagination),
            ..Envelope::data(data)
        }
    }
}

/// Body of every failed request
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ErrorEnvelope {
    pub fn failure(message: impl Into<String>) -> Self {
        ErrorEnvelope {
            success: false,
            message: message.into(),
            error: None,
            errors: None,
        }
    }

    pub fn with_error(self, error: impl Into<String>) -> Self {
        ErrorEnvelope {
            error: Some(error.into()),
            ..self
        }
    }

    pub fn with_errors(self, errors: Vec<String>) -> Self {
        ErrorEnvelope {
            errors: Some(errors),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total_items: u64) -> Self {
        Pagination {
            current_page: page,
            total_pages: total_items.div_ceil(limit),
            total_items,
            items_per_page: limit,
        }
    }
}

/// An item as rendered in JSON responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ItemResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    #[serde(rename = "__v", default)]
    pub version: i32,
}

/// ISO 8601 with millisecond precision and a `Z` suffix
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        ItemResponse {
            id: item.id.to_hex(),
            name: item.name,
            description: item.description,
            category: item.category,
            is_active: item.is_active,
            created_at: format_timestamp(item.created_at),
            updated_at: format_timestamp(item.updated_at),
            version: 0,
        }
    }
}

/// Query parameters for the list endpoint
///
/// Kept as raw strings so malformed numbers produce an envelope, not a
/// framework rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<String>,
    pub search: Option<String>,
}

/// Response type for health check endpoint
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub mongodb: String,
}

/// Response type for the root endpoint
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub endpoints: EndpointList,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EndpointList {
    #[serde(rename = "GET /")]
    pub root: String,
    #[serde(rename = "GET /health")]
    pub health: String,
    #[serde(rename = "GET /items")]
    pub list_items: String,
    #[serde(rename = "GET /items/:id")]
    pub get_item: String,
    #[serde(rename = "POST /items")]
    pub create_item: String,
    #[serde(rename = "PUT /items/:id")]
    pub update_item: String,
    #[serde(rename = "DELETE /items/:id")]
    pub delete_item: String,
}
