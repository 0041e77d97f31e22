//! The `Item` record and the field rules applied to client input.
//!
//! Input arrives as a loose JSON object (or form fields) and is cast field by
//! field, the way a document mapper would: strings are trimmed, numbers and
//! booleans are accepted for string fields, and `isActive` understands the
//! usual truthy/falsy spellings. Every violated constraint yields one
//! [`FieldError`], in schema order.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde_json::{Map, Value as JsonValue};
use std::fmt;

pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_IS_ACTIVE: bool = true;

/// A stored item, as returned by the storage layer
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ObjectId,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated item that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub is_active: bool,
}

/// A validated partial update. `None` leaves a field untouched.
///
/// `description` is doubly optional: `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All constraint violations found in one payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|e| e.message.clone()).collect()
    }

    fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let described: Vec<String> = self
            .fields()
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", described.join("; "))
    }
}

/// Current time truncated to the millisecond precision the database stores.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

impl NewItem {
    /// Validate a create payload against the full schema.
    pub fn from_payload(payload: &Map<String, JsonValue>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = collect(&mut errors, cast_name(payload.get("name")));
        let description = collect(&mut errors, cast_description(payload.get("description")));
        let category = collect(&mut errors, cast_string("category", payload.get("category")));
        let is_active = collect(&mut errors, cast_bool("isActive", payload.get("isActive")));

        match (name, description, category, is_active) {
            (Some(name), Some(description), Some(category), Some(is_active)) if errors.is_empty() => {
                Ok(NewItem {
                    name,
                    description,
                    category: category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
                    is_active: is_active.unwrap_or(DEFAULT_IS_ACTIVE),
                })
            }
            _ => Err(errors),
        }
    }

    pub fn into_item(self, id: ObjectId, now: DateTime<Utc>) -> Item {
        Item {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ItemChanges {
    /// Validate an update payload.
    ///
    /// The stored record already satisfies the schema, so the merged record
    /// is valid exactly when every field present here is.
    pub fn from_payload(payload: &Map<String, JsonValue>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let mut changes = ItemChanges::default();

        if let Some(value) = payload.get("name") {
            changes.name = collect(&mut errors, cast_name(Some(value)));
        }
        if let Some(value) = payload.get("description") {
            changes.description = collect(&mut errors, cast_description(Some(value)));
        }
        if let Some(value) = payload.get("category") {
            changes.category = collect(&mut errors, cast_string("category", Some(value)))
                .map(|category| category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()));
        }
        if let Some(value) = payload.get("isActive") {
            changes.is_active = collect(&mut errors, cast_bool("isActive", Some(value)))
                .map(|active| active.unwrap_or(DEFAULT_IS_ACTIVE));
        }

        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(errors)
        }
    }

    /// Apply these changes in place and refresh `updated_at`.
    pub fn apply_to(&self, item: &mut Item, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(category) = &self.category {
            item.category = category.clone();
        }
        if let Some(is_active) = self.is_active {
            item.is_active = is_active;
        }
        item.updated_at = now;
    }
}

fn collect<T>(errors: &mut ValidationErrors, result: Result<T, FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.push(error);
            None
        }
    }
}

fn cast_name(value: Option<&JsonValue>) -> Result<String, FieldError> {
    let name = cast_string("name", value)?.unwrap_or_default();
    if name.is_empty() {
        return Err(FieldError {
            field: "name",
            message: "Name is required".to_string(),
        });
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(FieldError {
            field: "name",
            message: format!("Name must be less than {} characters", NAME_MAX_LEN),
        });
    }
    Ok(name)
}

fn cast_description(value: Option<&JsonValue>) -> Result<Option<String>, FieldError> {
    let description = cast_string("description", value)?;
    if let Some(text) = &description {
        if text.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(FieldError {
                field: "description",
                message: format!("Description must be less than {} characters", DESCRIPTION_MAX_LEN),
            });
        }
    }
    Ok(description)
}

/// Cast a string field, trimming it. Absent and `null` both yield `None`.
fn cast_string(field: &'static str, value: Option<&JsonValue>) -> Result<Option<String>, FieldError> {
    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.trim().to_string())),
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(JsonValue::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(cast_error("string", field, other)),
    }
}

fn cast_bool(field: &'static str, value: Option<&JsonValue>) -> Result<Option<bool>, FieldError> {
    let parsed = match value {
        None | Some(JsonValue::Null) => return Ok(None),
        Some(JsonValue::Bool(b)) => Some(*b),
        Some(JsonValue::String(s)) => match s.as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Some(JsonValue::Number(n)) => match n.as_f64() {
            Some(v) if v == 1.0 => Some(true),
            Some(v) if v == 0.0 => Some(false),
            _ => None,
        },
        Some(_) => None,
    };

    match (parsed, value) {
        (Some(b), _) => Ok(Some(b)),
        (None, Some(other)) => Err(cast_error("Boolean", field, other)),
        (None, None) => Ok(None),
    }
}

fn cast_error(target: &str, field: &'static str, value: &JsonValue) -> FieldError {
    let type_name = match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "Array",
        JsonValue::Object(_) => "Object",
    };
    let shown = match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    };
    FieldError {
        field,
        message: format!(
            "Cast to {} failed for value \"{}\" (type {}) at path \"{}\"",
            target, shown, type_name, field
        ),
    }
}
