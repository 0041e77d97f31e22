pub mod root;
pub mod health;
pub mod list;
pub mod create;
pub mod get;
pub mod update;
pub mod delete;
pub mod fallback;

pub use root::{openapi_handler, root_handler};
pub use health::health_handler;
pub use list::list_handler;
pub use create::create_handler;
pub use get::get_handler;
pub use update::update_handler;
pub use delete::delete_handler;
pub use fallback::route_not_found;

use crate::error::ApiError;
use axum::extract::{rejection::PathRejection, Path};
use mongodb::bson::oid::ObjectId;

/// Check the path id before touching the database
///
/// Only the 24-character hex form is accepted. Twelve-character strings,
/// which some ObjectId libraries also treat as raw bytes, are rejected with
/// 400 rather than looked up and reported as not found.
pub(crate) fn parse_item_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::InvalidId(raw.to_string()))
}

/// Resolve the `{id}` path segment, treating an undecodable segment as a malformed id
pub(crate) fn item_id(path: Result<Path<String>, PathRejection>) -> Result<ObjectId, ApiError> {
    let Path(raw) = path.map_err(|rejection| ApiError::InvalidId(rejection.body_text()))?;
    parse_item_id(&raw)
}
