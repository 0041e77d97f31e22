use crate::error::ApiError;
use crate::handlers::item_id;
use crate::models::{Envelope, ErrorEnvelope, ItemResponse};
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};

/// DELETE /items/:id handler - Permanently remove an item
///
/// Responds with the item as it was just before deletion.
#[utoipa::path(
    delete,
    path = routes::ITEM,
    params(
        ("id" = String, Path, description = "24-character hex item id")
    ),
    responses(
        (status = 200, description = "Item deleted", body = Envelope<ItemResponse>),
        (status = 400, description = "Invalid item ID format", body = ErrorEnvelope),
        (status = 404, description = "Item not found", body = ErrorEnvelope),
        (status = 500, description = "Database error", body = ErrorEnvelope)
    ),
    tag = "items"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<(StatusCode, Json<Envelope<ItemResponse>>), ApiError> {
    let id = item_id(path)?;

    let deleted = state
        .store
        .delete_by_id(id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete item", e))?
        .ok_or(ApiError::NotFound)?;

    tracing::info!("Deleted item with id: {}", id);
    Ok((
        StatusCode::OK,
        Json(Envelope::with_message("Item deleted successfully", deleted.into())),
    ))
}
