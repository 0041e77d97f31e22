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

/// GET /items/:id handler - Retrieve one item
#[utoipa::path(
    get,
    path = routes::ITEM,
    params(
        ("id" = String, Path, description = "24-character hex item id")
    ),
    responses(
        (status = 200, description = "Item found", body = Envelope<ItemResponse>),
        (status = 400, description = "Invalid item ID format", body = ErrorEnvelope),
        (status = 404, description = "Item not found", body = ErrorEnvelope),
        (status = 500, description = "Database error", body = ErrorEnvelope)
    ),
    tag = "items"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<(StatusCode, Json<Envelope<ItemResponse>>), ApiError> {
    let id = item_id(path)?;

    match state
        .store
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch item", e))?
    {
        Some(item) => {
            tracing::info!("Successfully retrieved item with id: {}", id);
            Ok((StatusCode::OK, Json(Envelope::data(item.into()))))
        }
        None => {
            tracing::info!("Item not found with id: {}", id);
            Err(ApiError::NotFound)
        }
    }
}
