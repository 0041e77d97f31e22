use crate::error::ApiError;
use crate::extract::ItemPayload;
use crate::item::NewItem;
use crate::models::{Envelope, ErrorEnvelope, ItemResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// POST /items handler - Create an item
#[utoipa::path(
    post,
    path = routes::ITEMS,
    request_body = serde_json::Value,
    responses(
        (status = 201, description = "Item created", body = Envelope<ItemResponse>),
        (status = 400, description = "Validation error", body = ErrorEnvelope),
        (status = 500, description = "Database error or unreadable body", body = ErrorEnvelope)
    ),
    tag = "items"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    ItemPayload(payload): ItemPayload,
) -> Result<(StatusCode, Json<Envelope<ItemResponse>>), ApiError> {
    let new_item = NewItem::from_payload(&payload).map_err(|errors| {
        tracing::warn!("Rejected item: {}", errors);
        ApiError::Validation(errors)
    })?;

    let item = state
        .store
        .insert(new_item)
        .await
        .map_err(|e| ApiError::storage("Failed to create item", e))?;

    tracing::info!("Created item with id: {}", item.id);
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("Item created successfully", item.into())),
    ))
}
