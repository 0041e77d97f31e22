use crate::error::ApiError;
use crate::extract::ItemPayload;
use crate::handlers::item_id;
use crate::item::ItemChanges;
use crate::models::{Envelope, ErrorEnvelope, ItemResponse};
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};

/// PUT /items/:id handler - Partially update an item
///
/// Only the fields present in the body change; `updatedAt` is refreshed on
/// every successful call.
#[utoipa::path(
    put,
    path = routes::ITEM,
    params(
        ("id" = String, Path, description = "24-character hex item id")
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Item updated", body = Envelope<ItemResponse>),
        (status = 400, description = "Invalid item ID format or validation error", body = ErrorEnvelope),
        (status = 404, description = "Item not found", body = ErrorEnvelope),
        (status = 500, description = "Database error or unreadable body", body = ErrorEnvelope)
    ),
    tag = "items"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    ItemPayload(payload): ItemPayload,
) -> Result<(StatusCode, Json<Envelope<ItemResponse>>), ApiError> {
    let id = item_id(path)?;

    let changes = ItemChanges::from_payload(&payload).map_err(|errors| {
        tracing::warn!("Rejected update for item {}: {}", id, errors);
        ApiError::Validation(errors)
    })?;

    let updated = state
        .store
        .update_by_id(id, &changes)
        .await
        .map_err(|e| ApiError::storage("Failed to update item", e))?
        .ok_or(ApiError::NotFound)?;

    tracing::info!("Updated item with id: {}", id);
    Ok((
        StatusCode::OK,
        Json(Envelope::with_message("Item updated successfully", updated.into())),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_item, send, test_app};
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_update_single_field() {
        let (app, _store) = test_app();
        let created = create_item(
            &app,
            json!({"name": "Mug", "description": "ceramic", "isActive": false}),
        )
        .await;

        tokio::time::sleep(Duration::from_millis(5)).await;

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/items/{}", created.id),
            Some(json!({"category": "kitchen"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Item updated successfully");
        let updated: ItemResponse = serde_json::from_value(body["data"].clone()).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.category, "kitchen");
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.is_active, created.is_active);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_update_ignores_server_fields() {
        let (app, _store) = test_app();
        let created = create_item(&app, json!({"name": "Pen"})).await;

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/items/{}", created.id),
            Some(json!({"_id": "000000000000000000000000", "createdAt": "2001-01-01T00:00:00.000Z"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["_id"], created.id.as_str());
        assert_eq!(body["data"]["createdAt"], created.created_at.as_str());
    }

    #[tokio::test]
    async fn test_update_can_clear_description() {
        let (app, _store) = test_app();
        let created = create_item(&app, json!({"name": "Pen", "description": "blue ink"})).await;

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/items/{}", created.id),
            Some(json!({"description": null})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].get("description").is_none());
    }

    #[tokio::test]
    async fn test_update_revalidates() {
        let (app, _store) = test_app();
        let created = create_item(&app, json!({"name": "Pen"})).await;
        let uri = format!("/items/{}", created.id);

        let (status, body) = send(&app, "PUT", &uri, Some(json!({"name": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation error");
        assert_eq!(body["errors"], json!(["Name is required"]));

        let (status, body) = send(&app, "PUT", &uri, Some(json!({"name": "p".repeat(101)}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"], json!(["Name must be less than 100 characters"]));

        // Nothing was persisted
        let (_, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(body["data"]["name"], "Pen");
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let (app, _store) = test_app();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/items/{}", ObjectId::new()),
            Some(json!({"name": "ghost"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Item not found");
    }

    #[tokio::test]
    async fn test_update_invalid_id() {
        let (app, store) = test_app();

        let (status, body) = send(&app, "PUT", "/items/not-an-id", Some(json!({"name": "x"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid item ID format");
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_storage_failure() {
        let (app, store) = test_app();
        store.set_offline(true);

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/items/{}", ObjectId::new()),
            Some(json!({"name": "x"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to update item");
        assert_eq!(body["error"], "connection refused");
    }
}
