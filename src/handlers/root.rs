use crate::api_doc::ApiDoc;
use crate::models::{EndpointList, RootResponse};
use crate::routes;
use axum::Json;
use utoipa::OpenApi;

/// GET / handler - Service metadata and endpoint overview
#[utoipa::path(
    get,
    path = routes::ROOT,
    responses(
        (status = 200, description = "Welcome message and endpoint list", body = RootResponse)
    ),
    tag = "meta"
)]
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to the Items CRUD API!".to_string(),
        endpoints: EndpointList {
            root: "This endpoint".to_string(),
            health: "Health check".to_string(),
            list_items: "Get all items".to_string(),
            get_item: "Get item by ID".to_string(),
            create_item: "Create new item".to_string(),
            update_item: "Update item by ID".to_string(),
            delete_item: "Delete item by ID".to_string(),
        },
    })
}

/// GET /api-docs/openapi.json handler
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
