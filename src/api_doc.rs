use utoipa::OpenApi;

use crate::handlers;
use crate::models::{
    EndpointList, ErrorEnvelope, HealthResponse, ItemResponse, Pagination, RootResponse,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "items-api",
        version = "1.0.0",
        description = "CRUD service for items stored in MongoDB"
    ),
    paths(
        handlers::root::root_handler,
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::create::create_handler,
        handlers::get::get_handler,
        handlers::update::update_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            ErrorEnvelope,
            ItemResponse,
            Pagination,
            HealthResponse,
            RootResponse,
            EndpointList
        )
    ),
    tags(
        (name = "meta", description = "Service metadata"),
        (name = "health", description = "Health check operations"),
        (name = "items", description = "Item CRUD operations")
    )
)]
pub struct ApiDoc;
