use axum::routing::get;
use axum::Router;

use crate::config::Config;
use crate::handlers;
use crate::middleware;
use crate::state::AppState;

// Route path constants - single source of truth for all API paths
pub const ROOT: &str = "/";
pub const HEALTH: &str = "/health";
pub const ITEMS: &str = "/items";
pub const ITEM: &str = "/items/{id}";
pub const OPENAPI: &str = "/api-docs/openapi.json";

/// Assemble the full application: routes, fallbacks and middleware
pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route(ROOT, get(handlers::root_handler))
        .route(HEALTH, get(handlers::health_handler))
        .route(ITEMS, get(handlers::list_handler).post(handlers::create_handler))
        .route(
            ITEM,
            get(handlers::get_handler)
                .put(handlers::update_handler)
                .delete(handlers::delete_handler),
        )
        .route(OPENAPI, get(handlers::openapi_handler))
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::route_not_found)
        .with_state(state);

    middleware::apply(router, config)
}
