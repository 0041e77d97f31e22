use crate::error::ApiError;
use crate::models::{Envelope, ErrorEnvelope, ItemResponse, ListQuery, Pagination};
use crate::routes;
use crate::state::AppState;
use crate::store::{ItemFilter, PageWindow};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: u64 = 10;

/// Parse an optional positive integer parameter; empty counts as absent.
fn positive_param(name: &str, raw: Option<&str>, default: u64) -> Result<u64, ApiError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(default),
        Some(value) => match value.parse::<u64>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(ApiError::InvalidQueryParam(format!(
                "{} must be a positive integer, got '{}'",
                name, value
            ))),
        },
    }
}

/// GET /items handler - List items
///
/// Returns items newest first with optional filtering and pagination.
/// Query parameters:
/// - page: 1-based page number (optional, default: 1)
/// - limit: Items per page (optional, default: 10, no upper bound)
/// - category: Exact category match (optional)
/// - isActive: `true` matches active items, any other value inactive ones (optional)
/// - search: Case-insensitive substring of name or description (optional)
#[utoipa::path(
    get,
    path = routes::ITEMS,
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Items per page"),
        ("category" = Option<String>, Query, description = "Exact category match"),
        ("isActive" = Option<String>, Query, description = "\"true\" for active items, anything else for inactive"),
        ("search" = Option<String>, Query, description = "Case-insensitive substring of name or description")
    ),
    responses(
        (status = 200, description = "Page of items", body = Envelope<Vec<ItemResponse>>),
        (status = 400, description = "Invalid query parameter", body = ErrorEnvelope),
        (status = 500, description = "Database error", body = ErrorEnvelope)
    ),
    tag = "items"
)]
pub async fn list_handler(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<(StatusCode, Json<Envelope<Vec<ItemResponse>>>), ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::InvalidQueryParam(rejection.body_text()))?;

    let page = positive_param("page", query.page.as_deref(), DEFAULT_PAGE)?;
    let limit = positive_param("limit", query.limit.as_deref(), DEFAULT_LIMIT)?;

    let filter = ItemFilter {
        category: query.category.filter(|category| !category.is_empty()),
        is_active: query.is_active.map(|value| value == "true"),
        search: query.search.filter(|search| !search.is_empty()),
    };
    let window = PageWindow {
        skip: (page - 1).saturating_mul(limit),
        limit,
    };

    let result = state
        .store
        .find(&filter, window)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch items", e))?;

    tracing::info!(
        "Listed {} items (total: {}, page: {}, limit: {}, filter: {:?})",
        result.items.len(),
        result.total_count,
        page,
        limit,
        filter
    );

    let data = result.items.into_iter().map(ItemResponse::from).collect();
    Ok((
        StatusCode::OK,
        Json(Envelope::page(data, Pagination::new(page, limit, result.total_count))),
    ))
}
