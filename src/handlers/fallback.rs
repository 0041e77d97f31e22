use crate::error::ApiError;
use axum::extract::OriginalUri;
use axum::http::Method;

/// Fallback for unknown paths and for known paths with an unsupported method
pub async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    ApiError::RouteNotFound {
        method: method.to_string(),
        path,
    }
}
