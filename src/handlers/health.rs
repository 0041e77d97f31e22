use crate::models::{format_timestamp, HealthResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::time::Duration;

/// Upper bound on the connectivity check, well under the driver's server selection timeout
const PING_TIMEOUT: Duration = Duration::from_secs(1);

/// GET /health handler - Health check endpoint
///
/// Pings MongoDB to report connectivity. Always answers 200; the `mongodb`
/// field says whether the database answered within [`PING_TIMEOUT`].
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service status and database connectivity", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mongodb = match tokio::time::timeout(PING_TIMEOUT, state.store.ping()).await {
        Ok(Ok(())) => {
            tracing::debug!("Health check passed");
            "Connected"
        }
        Ok(Err(e)) => {
            tracing::warn!("Health check could not reach MongoDB: {:#}", e);
            "Disconnected"
        }
        Err(_) => {
            tracing::warn!("Health check timed out after {:?}", PING_TIMEOUT);
            "Disconnected"
        }
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK".to_string(),
            timestamp: format_timestamp(Utc::now()),
            mongodb: mongodb.to_string(),
        }),
    )
}
