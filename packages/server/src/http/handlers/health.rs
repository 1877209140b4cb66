use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use brandkit_types::HealthResponse;
use tracing::instrument;

use crate::http::state::HttpState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "The store is readable", body = HealthResponse),
        (status = 503, description = "The store is unavailable", body = HealthResponse),
    ),
    description = "Reports whether the theme store can be read"
)]
#[instrument(level = "debug", skip(state))]
#[axum::debug_handler]
pub async fn handle_health(State(state): State<HttpState>) -> impl IntoResponse {
    match state.store.version() {
        Ok(settings_version) => (
            StatusCode::OK,
            Json(HealthResponse {
                healthy: true,
                settings_version,
            }),
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Theme store is unhealthy: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    healthy: false,
                    settings_version: 0,
                }),
            )
                .into_response()
        }
    }
}
