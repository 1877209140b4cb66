use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use brandkit_types::{ErrorResponse, ThemeSettings, ThemeUpdate};
use serde_json::Value;
use tracing::instrument;

use crate::{
    auth::{CurrentUser, Role},
    http::{
        error::{HttpError, HttpResult},
        state::HttpState,
    },
    store::StoreError,
};

#[utoipa::path(
    get,
    path = "/theme",
    responses(
        (status = 200, description = "The current theme settings", body = ThemeSettings),
        (status = 500, description = "The settings could not be read", body = ErrorResponse),
    ),
    description = "Returns the full brand color settings"
)]
#[instrument(level = "debug", skip(state))]
#[axum::debug_handler]
pub async fn handle_get_theme(State(state): State<HttpState>) -> impl IntoResponse {
    match get_theme_inner(state) {
        Ok(settings) => Json(settings).into_response(),
        Err(e) => e.into_response(),
    }
}

fn get_theme_inner(state: HttpState) -> HttpResult<ThemeSettings> {
    state.store.get().map_err(|err| {
        tracing::error!("Failed to read theme: {}", err);
        HttpError::Internal("Failed to load theme".to_string())
    })
}

#[utoipa::path(
    put,
    path = "/theme",
    request_body(
        content = ThemeSettings,
        description = "Any subset of the color fields, optionally with `expectedVersion`. `updatedAt` and `version` are ignored"
    ),
    responses(
        (status = 200, description = "The merged theme settings", body = ThemeSettings),
        (status = 400, description = "A field is unknown or not a hex color", body = ErrorResponse),
        (status = 401, description = "Missing or wrong bearer token", body = ErrorResponse),
        (status = 403, description = "The caller may not change the theme", body = ErrorResponse),
        (status = 409, description = "expectedVersion does not match the stored version", body = ErrorResponse),
        (status = 500, description = "Failed to update theme", body = ErrorResponse),
    ),
    description = "Merges the given colors into the theme settings"
)]
#[instrument(level = "debug", skip(state, payload))]
#[axum::debug_handler]
pub async fn handle_put_theme(
    State(state): State<HttpState>,
    user: CurrentUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    match put_theme_inner(state, user, payload) {
        Ok(settings) => Json(settings).into_response(),
        Err(e) => e.into_response(),
    }
}

fn put_theme_inner(
    state: HttpState,
    user: CurrentUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> HttpResult<ThemeSettings> {
    if !state.roles.current_user_has_role(&user, Role::SuperAdmin) {
        return Err(HttpError::Forbidden(Role::SuperAdmin));
    }

    let Json(payload) = payload.map_err(|err| HttpError::InvalidBody(err.body_text()))?;

    let update = ThemeUpdate::from_json(payload)?;

    state.store.merge(&update).map_err(|err| match err {
        StoreError::Conflict { .. } => HttpError::Conflict(err.to_string()),
        err => {
            tracing::error!("Failed to update theme: {}", err);
            HttpError::Internal("Failed to update theme".to_string())
        }
    })
}
