use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use brandkit_types::{ErrorResponse, ThemeValidationError};
use thiserror::Error;

use crate::auth::Role;

pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error(transparent)]
    Validation(#[from] ThemeValidationError),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Requires the {0} role")]
    Forbidden(Role),

    #[error("{0}")]
    Conflict(String),

    #[error("Not found")]
    NotFound,

    /// The message is returned as-is, the cause is only logged
    #[error("{0}")]
    Internal(String),
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Validation(_) | HttpError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            HttpError::Forbidden(_) => StatusCode::FORBIDDEN,
            HttpError::Conflict(_) => StatusCode::CONFLICT,
            HttpError::NotFound => StatusCode::NOT_FOUND,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(&self))).into_response()
    }
}
