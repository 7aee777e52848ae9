//! Error taxonomy shared by every layer.
//!
//! The storage gateway and the services only ever fail with [`InternalError`],
//! which carries no driver detail. The HTTP boundary works with [`ApiError`]
//! and turns it into a status code and a small JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ErrorResponse;
use thiserror::Error;

/// Generic persistence fault. The cause has already been logged where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Internal Error")]
pub struct InternalError;

pub type StorageResult<T> = Result<T, InternalError>;

/// Outcome of a request that did not succeed
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing input, rejected before any statement runs
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // The browser pages only look at the status for a miss
            ApiError::NotFound(_) => status.into_response(),
            other => {
                let body = ErrorResponse {
                    error: other.to_string(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
