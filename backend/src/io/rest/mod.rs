//! # REST API
//!
//! One router per entity. Every handler follows the same steps:
//! - parse path, query or body input
//! - run the relevant guard, answering `400` on failure without touching storage
//! - call the service and map "absent" to `404`, success to `200`
//!
//! Storage faults surface as a bare `500` through [`ApiError`].

use axum::{extract::rejection::JsonRejection, Json};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

use crate::error::ApiError;
use crate::guards;

pub mod doctor_apis;
pub mod patient_apis;

#[cfg(test)]
pub(crate) mod test_utils;

/// Turn a `:id` path segment into an id or a 400
pub(crate) fn path_id(raw: &str) -> Result<i64, ApiError> {
    guards::parse_id(raw).ok_or_else(|| {
        error!("Invalid id: {}", raw);
        ApiError::validation(format!("Invalid id: {}", raw))
    })
}

/// Accept any JSON document; a body that is not JSON at all is a 400
pub(crate) fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            error!("Bad request: unreadable JSON body: {}", rejection.body_text());
            Err(ApiError::validation("Invalid JSON body"))
        }
    }
}

/// Decode a payload that already passed its guard
pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| {
        error!("Bad request: {}", e);
        ApiError::validation("Missing fields")
    })
}
