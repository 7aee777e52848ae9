//! Helpers for driving the full router in handler tests

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

use crate::config::Config;
use crate::domain::{DoctorsService, PatientsService};
use crate::storage::DbConnection;
use crate::{create_router, AppState};

/// Router over a fresh in-memory database, plus the state behind it
pub(crate) async fn setup_test_app() -> (Router, AppState) {
    let (app, state, _) = setup_test_app_with_db().await;
    (app, state)
}

/// Same as [`setup_test_app`], also handing out the raw connection
pub(crate) async fn setup_test_app_with_db() -> (Router, AppState, DbConnection) {
    let db = DbConnection::init_test()
        .await
        .expect("Failed to create test database");
    let state = AppState {
        doctors_service: DoctorsService::new(db.clone()),
        patients_service: PatientsService::new(db.clone()),
    };
    let config = Config::from_lookup(|_| None).expect("default config");

    (create_router(state.clone(), &config), state, db)
}

/// Send one request and return the status and raw body
pub(crate) async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, bytes.to_vec())
}

/// Like [`send`], parsing the body as JSON
pub(crate) async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
