//! # Clinic Backend
//!
//! REST backend for a small clinic registry of doctors and their patients.
//!
//! ## Layers
//!
//! - **Storage** (`storage`): the SQLite gateway. It owns the connection pool,
//!   creates the schema, and turns driver errors into [`error::InternalError`].
//! - **Domain** (`domain`): one service per entity, mapping rows to the
//!   shared DTOs.
//! - **IO** (`io`): axum handlers that validate input with [`guards`] and call
//!   the services.
//!
//! [`initialize_backend`] wires the services together and [`create_router`]
//! builds the HTTP surface on top of them.

pub mod config;
pub mod domain;
pub mod error;
pub mod guards;
pub mod io;
pub mod storage;

use anyhow::Context;
use axum::{http::Method, routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::domain::{DoctorsService, PatientsService};
use crate::io::rest::{doctor_apis, patient_apis};
use crate::storage::DbConnection;

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub doctors_service: DoctorsService,
    pub patients_service: PatientsService,
}

/// Open the database and build the services on top of it
pub async fn initialize_backend(config: &Config) -> anyhow::Result<AppState> {
    info!("Setting up database at {}", config.database_url());
    let db = DbConnection::new(config.database_url())
        .await
        .with_context(|| format!("opening database {}", config.database_url()))?;

    info!("Setting up domain services");
    Ok(AppState {
        doctors_service: DoctorsService::new(db.clone()),
        patients_service: PatientsService::new(db),
    })
}

async fn root() -> &'static str {
    info!("[GET] /");
    "Bonjour tout le monde"
}

/// Build the axum router with every route, CORS, and request tracing
pub fn create_router(app_state: AppState, config: &Config) -> Router {
    let allow_origin = match config.allowed_origin() {
        Some(origin) => AllowOrigin::exact(origin.clone()),
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .merge(doctor_apis::router())
        .merge(patient_apis::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
