//! # REST API for doctors
//!
//! `/doctors/` collection (list, create, update) and `/doctors/:id` item
//! (read, delete).

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use shared::{CreateDoctorRequest, Doctor, DoctorFilter};
use tracing::{error, info};

use super::{decode, json_body, path_id};
use crate::error::ApiError;
use crate::guards;
use crate::AppState;

/// Create the doctors router
pub fn router() -> Router<AppState> {
    let collection = get(list_doctors).post(create_doctor).put(update_doctor);

    Router::new()
        .route("/doctors", collection.clone())
        .route("/doctors/", collection)
        .route("/doctors/:id", get(get_doctor).delete(delete_doctor))
}

/// Query parameters accepted by `GET /doctors/`
#[derive(Debug, Default, Deserialize)]
pub struct DoctorListQuery {
    pub speciality: Option<String>,
}

impl From<DoctorListQuery> for DoctorFilter {
    fn from(query: DoctorListQuery) -> Self {
        DoctorFilter {
            speciality: query.speciality.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// List doctors, optionally restricted to one speciality
pub async fn list_doctors(
    State(state): State<AppState>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Vec<Doctor>>, ApiError> {
    info!("[GET] /doctors/ - query: {:?}", query);

    let filter = DoctorFilter::from(query);
    let doctors = state.doctors_service.list(&filter).await?;
    Ok(Json(doctors))
}

/// Get a doctor by id
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Doctor>, ApiError> {
    info!("[GET] /doctors/{}", raw_id);
    let id = path_id(&raw_id)?;

    match state.doctors_service.get_by_id(id).await? {
        Some(doctor) => Ok(Json(doctor)),
        None => {
            error!("Doctor not found");
            Err(ApiError::NotFound("Doctor"))
        }
    }
}

/// Create a doctor. The response carries the assigned id.
pub async fn create_doctor(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Doctor>, ApiError> {
    info!("[POST] /doctors/");
    let body = json_body(payload)?;

    if !guards::is_doctor(&body) {
        error!("Bad request: body does not match Doctor model");
        return Err(ApiError::validation("Missing fields"));
    }
    let request: CreateDoctorRequest = decode(body)?;

    let doctor = state.doctors_service.insert(request).await?;
    Ok(Json(doctor))
}

/// Replace a doctor, keyed by the `id` in the body
pub async fn update_doctor(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Doctor>, ApiError> {
    info!("[PUT] /doctors/");
    let body = json_body(payload)?;

    if !guards::is_doctor(&body) || !guards::has_id(&body) {
        error!("Bad request: body does not match Doctor model");
        return Err(ApiError::validation("Missing fields"));
    }
    let doctor: Doctor = decode(body)?;

    match state.doctors_service.update(doctor).await? {
        Some(updated) => Ok(Json(updated)),
        None => {
            error!("Doctor not found");
            Err(ApiError::NotFound("Doctor"))
        }
    }
}

/// Delete a doctor by id
pub async fn delete_doctor(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("[DELETE] /doctors/{}", raw_id);
    let id = path_id(&raw_id)?;

    if state.doctors_service.delete(id).await? {
        Ok(StatusCode::OK)
    } else {
        error!("Doctor not found");
        Err(ApiError::NotFound("Doctor"))
    }
}
