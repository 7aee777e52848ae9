//! # REST API for patients
//!
//! Collection CRUD on `/patients/` plus the lookup routes by national number,
//! referring doctor and zip code.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use shared::{CreatePatientRequest, Patient, PatientFilter};
use tracing::{debug, error, info, warn};

use super::{decode, json_body, path_id};
use crate::error::ApiError;
use crate::guards;
use crate::AppState;

/// Create the patients router
pub fn router() -> Router<AppState> {
    let collection = get(list_patients).post(create_patient).put(update_patient);

    Router::new()
        .route("/patients", collection.clone())
        .route("/patients/", collection)
        .route("/patients/:id", get(get_patient).delete(delete_patient))
        .route("/patients/niss/:niss", get(get_patient_by_niss))
        .route("/patients/doctor/:id", get(list_patients_by_doctor))
        .route("/patients/zipcode/:zipcode", get(list_patients_by_zip_code))
        .route(
            "/patients/doctor/:id/zipcode/:zipcode",
            get(list_patients_by_doctor_and_zip_code),
        )
}

/// Query parameters accepted by `GET /patients/`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientListQuery {
    pub zip_code: Option<String>,
    /// Kept as text: a non-numeric value is ignored rather than rejected
    pub ref_doctor: Option<String>,
}

impl From<PatientListQuery> for PatientFilter {
    fn from(query: PatientListQuery) -> Self {
        let ref_doctor = query.ref_doctor.as_deref().and_then(|raw| {
            let parsed = guards::parse_id(raw);
            if parsed.is_none() {
                warn!("Ignoring non-numeric refDoctor filter: {}", raw);
            }
            parsed
        });

        PatientFilter {
            zip_code: query.zip_code.filter(|z| !z.trim().is_empty()),
            ref_doctor,
        }
    }
}

fn zip_code_param(raw: &str) -> Result<&str, ApiError> {
    if raw.trim().is_empty() {
        error!("Invalid zipcode");
        return Err(ApiError::validation(format!("Invalid zip code: {}", raw)));
    }
    Ok(raw)
}

/// List patients, honouring the optional `zipCode` and `refDoctor` filters
pub async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<PatientListQuery>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    info!("[GET] /patients/ - query: {:?}", query);

    let filter = PatientFilter::from(query);
    let patients = state.patients_service.list(&filter).await?;
    Ok(Json(patients))
}

/// Get a patient by id
pub async fn get_patient(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    info!("[GET] /patients/{}", raw_id);
    let id = path_id(&raw_id)?;

    match state.patients_service.get_by_id(id).await? {
        Some(patient) => Ok(Json(patient)),
        None => {
            error!("Patient not found");
            Err(ApiError::NotFound("Patient"))
        }
    }
}

/// Get a patient by national number (`XXXXXX-XXX-XX`)
pub async fn get_patient_by_niss(
    State(state): State<AppState>,
    Path(niss): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    debug!("[GET] /patients/niss/{}", niss);

    if !guards::is_niss(&niss) {
        error!("Invalid niss");
        return Err(ApiError::validation(format!("Invalid niss: {}", niss)));
    }

    match state.patients_service.get_by_niss(&niss).await? {
        Some(patient) => Ok(Json(patient)),
        None => {
            error!("Patient not found");
            Err(ApiError::NotFound("Patient"))
        }
    }
}

/// Create a patient. The response carries the assigned id.
pub async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Patient>, ApiError> {
    info!("[POST] /patients/");
    let body = json_body(payload)?;

    if !guards::is_patient(&body) {
        error!("Bad request: body does not match Patient model");
        return Err(ApiError::validation("Missing fields"));
    }
    let request: CreatePatientRequest = decode(body)?;

    let patient = state.patients_service.insert(request).await?;
    Ok(Json(patient))
}

/// Replace a patient, keyed by the `id` in the body
pub async fn update_patient(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Patient>, ApiError> {
    debug!("[PUT] /patients/");
    let body = json_body(payload)?;

    if !guards::is_patient(&body) || !guards::has_id(&body) {
        error!("Bad request: body does not match Patient model");
        return Err(ApiError::validation("Missing fields"));
    }
    let patient: Patient = decode(body)?;

    match state.patients_service.update(patient).await? {
        Some(updated) => Ok(Json(updated)),
        None => {
            error!("Patient not found");
            Err(ApiError::NotFound("Patient"))
        }
    }
}

/// Delete a patient by id
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("[DELETE] /patients/{}", raw_id);
    let id = path_id(&raw_id)?;

    if state.patients_service.delete(id).await? {
        Ok(StatusCode::OK)
    } else {
        error!("Patient not found");
        Err(ApiError::NotFound("Patient"))
    }
}

/// Patients followed by one doctor
pub async fn list_patients_by_doctor(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    debug!("[GET] /patients/doctor/{}", raw_id);
    let doctor_id = path_id(&raw_id)?;

    let patients = state.patients_service.get_by_doctor_id(doctor_id).await?;
    Ok(Json(patients))
}

/// Patients living in one zip code
pub async fn list_patients_by_zip_code(
    State(state): State<AppState>,
    Path(zip_code): Path<String>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    debug!("[GET] /patients/zipcode/{}", zip_code);
    let zip_code = zip_code_param(&zip_code)?;

    let patients = state.patients_service.get_by_zip_code(zip_code).await?;
    Ok(Json(patients))
}

/// Patients of one doctor within one zip code
pub async fn list_patients_by_doctor_and_zip_code(
    State(state): State<AppState>,
    Path((raw_id, zip_code)): Path<(String, String)>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    debug!("[GET] /patients/doctor/{}/zipcode/{}", raw_id, zip_code);
    let doctor_id = path_id(&raw_id)?;
    let zip_code = zip_code_param(&zip_code)?;

    let patients = state
        .patients_service
        .get_by_doctor_id_and_zip_code(doctor_id, zip_code)
        .await?;
    Ok(Json(patients))
}
