use shared::{CreateDoctorRequest, Doctor, DoctorFilter, Person};
use sqlx::{sqlite::SqliteRow, Row};
use tracing::{info, warn};

use crate::error::StorageResult;
use crate::storage::{internal_error, DbConnection};

/// Service for reading and writing doctors
#[derive(Clone)]
pub struct DoctorsService {
    db: DbConnection,
}

impl DoctorsService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// All doctors, in id order
    pub async fn get_all(&self) -> StorageResult<Vec<Doctor>> {
        let rows = self
            .db
            .fetch_all(sqlx::query(
                "SELECT doctor_id, first_name, last_name, speciality FROM doctors ORDER BY doctor_id",
            ))
            .await?;

        let doctors = doctors_from_rows(&rows)?;
        info!("Found {} doctors", doctors.len());
        Ok(doctors)
    }

    pub async fn get_by_speciality(&self, speciality: &str) -> StorageResult<Vec<Doctor>> {
        let rows = self
            .db
            .fetch_all(
                sqlx::query(
                    "SELECT doctor_id, first_name, last_name, speciality FROM doctors WHERE speciality = ? ORDER BY doctor_id",
                )
                .bind(speciality),
            )
            .await?;

        doctors_from_rows(&rows)
    }

    /// Apply a list filter; an empty filter returns everybody
    pub async fn list(&self, filter: &DoctorFilter) -> StorageResult<Vec<Doctor>> {
        match filter.speciality.as_deref() {
            Some(speciality) => self.get_by_speciality(speciality).await,
            None => self.get_all().await,
        }
    }

    pub async fn get_by_id(&self, id: i64) -> StorageResult<Option<Doctor>> {
        let row = self
            .db
            .fetch_optional(
                sqlx::query(
                    "SELECT doctor_id, first_name, last_name, speciality FROM doctors WHERE doctor_id = ?",
                )
                .bind(id),
            )
            .await?;

        match row {
            Some(row) => doctor_from_row(&row)
                .map(Some)
                .map_err(|e| internal_error("doctors row", e)),
            None => {
                warn!("Doctor not found: {}", id);
                Ok(None)
            }
        }
    }

    /// Insert a doctor and echo it back with the id the store assigned
    pub async fn insert(&self, request: CreateDoctorRequest) -> StorageResult<Doctor> {
        let outcome = self
            .db
            .execute(
                sqlx::query(
                    "INSERT INTO doctors (first_name, last_name, speciality) VALUES (?, ?, ?)",
                )
                .bind(&request.first_name)
                .bind(&request.last_name)
                .bind(&request.speciality),
            )
            .await?;

        let doctor = request.into_doctor(outcome.inserted_id);
        info!("Created doctor {} with id {}", doctor.display_name(), doctor.id);
        Ok(doctor)
    }

    /// Replace every mutable field of the doctor with the given id.
    /// Returns `None` when no row has that id.
    pub async fn update(&self, doctor: Doctor) -> StorageResult<Option<Doctor>> {
        let outcome = self
            .db
            .execute(
                sqlx::query(
                    "UPDATE doctors SET first_name = ?, last_name = ?, speciality = ? WHERE doctor_id = ?",
                )
                .bind(&doctor.first_name)
                .bind(&doctor.last_name)
                .bind(&doctor.speciality)
                .bind(doctor.id),
            )
            .await?;

        if outcome.rows_affected == 0 {
            warn!("Doctor not found for update: {}", doctor.id);
            return Ok(None);
        }

        info!("Updated doctor {}", doctor.id);
        Ok(Some(doctor))
    }

    /// True iff a row was removed
    pub async fn delete(&self, id: i64) -> StorageResult<bool> {
        let outcome = self
            .db
            .execute(sqlx::query("DELETE FROM doctors WHERE doctor_id = ?").bind(id))
            .await?;

        let deleted = outcome.rows_affected > 0;
        if deleted {
            info!("Deleted doctor {}", id);
        }
        Ok(deleted)
    }
}

fn doctor_from_row(row: &SqliteRow) -> Result<Doctor, sqlx::Error> {
    Ok(Doctor {
        id: row.try_get("doctor_id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        speciality: row.try_get("speciality")?,
    })
}

fn doctors_from_rows(rows: &[SqliteRow]) -> StorageResult<Vec<Doctor>> {
    rows.iter()
        .map(|row| doctor_from_row(row).map_err(|e| internal_error("doctors row", e)))
        .collect()
}
