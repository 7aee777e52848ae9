use chrono::{DateTime, NaiveDate};
use shared::{Address, CreatePatientRequest, Patient, PatientFilter, Person};
use sqlx::{sqlite::SqliteRow, Row};
use tracing::{info, warn};

use crate::error::StorageResult;
use crate::storage::{internal_error, DbConnection, SqliteQuery};

const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Service for reading and writing patients
#[derive(Clone)]
pub struct PatientsService {
    db: DbConnection,
}

impl PatientsService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// All patients, in id order
    pub async fn get_all(&self) -> StorageResult<Vec<Patient>> {
        let patients = self
            .fetch_patients(sqlx::query(
                "SELECT * FROM patients ORDER BY patient_id",
            ))
            .await?;
        info!("Found {} patients", patients.len());
        Ok(patients)
    }

    pub async fn get_by_id(&self, id: i64) -> StorageResult<Option<Patient>> {
        let row = self
            .db
            .fetch_optional(sqlx::query("SELECT * FROM patients WHERE patient_id = ?").bind(id))
            .await?;

        match row {
            Some(row) => patient_from_row(&row).map(Some),
            None => {
                warn!("Patient not found: {}", id);
                Ok(None)
            }
        }
    }

    /// First patient with this national number, if any
    pub async fn get_by_niss(&self, niss: &str) -> StorageResult<Option<Patient>> {
        let row = self
            .db
            .fetch_optional(
                sqlx::query("SELECT * FROM patients WHERE niss = ? ORDER BY patient_id LIMIT 1")
                    .bind(niss),
            )
            .await?;

        match row {
            Some(row) => patient_from_row(&row).map(Some),
            None => {
                warn!("Patient not found for niss {}", niss);
                Ok(None)
            }
        }
    }

    pub async fn get_by_doctor_id(&self, doctor_id: i64) -> StorageResult<Vec<Patient>> {
        self.fetch_patients(
            sqlx::query("SELECT * FROM patients WHERE ref_doctor = ? ORDER BY patient_id")
                .bind(doctor_id),
        )
        .await
    }

    pub async fn get_by_zip_code(&self, zip_code: &str) -> StorageResult<Vec<Patient>> {
        self.fetch_patients(
            sqlx::query("SELECT * FROM patients WHERE zip_code = ? ORDER BY patient_id")
                .bind(zip_code),
        )
        .await
    }

    pub async fn get_by_doctor_id_and_zip_code(
        &self,
        doctor_id: i64,
        zip_code: &str,
    ) -> StorageResult<Vec<Patient>> {
        self.fetch_patients(
            sqlx::query(
                "SELECT * FROM patients WHERE ref_doctor = ? AND zip_code = ? ORDER BY patient_id",
            )
            .bind(doctor_id)
            .bind(zip_code),
        )
        .await
    }

    /// Dispatch a list filter to the matching read
    pub async fn list(&self, filter: &PatientFilter) -> StorageResult<Vec<Patient>> {
        match (filter.ref_doctor, filter.zip_code.as_deref()) {
            (Some(doctor_id), Some(zip_code)) => {
                self.get_by_doctor_id_and_zip_code(doctor_id, zip_code).await
            }
            (Some(doctor_id), None) => self.get_by_doctor_id(doctor_id).await,
            (None, Some(zip_code)) => self.get_by_zip_code(zip_code).await,
            (None, None) => self.get_all().await,
        }
    }

    /// Insert a patient and echo it back with the id the store assigned
    pub async fn insert(&self, request: CreatePatientRequest) -> StorageResult<Patient> {
        let birth_date = request.birth_date.format(BIRTH_DATE_FORMAT).to_string();
        let outcome = self
            .db
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO patients (
                        lastname, firstname, birthdate, niss, ref_doctor,
                        street_name, street_number, zip_code, city, country
                    )
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&request.last_name)
                .bind(&request.first_name)
                .bind(birth_date)
                .bind(&request.niss)
                .bind(request.ref_doctor)
                .bind(&request.address.street)
                .bind(&request.address.number)
                .bind(&request.address.zip_code)
                .bind(&request.address.city)
                .bind(&request.address.country),
            )
            .await?;

        let patient = request.into_patient(outcome.inserted_id);
        info!("Created patient {} with id {}", patient.display_name(), patient.id);
        Ok(patient)
    }

    /// Replace every mutable field of the patient with the given id.
    /// Returns `None` when no row has that id.
    pub async fn update(&self, patient: Patient) -> StorageResult<Option<Patient>> {
        let birth_date = patient.birth_date.format(BIRTH_DATE_FORMAT).to_string();
        let outcome = self
            .db
            .execute(
                sqlx::query(
                    r#"
                    UPDATE patients
                    SET lastname = ?, firstname = ?, birthdate = ?, niss = ?, ref_doctor = ?,
                        street_name = ?, street_number = ?, zip_code = ?, city = ?, country = ?
                    WHERE patient_id = ?
                    "#,
                )
                .bind(&patient.last_name)
                .bind(&patient.first_name)
                .bind(birth_date)
                .bind(&patient.niss)
                .bind(patient.ref_doctor)
                .bind(&patient.address.street)
                .bind(&patient.address.number)
                .bind(&patient.address.zip_code)
                .bind(&patient.address.city)
                .bind(&patient.address.country)
                .bind(patient.id),
            )
            .await?;

        if outcome.rows_affected == 0 {
            warn!("Patient not found for update: {}", patient.id);
            return Ok(None);
        }

        info!("Updated patient {}", patient.id);
        Ok(Some(patient))
    }

    /// True iff a row was removed
    pub async fn delete(&self, id: i64) -> StorageResult<bool> {
        let outcome = self
            .db
            .execute(sqlx::query("DELETE FROM patients WHERE patient_id = ?").bind(id))
            .await?;

        let deleted = outcome.rows_affected > 0;
        if deleted {
            info!("Deleted patient {}", id);
        }
        Ok(deleted)
    }

    async fn fetch_patients<'q>(&self, query: SqliteQuery<'q>) -> StorageResult<Vec<Patient>> {
        let rows = self.db.fetch_all(query).await?;
        rows.iter().map(patient_from_row).collect()
    }
}

/// Parse a stored birth date. Older rows hold a full RFC 3339 timestamp.
pub fn parse_birth_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw, BIRTH_DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
}

fn patient_from_row(row: &SqliteRow) -> StorageResult<Patient> {
    map_patient_row(row).map_err(|e| internal_error("patients row", e))
}

fn map_patient_row(row: &SqliteRow) -> Result<Patient, sqlx::Error> {
    let raw_birth_date: String = row.try_get("birthdate")?;
    let birth_date = parse_birth_date(&raw_birth_date).map_err(|e| sqlx::Error::ColumnDecode {
        index: "birthdate".to_string(),
        source: Box::new(e),
    })?;

    Ok(Patient {
        id: row.try_get("patient_id")?,
        first_name: row.try_get("firstname")?,
        last_name: row.try_get("lastname")?,
        birth_date,
        niss: row.try_get("niss")?,
        address: Address {
            street: row.try_get("street_name")?,
            number: row.try_get("street_number")?,
            zip_code: row.try_get("zip_code")?,
            city: row.try_get("city")?,
            country: row.try_get("country")?,
        },
        ref_doctor: row.try_get("ref_doctor")?,
    })
}
