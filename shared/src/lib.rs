use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Common shape of every person record (doctors and patients).
pub trait Person {
    fn first_name(&self) -> &str;
    fn last_name(&self) -> &str;

    /// "First Last", used in log lines
    fn display_name(&self) -> String {
        format!("{} {}", self.first_name(), self.last_name())
    }
}

/// A doctor as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// Server-assigned identifier
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub speciality: String,
}

/// Body of `POST /doctors/`. Any client-sent `id` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    pub first_name: String,
    pub last_name: String,
    pub speciality: String,
}

impl CreateDoctorRequest {
    /// Attach the id assigned by the store
    pub fn into_doctor(self, id: i64) -> Doctor {
        Doctor {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            speciality: self.speciality,
        }
    }
}

impl Person for Doctor {
    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }
}

/// Read-side refinement for `GET /doctors/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorFilter {
    pub speciality: Option<String>,
}

/// Postal address embedded in a patient record. Has no identity of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    /// House number, kept as text ("273-B")
    pub number: String,
    pub zip_code: String,
    pub city: String,
    pub country: String,
}

/// A patient as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Server-assigned identifier
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Serialized as `YYYY-MM-DD`
    pub birth_date: NaiveDate,
    /// Belgian national number, `XXXXXX-XXX-XX`
    pub niss: String,
    pub address: Address,
    /// Id of the referring doctor (not enforced)
    pub ref_doctor: i64,
}

/// Body of `POST /patients/`. Any client-sent `id` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub niss: String,
    pub address: Address,
    pub ref_doctor: i64,
}

impl CreatePatientRequest {
    /// Attach the id assigned by the store
    pub fn into_patient(self, id: i64) -> Patient {
        Patient {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: self.birth_date,
            niss: self.niss,
            address: self.address,
            ref_doctor: self.ref_doctor,
        }
    }
}

impl Person for Patient {
    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }
}

/// Read-side refinements for `GET /patients/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientFilter {
    pub zip_code: Option<String>,
    pub ref_doctor: Option<i64>,
}

/// JSON body sent with 400 and 500 responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_patient() -> Patient {
        Patient {
            id: 1,
            first_name: "Jules".to_string(),
            last_name: "Valles".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            niss: "900101-123-45".to_string(),
            address: Address {
                street: "Rue du polar".to_string(),
                number: "273-B".to_string(),
                zip_code: "1000".to_string(),
                city: "Bruxelles".to_string(),
                country: "Belgique".to_string(),
            },
            ref_doctor: 1,
        }
    }

    #[test]
    fn test_patient_uses_camel_case_on_the_wire() {
        let value = serde_json::to_value(sample_patient()).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 1,
                "firstName": "Jules",
                "lastName": "Valles",
                "birthDate": "1990-01-01",
                "niss": "900101-123-45",
                "address": {
                    "street": "Rue du polar",
                    "number": "273-B",
                    "zipCode": "1000",
                    "city": "Bruxelles",
                    "country": "Belgique"
                },
                "refDoctor": 1
            })
        );
    }

    #[test]
    fn test_create_doctor_request_ignores_client_id() {
        let request: CreateDoctorRequest = serde_json::from_value(json!({
            "id": 42,
            "firstName": "Gregory",
            "lastName": "House",
            "speciality": "general practicien"
        }))
        .unwrap();

        let doctor = request.into_doctor(7);
        assert_eq!(doctor.id, 7);
        assert_eq!(doctor.display_name(), "Gregory House");
    }
}
