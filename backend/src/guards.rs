//! Validation guards applied to untrusted input before any service call.
//!
//! Every guard is a total predicate over an arbitrary JSON value: it never
//! panics and never coerces (a numeric string is not a number).

use chrono::NaiveDate;
use serde_json::Value;

const DOCTOR_FIELDS: [&str; 3] = ["firstName", "lastName", "speciality"];
const PATIENT_FIELDS: [&str; 3] = ["firstName", "lastName", "niss"];
const ADDRESS_FIELDS: [&str; 5] = ["street", "number", "zipCode", "city", "country"];

/// Integral JSON number
pub fn is_number(value: &Value) -> bool {
    value.is_i64()
}

pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

/// `XXXXXX-XXX-XX`, digits only
pub fn is_niss(candidate: &str) -> bool {
    let groups: Vec<&str> = candidate.split('-').collect();
    match groups.as_slice() {
        [birth, serial, check] => {
            all_digits(birth, 6) && all_digits(serial, 3) && all_digits(check, 2)
        }
        _ => false,
    }
}

/// Turn a path segment into an id. Anything but a full base-10 integer is rejected,
/// and so is an integer outside the `i64` range.
pub fn parse_id(segment: &str) -> Option<i64> {
    segment.parse::<i64>().ok()
}

/// `YYYY-MM-DD` calendar date
pub fn is_birth_date(candidate: &str) -> bool {
    NaiveDate::parse_from_str(candidate, "%Y-%m-%d").is_ok()
}

/// Structurally complete doctor payload. An `id`, if sent and not null, must be a number.
pub fn is_doctor(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };

    DOCTOR_FIELDS
        .iter()
        .all(|field| object.get(*field).is_some_and(is_string))
        && object.get("id").map_or(true, is_optional_id)
}

/// Structurally complete patient payload, address included.
pub fn is_patient(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };

    let strings_ok = PATIENT_FIELDS
        .iter()
        .all(|field| object.get(*field).is_some_and(is_string));
    if !strings_ok {
        return false;
    }

    let niss_ok = object
        .get("niss")
        .and_then(Value::as_str)
        .is_some_and(is_niss);
    let birth_date_ok = object
        .get("birthDate")
        .and_then(Value::as_str)
        .is_some_and(is_birth_date);
    let address_ok = object.get("address").is_some_and(is_address);
    let ref_doctor_ok = object.get("refDoctor").is_some_and(is_number);
    let id_ok = object.get("id").map_or(true, is_optional_id);

    niss_ok && birth_date_ok && address_ok && ref_doctor_ok && id_ok
}

/// Whether the payload carries an id (required by update routes)
pub fn has_id(value: &Value) -> bool {
    value.get("id").is_some_and(is_number)
}

// Create payloads may echo `"id": null`
fn is_optional_id(value: &Value) -> bool {
    value.is_null() || is_number(value)
}

fn is_address(value: &Value) -> bool {
    value.as_object().is_some_and(|address| {
        ADDRESS_FIELDS
            .iter()
            .all(|field| address.get(*field).is_some_and(is_string))
    })
}

fn all_digits(group: &str, len: usize) -> bool {
    group.len() == len && group.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patient_payload() -> Value {
        json!({
            "lastName": "Valles",
            "firstName": "Jules",
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
    }

    #[test]
    fn test_is_niss() {
        assert!(is_niss("900101-123-45"));
        assert!(!is_niss("9001011234"));
        assert!(!is_niss("abcdef-123-45"));
        assert!(!is_niss("900101-123-456"));
        assert!(!is_niss("900101-123-45-1"));
        assert!(!is_niss(""));
        // non-ASCII digits are not accepted
        assert!(!is_niss("９00101-123-45"));
    }

    #[test]
    fn test_is_number_does_not_coerce() {
        assert!(is_number(&json!(12)));
        assert!(is_number(&json!(-3)));
        assert!(!is_number(&json!("12")));
        assert!(!is_number(&json!(1.5)));
        assert!(!is_number(&Value::Null));
    }

    #[test]
    fn test_is_string() {
        assert!(is_string(&json!("")));
        assert!(!is_string(&json!(1)));
        assert!(!is_string(&json!(["a"])));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("12abc"), None);
        assert_eq!(parse_id("NaN"), None);
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id(" 12"), None);
        assert_eq!(parse_id("12 "), None);
        // out of range
        assert_eq!(parse_id("99999999999999999999"), None);
    }

    #[test]
    fn test_is_doctor() {
        let doctor = json!({
            "firstName": "Gregory",
            "lastName": "House",
            "speciality": "general practicien"
        });
        assert!(is_doctor(&doctor));
        assert!(!has_id(&doctor));

        let with_id = json!({
            "id": 1,
            "firstName": "Gregory",
            "lastName": "House",
            "speciality": "general practicien"
        });
        assert!(is_doctor(&with_id));
        assert!(has_id(&with_id));

        let null_id = json!({
            "id": null,
            "firstName": "Gregory",
            "lastName": "House",
            "speciality": "general practicien"
        });
        assert!(is_doctor(&null_id));
        assert!(!has_id(&null_id));
    }

    #[test]
    fn test_is_doctor_rejects_missing_or_mistyped_fields() {
        assert!(!is_doctor(&json!({
            "firstName": "Gregory",
            "lastName": "House"
        })));
        assert!(!is_doctor(&json!({
            "firstName": "Gregory",
            "lastName": 12,
            "speciality": "general practicien"
        })));
        assert!(!is_doctor(&json!({
            "id": "1",
            "firstName": "Gregory",
            "lastName": "House",
            "speciality": "general practicien"
        })));
        assert!(!is_doctor(&json!("House")));
        assert!(!is_doctor(&Value::Null));
    }

    #[test]
    fn test_is_patient() {
        assert!(is_patient(&patient_payload()));
    }

    #[test]
    fn test_is_patient_rejects_incomplete_address() {
        let mut payload = patient_payload();
        payload["address"]
            .as_object_mut()
            .unwrap()
            .remove("zipCode");
        assert!(!is_patient(&payload));

        let mut payload = patient_payload();
        payload["address"] = json!("Rue du polar 273-B");
        assert!(!is_patient(&payload));
    }

    #[test]
    fn test_is_patient_rejects_bad_niss_and_date() {
        let mut payload = patient_payload();
        payload["niss"] = json!("9001011234");
        assert!(!is_patient(&payload));

        let mut payload = patient_payload();
        payload["birthDate"] = json!("01/01/1990");
        assert!(!is_patient(&payload));

        let mut payload = patient_payload();
        payload["birthDate"] = json!("1990-02-30");
        assert!(!is_patient(&payload));
    }

    #[test]
    fn test_is_patient_rejects_string_ref_doctor() {
        let mut payload = patient_payload();
        payload["refDoctor"] = json!("1");
        assert!(!is_patient(&payload));

        let mut payload = patient_payload();
        payload.as_object_mut().unwrap().remove("refDoctor");
        assert!(!is_patient(&payload));
    }
}
