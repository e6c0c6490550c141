//! Record endpoints — save, list, and delete per-user prescription records.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::records::{self, NewRecord};
use crate::models::{PrescriptionRecord, NOT_FOUND};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecordRequest {
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub disease: String,
    #[serde(default)]
    pub medicines: Vec<String>,
    #[serde(default)]
    pub tests: Vec<String>,
}

#[derive(Serialize)]
pub struct RecordsResponse {
    pub records: Vec<PrescriptionRecord>,
}

/// `GET /api/records` — the user's saved records, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<RecordsResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    let records = records::list_records(&conn, &user.user_id)?;
    Ok(Json(RecordsResponse { records }))
}

/// `POST /api/records` — save a corrected record.
///
/// Rejects a record whose disease, medicines, and tests are all empty.
pub async fn save(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Json(payload): Json<SaveRecordRequest>,
) -> Result<(StatusCode, Json<PrescriptionRecord>), ApiError> {
    let new = validate_payload(payload)?;

    let conn = ctx.state.open_db()?;
    let saved = records::insert_record(&conn, &user.user_id, &new)?;
    tracing::info!(record_id = %saved.id, medicines = saved.medicines.len(), "Record saved");

    Ok((StatusCode::CREATED, Json(saved)))
}

/// `DELETE /api/records/:id` — delete one record.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(record_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = Uuid::parse_str(&record_id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid record ID: {e}")))?;

    let conn = ctx.state.open_db()?;
    records::delete_record(&conn, &user.user_id, &id)?;
    tracing::info!(record_id = %id, "Record deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Trim fields, drop empty list entries, reject an all-empty record.
fn validate_payload(payload: SaveRecordRequest) -> Result<NewRecord, ApiError> {
    let doctor_name = {
        let t = payload.doctor_name.trim();
        if t.is_empty() { NOT_FOUND } else { t }.to_string()
    };
    let disease = payload.disease.trim().to_string();
    let medicines: Vec<String> = payload
        .medicines
        .iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    let tests: Vec<String> = payload
        .tests
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let has_disease = !disease.is_empty() && !disease.eq_ignore_ascii_case(NOT_FOUND);
    if medicines.is_empty() && tests.is_empty() && !has_disease {
        return Err(ApiError::BadRequest(
            "Record must contain at least one medicine, test, or disease".into(),
        ));
    }

    Ok(NewRecord {
        doctor_name,
        disease,
        medicines,
        tests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        doctor: &str,
        disease: &str,
        medicines: &[&str],
        tests: &[&str],
    ) -> SaveRecordRequest {
        SaveRecordRequest {
            doctor_name: doctor.into(),
            disease: disease.into(),
            medicines: medicines.iter().map(|s| s.to_string()).collect(),
            tests: tests.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn empty_doctor_defaults_to_not_found() {
        let new = validate_payload(request("  ", "Flu", &[], &[])).unwrap();
        assert_eq!(new.doctor_name, "Not Found");
        assert_eq!(new.disease, "Flu");
    }

    #[test]
    fn blank_list_entries_are_dropped() {
        let new = validate_payload(request("Dr. X", "", &["Napa", "  ", ""], &[" CBC "])).unwrap();
        assert_eq!(new.medicines, vec!["Napa"]);
        assert_eq!(new.tests, vec!["CBC"]);
    }

    #[test]
    fn all_empty_record_is_rejected() {
        let err = validate_payload(request("Dr. X", "", &[], &[])).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn not_found_disease_alone_is_rejected() {
        let err = validate_payload(request("Dr. X", "Not Found", &[], &[])).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn disease_alone_is_enough() {
        assert!(validate_payload(request("", "Asthma", &[], &[])).is_ok());
    }
}
