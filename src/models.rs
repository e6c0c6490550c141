//! Shared domain types for prescription records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Literal returned for fields the model could not read.
pub const NOT_FOUND: &str = "Not Found";

/// A saved prescription record, owned by one user.
///
/// Records are created on save and deleted individually; corrections happen
/// client-side before save, so records are never mutated in place.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionRecord {
    pub id: Uuid,
    pub doctor_name: String,
    pub disease: String,
    /// Medicine entries in prescription order.
    pub medicines: Vec<String>,
    /// Prescribed tests in prescription order.
    pub tests: Vec<String>,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

/// One row of the medicine-frequency aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedicineCount {
    pub name: String,
    pub count: u32,
}
