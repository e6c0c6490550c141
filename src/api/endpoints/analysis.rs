//! Analysis endpoints — medicine-frequency aggregation and PDF export.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db::records::medicine_frequency;
use crate::models::MedicineCount;
use crate::report;

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub medicines: Vec<MedicineCount>,
}

/// `GET /api/analysis` — how often each medicine appears across the user's
/// saved records.
pub async fn frequency(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    let medicines = medicine_frequency(&conn, &user.user_id)?;
    Ok(Json(AnalysisResponse { medicines }))
}

/// `GET /api/analysis/pdf` — the same aggregation as a downloadable PDF.
pub async fn export_pdf(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Response, ApiError> {
    let conn = ctx.state.open_db()?;
    let counts = medicine_frequency(&conn, &user.user_id)?;
    let pdf = report::generate_analysis_pdf(&counts)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"medicine-analysis.pdf\"",
            ),
        ],
        pdf,
    )
        .into_response())
}
