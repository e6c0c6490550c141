//! `POST /api/scan` — prescription image → structured fields.
//!
//! Accepts multipart form data with one `image` field, forwards the image
//! to the vision model with the extraction prompt, and parses the free-text
//! reply. Nothing is persisted here; the client corrects the fields and
//! saves via `POST /api/records`.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::extraction;

/// Maximum accepted image size (8 MB).
pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub doctor_name: String,
    pub disease: String,
    pub medicines: Vec<String>,
    pub tests: Vec<String>,
}

pub async fn scan(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Json<ScanResponse>, ApiError> {
    let image = read_image_field(multipart).await?;
    check_image_size(image.len())?;

    let mime_type = detect_image_mime(&image)
        .ok_or_else(|| ApiError::BadRequest("Unsupported image format (use JPEG, PNG, or WebP)".into()))?;

    let reply = ctx
        .state
        .vision
        .transcribe(&image, mime_type, extraction::EXTRACTION_PROMPT)
        .await?;

    tracing::debug!(reply_len = reply.len(), "Model reply received");
    let parsed = extraction::parse_reply(&reply);
    tracing::info!(
        medicines = parsed.medicines.len(),
        tests = parsed.tests.len(),
        "Prescription scanned"
    );

    Ok(Json(ScanResponse {
        doctor_name: parsed.doctor_name,
        disease: parsed.disease,
        medicines: parsed.medicines,
        tests: parsed.tests,
    }))
}

fn check_image_size(len: usize) -> Result<(), ApiError> {
    if len > MAX_IMAGE_BYTES {
        return Err(ApiError::BadRequest(format!(
            "Image exceeds {} MB size limit",
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Pull the bytes of the `image` field out of the multipart body.
async fn read_image_field(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read image field: {e}")))?;
        if bytes.is_empty() {
            return Err(ApiError::BadRequest("Uploaded image is empty".into()));
        }
        return Ok(bytes.to_vec());
    }
    Err(ApiError::BadRequest("No file uploaded".into()))
}

/// Detect the image MIME type from magic bytes.
///
/// Client-supplied content types are untrusted; the bytes decide.
fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() >= 3 && bytes[0..3] == [0xFF, 0xD8, 0xFF] {
        Some("image/jpeg")
    } else if bytes.len() >= 8 && bytes[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        Some("image/png")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_jpeg() {
        assert_eq!(detect_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
    }

    #[test]
    fn detect_png() {
        assert_eq!(
            detect_image_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            Some("image/png")
        );
    }

    #[test]
    fn detect_webp() {
        let mut bytes = b"RIFF\x00\x00\x00\x00WEBP".to_vec();
        bytes.extend_from_slice(b"VP8 ");
        assert_eq!(detect_image_mime(&bytes), Some("image/webp"));
    }

    #[test]
    fn reject_non_image() {
        assert_eq!(detect_image_mime(b"%PDF-1.4"), None);
        assert_eq!(detect_image_mime(b""), None);
    }

    #[test]
    fn image_at_cap_is_accepted() {
        assert!(check_image_size(MAX_IMAGE_BYTES).is_ok());
    }

    #[test]
    fn oversized_image_is_rejected() {
        let err = check_image_size(MAX_IMAGE_BYTES + 1).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert!(err.to_string().contains("8 MB"));
    }
}
