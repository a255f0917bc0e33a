//! Multipart image upload.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::{audit, metrics};
use crate::security::client_ip::client_identifier;
use crate::security::{sanitize_file_name, screen_upload};
use crate::simulation::{AcceptedUpload, UploadRecord};
use crate::validation::{check_file, FileDescriptor};

/// The fields of an upload form this endpoint understands.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<FileDescriptor>,
    bucket: Option<String>,
}

/// A body cut off by the request size limit is 413; anything else is 400.
fn multipart_error(context: &str, e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Upload exceeds the request size limit".to_string())
    } else {
        ApiError::BadRequest(format!("{context}: {e}"))
    }
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart", e))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                if form.file.is_some() {
                    return Err(ApiError::BadRequest(
                        "Multiple file fields are not allowed".to_string(),
                    ));
                }
                let name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Failed to read file data", e))?;
                form.file = Some(FileDescriptor::new(name, data.len() as u64, mime_type));
            }
            "bucket" => {
                let bucket = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Failed to read bucket", e))?;
                let bucket = bucket.trim();
                if !bucket.is_empty() {
                    form.bucket = Some(bucket.to_string());
                }
            }
            other => tracing::debug!(field = %other, "Ignoring unknown upload field"),
        }
    }
    Ok(form)
}

/// `POST /api/upload`
///
/// The raw file name is screened first; the stored name is the sanitized one
/// and must still pass file validation.
pub async fn upload_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadRecord>, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let form = read_form(multipart).await?;
    let file = form
        .file
        .ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;

    let config = state.config();
    if config.security.screen_uploads {
        if let Err(rejection) = screen_upload(&file) {
            let client = client_identifier(&headers);
            metrics::record_upload_rejection(rejection.reason());
            audit::log_security_event("upload_rejected", &client, "/api/upload", &headers);
            return Err(rejection.into());
        }
    }

    let sanitized = FileDescriptor::new(sanitize_file_name(&file.name), file.size, file.mime_type);
    if let Err(e) = check_file(&sanitized) {
        metrics::record_validation_failure("file", e.check);
        return Err(e.into());
    }

    let format = sanitized.format().map_or("unknown", |f| f.as_str());
    metrics::record_upload(format);

    let record = state.engine.register_upload(AcceptedUpload {
        filename: sanitized.name,
        size: sanitized.size,
        mime_type: sanitized.mime_type,
        bucket: form
            .bucket
            .unwrap_or_else(|| config.simulation.default_bucket.clone()),
    });
    Ok(Json(record))
}
