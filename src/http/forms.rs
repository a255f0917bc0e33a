//! Server-side form validation and sanitization for UI collaborators.
//!
//! Validation endpoints always answer with a `ValidationResult`: 200 when the
//! payload passes, 422 when it does not.

use axum::{body::Bytes, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::observability::metrics;
use crate::security::{
    sanitize_effect_name, sanitize_file_name, sanitize_input, sanitize_region_name,
};
use crate::validation::{
    parse_effect, parse_export_options, parse_file, parse_region, ValidationError, ValidationResult,
};

type FormResponse = (StatusCode, Json<ValidationResult>);

fn respond<T>(
    entity: &'static str,
    body: &[u8],
    fallback: &'static str,
    parse: fn(&Value) -> Result<T, ValidationError>,
) -> FormResponse {
    let outcome = serde_json::from_slice::<Value>(body)
        .map_err(|_| ValidationError::malformed(fallback))
        .and_then(|value| parse(&value));

    match outcome {
        Ok(_) => (StatusCode::OK, Json(ValidationResult::ok())),
        Err(e) => {
            metrics::record_validation_failure(entity, e.check);
            tracing::debug!(entity, check = e.check, "Form validation failed");
            (StatusCode::UNPROCESSABLE_ENTITY, Json(ValidationResult::fail(e.message)))
        }
    }
}

/// `POST /api/validate/file`
pub async fn validate_file(body: Bytes) -> FormResponse {
    respond("file", &body, "Invalid file", parse_file)
}

/// `POST /api/validate/region`
pub async fn validate_region(body: Bytes) -> FormResponse {
    respond("region", &body, "Invalid region data", parse_region)
}

/// `POST /api/validate/effect`
pub async fn validate_effect(body: Bytes) -> FormResponse {
    respond("effect", &body, "Invalid effect data", parse_effect)
}

/// `POST /api/validate/export`
pub async fn validate_export(body: Bytes) -> FormResponse {
    respond("export", &body, "Invalid export options", parse_export_options)
}

/// Fields accepted by the sanitize endpoint; absent fields stay absent.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizeFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl SanitizeFields {
    pub fn sanitized(&self) -> Self {
        Self {
            file_name: self.file_name.as_deref().map(sanitize_file_name),
            region_name: self.region_name.as_deref().map(sanitize_region_name),
            effect_name: self.effect_name.as_deref().map(sanitize_effect_name),
            text: self.text.as_deref().map(sanitize_input),
        }
    }
}

/// `POST /api/sanitize`
pub async fn sanitize(Json(fields): Json<SanitizeFields>) -> Json<SanitizeFields> {
    Json(fields.sanitized())
}
