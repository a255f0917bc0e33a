//! HTTP error responses.
//!
//! Every error body is `{ "error": "<message>" }`.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::security::rate_limit::X_RATELIMIT_REMAINING;
use crate::security::UploadRejection;
use crate::validation::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Rejected(#[from] UploadRejection),

    #[error("Too many requests, please try again later")]
    RateLimited { retry_after_secs: u64 },

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) | Self::Rejected(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "Request failed");
        }

        let mut response = (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response();

        if let Self::RateLimited { retry_after_secs } = self {
            let headers = response.headers_mut();
            headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
            headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from_static("0"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Validation(ValidationError::malformed("Invalid file")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::RateLimited { retry_after_secs: 1 }.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::PayloadTooLarge("big".into()).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = ApiError::from(ValidationError::malformed("Invalid region data"));
        assert_eq!(err.to_string(), "Invalid region data");
        assert_eq!(
            ApiError::from(UploadRejection::SuspiciousName).to_string(),
            "Invalid file name detected"
        );
    }

    #[test]
    fn test_rate_limited_headers() {
        let response = ApiError::RateLimited { retry_after_secs: 900 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "900");
        assert_eq!(response.headers()[X_RATELIMIT_REMAINING], "0");
    }
}
