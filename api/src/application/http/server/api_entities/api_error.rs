use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use incognito_core::domain::common::entities::app_errors::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    BadGateway(String),
    #[error("{0}")]
    InternalServerError(String),
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ApiErrorResponse {
    pub code: String,
    pub status: u16,
    pub message: String,
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::MissingInput => ApiError::BadRequest(error.to_string()),
            CoreError::ProductNotFound => ApiError::NotFound(error.to_string()),
            CoreError::GenerationFailed(reason) => {
                error!("analysis generation failed: {}", reason);
                ApiError::InternalServerError("AI analysis failed".to_string())
            }
            CoreError::ExternalServiceError(reason) => {
                error!("upstream service failed: {}", reason);
                ApiError::BadGateway("Upstream service unavailable".to_string())
            }
            CoreError::InvalidConfiguration(reason) => {
                error!("invalid configuration: {}", reason);
                ApiError::InternalServerError("Internal server error".to_string())
            }
            CoreError::InternalServerError => {
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "E_BAD_REQUEST"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "E_NOT_FOUND"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "E_PAYLOAD_TOO_LARGE"),
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "E_BAD_GATEWAY"),
            ApiError::InternalServerError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "E_INTERNAL_SERVER_ERROR")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let body = ApiErrorResponse {
            code: code.to_string(),
            status: status.as_u16(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_status_mapping() {
        let cases = [
            (CoreError::MissingInput, StatusCode::BAD_REQUEST),
            (CoreError::ProductNotFound, StatusCode::NOT_FOUND),
            (
                CoreError::GenerationFailed("bad json".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                CoreError::ExternalServiceError("timeout".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (CoreError::InternalServerError, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (core_error, expected) in cases {
            assert_eq!(ApiError::from(core_error).parts().0, expected);
        }
    }

    #[test]
    fn test_messages_do_not_leak_details() {
        let error = ApiError::from(CoreError::GenerationFailed("raw model text".to_string()));
        assert_eq!(error.to_string(), "AI analysis failed");

        let error = ApiError::from(CoreError::MissingInput);
        assert_eq!(error.to_string(), "Provide product name or image");
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::NotFound("Product not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
