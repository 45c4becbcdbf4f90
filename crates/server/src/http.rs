// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use duty_roster_api::ApiError;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error indicator.
    pub error: bool,
    /// Error message.
    pub message: String,
    /// The offending field for input errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Wrapper for converting API errors into HTTP responses.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
    pub field: Option<String>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
            field: self.field,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } | ApiError::SessionExpired => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } | ApiError::InvalidCsvFormat { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Backend { status, message } => {
                warn!(?status, %message, "Backend request failed");
                StatusCode::BAD_GATEWAY
            }
            ApiError::Internal { message } => {
                error!(%message, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let field: Option<String> = match &err {
            ApiError::InvalidInput { field, .. } => Some(field.clone()),
            _ => None,
        };
        let message: String = match err {
            ApiError::InvalidInput { message, .. }
            | ApiError::Unauthorized { message, .. }
            | ApiError::DomainRuleViolation { message, .. }
            | ApiError::ResourceNotFound { message, .. }
            | ApiError::Backend { message, .. } => message,
            other => other.to_string(),
        };

        Self {
            status,
            message,
            field,
        }
    }
}
