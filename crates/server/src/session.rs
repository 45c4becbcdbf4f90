// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! The gateway holds no sessions of its own. Each request carries the
//! backend's access token, and the signed-in user is resolved from it.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use duty_roster_api::{ApiError, Session};
use duty_roster_audit::Cause;
use duty_roster_backend::{BackendClient, TokenStore, Tokens};
use tracing::{debug, warn};

use crate::AppState;
use crate::http::HttpError;

/// Header carrying the refresh token, used when the access token expires.
pub const REFRESH_TOKEN_HEADER: &str = "X-Refresh-Token";
/// Header whose value becomes the id of the audit cause.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Extractor for signed-in users.
///
/// Reads `Authorization: Bearer <access token>`, resolves the user with the
/// backend and derives the audit cause of the request.
///
/// # Errors
///
/// Returns HTTP 401 if the header is missing or malformed, or if the backend
/// rejects the token.
pub struct RequestSession {
    pub session: Session,
    pub cause: Cause,
}

impl FromRequestParts<AppState> for RequestSession {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let access: &str = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                warn!("Authorization header does not start with 'Bearer '");
                SessionError::InvalidAuthorizationHeader
            })?;

        let refresh: Option<String> = parts
            .headers
            .get(REFRESH_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(String::from);

        let client: BackendClient = state.client.with_tokens(TokenStore::with_tokens(Tokens {
            access: access.to_string(),
            refresh,
        }));
        let session: Session = Session::establish(client).await.map_err(|e| {
            warn!(error = %e, "Session validation failed");
            SessionError::Rejected(e)
        })?;

        let cause: Cause = request_cause(parts);
        debug!(
            user_id = session.user.id,
            role = %session.user.role,
            cause_id = %cause.id,
            "Session validated successfully"
        );

        Ok(Self { session, cause })
    }
}

/// Builds the audit cause of a request.
fn request_cause(parts: &Parts) -> Cause {
    let description: String = format!("{} {}", parts.method, parts.uri.path());
    let id: String = parts
        .headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map_or_else(|| description.clone(), String::from);
    Cause::new(id, description)
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// The backend did not accept the token.
    Rejected(ApiError),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: &str = match self {
            Self::MissingAuthorizationHeader => "Missing Authorization header",
            Self::InvalidAuthorizationHeader => {
                "Invalid Authorization header format. Expected: 'Bearer <token>'"
            }
            Self::Rejected(err) => return HttpError::from(err).into_response(),
        };

        HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: message.to_string(),
            field: None,
        }
        .into_response()
    }
}
