// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use duty_roster_domain::DomainError;

/// Errors that can occur while talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The configured host does not form a valid URL.
    InvalidUrl(String),
    /// The request could not be sent or the response not read.
    Transport(String),
    /// The backend answered with a non-success status.
    ///
    /// The body is kept verbatim so callers can surface the backend's message.
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// The access token was rejected and could not be refreshed.
    SessionExpired,
    /// A response body did not match the expected shape.
    Decode(String),
    /// A record decoded but holds values the roster cannot represent.
    InvalidRecord(String),
}

impl BackendError {
    /// Returns the HTTP status for `Status` errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw error body for `Status` errors.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl(msg) => write!(f, "Invalid backend URL: {msg}"),
            Self::Transport(msg) => write!(f, "Backend request failed: {msg}"),
            Self::Status { status, body } => write!(f, "Backend returned {status}: {body}"),
            Self::SessionExpired => write!(f, "Session expired, please sign in again"),
            Self::Decode(msg) => write!(f, "Unexpected backend response: {msg}"),
            Self::InvalidRecord(msg) => write!(f, "Invalid backend record: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<DomainError> for BackendError {
    fn from(err: DomainError) -> Self {
        Self::InvalidRecord(err.to_string())
    }
}
