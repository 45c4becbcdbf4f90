// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use duty_roster::CoreError;
use duty_roster_backend::BackendError;
use duty_roster_domain::DomainError;
use serde_json::Value;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The message shown to the user.
        message: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { message, .. } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core/backend errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The session could not be renewed; the user must sign in again.
    SessionExpired,
    /// Authorization failed - the user does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The message shown to the user.
        message: String,
    },
    /// A roster rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The backend refused or failed a request.
    Backend {
        /// HTTP status from the backend, if it answered.
        status: Option<u16>,
        /// The unwrapped backend message.
        message: String,
    },
    /// CSV content could not be read.
    InvalidCsvFormat {
        /// Why the CSV was rejected.
        reason: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::SessionExpired => write!(f, "Session expired, please sign in again"),
            Self::Unauthorized { message, .. }
            | Self::DomainRuleViolation { message, .. }
            | Self::InvalidInput { message, .. }
            | Self::ResourceNotFound { message, .. }
            | Self::Backend { message, .. } => write!(f, "{message}"),
            Self::InvalidCsvFormat { reason } => write!(f, "Invalid CSV format: {reason}"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized { action, message } => Self::Unauthorized { action, message },
        }
    }
}

/// Translates a domain error into an API error.
///
/// Messages are the domain's own user-facing text.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidShiftTime(_) | DomainError::InvalidScheduleTimes { .. } => {
            ApiError::InvalidInput {
                field: String::from("time"),
                message,
            }
        }
        DomainError::DateParseError { .. }
        | DomainError::DateArithmeticOverflow { .. }
        | DomainError::BsYearOutOfRange { .. }
        | DomainError::GregorianDateOutOfRange { .. }
        | DomainError::InvalidBsDate { .. }
        | DomainError::InvalidDateRange { .. } => ApiError::InvalidInput {
            field: String::from("date"),
            message,
        },
        DomainError::InvalidChartDates { .. } => ApiError::InvalidInput {
            field: String::from("end_date"),
            message,
        },
        DomainError::MissingEmployee => ApiError::InvalidInput {
            field: String::from("user_id"),
            message,
        },
        DomainError::MissingShift => ApiError::InvalidInput {
            field: String::from("schedule_id"),
            message,
        },
        DomainError::InvalidChartName(_) => ApiError::InvalidInput {
            field: String::from("name"),
            message,
        },
        DomainError::InvalidTimezone(_) => ApiError::InvalidInput {
            field: String::from("timezone"),
            message,
        },
        DomainError::NoNewSchedules => ApiError::InvalidInput {
            field: String::from("schedule_ids"),
            message,
        },
        DomainError::EmptyChartUpdate => ApiError::InvalidInput {
            field: String::from("body"),
            message,
        },
        DomainError::ScheduleNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Schedule"),
            message,
        },
        DomainError::DutyNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Duty"),
            message,
        },
        DomainError::NoChartSelected => ApiError::ResourceNotFound {
            resource_type: String::from("Duty chart"),
            message,
        },
        DomainError::DutyBeforeChartStart { .. } | DomainError::DutyAfterChartEnd { .. } => {
            ApiError::DomainRuleViolation {
                rule: String::from("duty_within_chart"),
                message,
            }
        }
        DomainError::BackdatedDuty { .. } => ApiError::DomainRuleViolation {
            rule: String::from("no_backdated_duty"),
            message,
        },
        DomainError::ShiftOverlap { .. } => ApiError::DomainRuleViolation {
            rule: String::from("no_overlapping_shifts"),
            message,
        },
        DomainError::DuplicateDutyForDay { .. } => ApiError::DomainRuleViolation {
            rule: String::from("one_duty_per_day"),
            message,
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a backend error into an API error.
///
/// # Arguments
///
/// * `err` - The backend error
/// * `fallback` - Message used when the backend body carries none
#[must_use]
pub fn translate_backend_error(err: BackendError, fallback: &str) -> ApiError {
    match err {
        BackendError::SessionExpired => ApiError::SessionExpired,
        BackendError::Status { status, body } => {
            let message: String = extract_backend_message(&body, fallback);
            match status {
                403 => ApiError::Unauthorized {
                    action: String::from("backend"),
                    message,
                },
                404 => ApiError::ResourceNotFound {
                    resource_type: String::from("Resource"),
                    message,
                },
                400 | 409 | 422 => ApiError::DomainRuleViolation {
                    rule: String::from("backend_validation"),
                    message,
                },
                _ => ApiError::Backend {
                    status: Some(status),
                    message,
                },
            }
        }
        BackendError::Transport(_) => ApiError::Backend {
            status: None,
            message: fallback.to_string(),
        },
        BackendError::InvalidUrl(msg) | BackendError::Decode(msg) | BackendError::InvalidRecord(msg) => {
            ApiError::Internal { message: msg }
        }
    }
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_message),
        _ => None,
    }
}

/// Extracts the single message to show for a backend error body.
///
/// Precedence: a bare JSON string, then `non_field_errors` (first entry if a
/// list), then `detail`, then the first field error. Field errors are
/// visited in the order the backend sent them. Anything else yields `fallback`.
#[must_use]
pub fn extract_backend_message(body: &str, fallback: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback.to_string();
    };

    match value {
        Value::String(s) if !s.trim().is_empty() => s,
        Value::Object(map) => map
            .get("non_field_errors")
            .and_then(first_message)
            .or_else(|| map.get("detail").and_then(first_message))
            .or_else(|| map.values().find_map(first_message))
            .unwrap_or_else(|| fallback.to_string()),
        _ => fallback.to_string(),
    }
}
