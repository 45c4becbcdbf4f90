// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session and authorization types and services.
//!
//! The session is an explicitly passed value built from `auth/me/`; there
//! is no process-wide signed-in user.

use duty_roster_audit::Actor;
use duty_roster_backend::{AuthUserRecord, BackendClient};
use std::collections::HashSet;
use tracing::debug;

use crate::error::{ApiError, AuthError, translate_backend_error};

/// Permission slugs checked by the roster.
pub mod permissions {
    /// Create duties on a chart.
    pub const CREATE_DUTY: &str = "duties.create_duty";
    /// Edit a chart's name and schedules.
    pub const EDIT_CHART: &str = "duties.edit_chart";
    /// Create charts.
    pub const CREATE_CHART: &str = "duties.create_chart";
    /// Create charts for offices the user does not manage.
    pub const CREATE_ANY_OFFICE_CHART: &str = "duties.create_any_office_chart";
    /// Work with employees and charts of any office.
    pub const ASSIGN_ANY_OFFICE_EMPLOYEE: &str = "duties.assign_any_office_employee";
    /// Delete duties.
    pub const DELETE_DUTY: &str = "duties.delete";
    /// Delete charts.
    pub const DELETE_CHART: &str = "duties.delete_chart";
    /// Export charts.
    pub const EXPORT_CHART: &str = "duties.export_chart";
}

/// User roles as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Manages every office.
    SuperAdmin,
    /// Manages its own primary and secondary offices.
    OfficeAdmin,
    /// Network administrator.
    NetworkAdmin,
    /// Regular employee.
    User,
}

impl Role {
    /// Parses a backend role slug.
    ///
    /// Unknown slugs map to [`Role::User`], the least privileged role.
    #[must_use]
    pub fn from_slug(slug: &str) -> Self {
        match slug.trim().to_uppercase().as_str() {
            "SUPERADMIN" => Self::SuperAdmin,
            "OFFICE_ADMIN" => Self::OfficeAdmin,
            "NETWORK_ADMIN" => Self::NetworkAdmin,
            "USER" => Self::User,
            other => {
                debug!(role = other, "Unknown role slug, treating as USER");
                Self::User
            }
        }
    }

    /// The backend slug of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPERADMIN",
            Self::OfficeAdmin => "OFFICE_ADMIN",
            Self::NetworkAdmin => "NETWORK_ADMIN",
            Self::User => "USER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Backend user id.
    pub id: i64,
    /// Display name.
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Organization-issued employee number.
    pub employee_id: Option<String>,
    /// Role.
    pub role: Role,
    /// Primary office.
    pub office_id: Option<i64>,
    /// Additional managed offices.
    pub secondary_offices: Vec<i64>,
    /// Granted permission slugs.
    pub permissions: HashSet<String>,
}

impl AuthUser {
    /// Returns whether the user was granted `slug`.
    #[must_use]
    pub fn has_permission(&self, slug: &str) -> bool {
        self.permissions.contains(slug)
    }

    /// Returns whether the user has `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Returns whether the user manages `office_id`.
    ///
    /// Superadmins manage every office; everyone else manages their primary
    /// office and their secondary offices.
    #[must_use]
    pub fn can_manage_office(&self, office_id: i64) -> bool {
        self.role == Role::SuperAdmin
            || self.office_id == Some(office_id)
            || self.secondary_offices.contains(&office_id)
    }

    /// Converts this user into an audit actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.to_string(), self.role.as_str().to_lowercase())
    }
}

impl From<AuthUserRecord> for AuthUser {
    fn from(record: AuthUserRecord) -> Self {
        Self {
            id: record.id,
            full_name: record.full_name,
            email: record.email,
            employee_id: record.employee_id,
            role: Role::from_slug(&record.role),
            office_id: record.office_id,
            secondary_offices: record.secondary_offices,
            permissions: record.permissions.into_iter().collect(),
        }
    }
}

/// A signed-in user together with the backend client carrying their tokens.
#[derive(Debug, Clone)]
pub struct Session {
    /// The signed-in user.
    pub user: AuthUser,
    /// Client authenticated as `user`.
    pub client: BackendClient,
}

impl Session {
    /// Builds a session from an already-authenticated client.
    #[must_use]
    pub const fn new(user: AuthUser, client: BackendClient) -> Self {
        Self { user, client }
    }

    /// Resolves the signed-in user with `auth/me/`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationFailed` if the backend rejects the token.
    pub async fn establish(client: BackendClient) -> Result<Self, ApiError> {
        let record: AuthUserRecord = client.current_user().await.map_err(|e| {
            if matches!(e.status(), Some(401 | 403)) {
                ApiError::from(AuthError::AuthenticationFailed {
                    reason: String::from("Invalid or expired access token"),
                })
            } else {
                translate_backend_error(e, "Failed to load the signed-in user")
            }
        })?;
        let user: AuthUser = AuthUser::from(record);
        debug!(user_id = user.id, role = %user.role, "Session established");
        Ok(Self { user, client })
    }

    /// Shorthand for [`AuthUser::has_permission`].
    #[must_use]
    pub fn has_permission(&self, slug: &str) -> bool {
        self.user.has_permission(slug)
    }

    /// Shorthand for [`AuthUser::can_manage_office`].
    #[must_use]
    pub fn can_manage_office(&self, office_id: i64) -> bool {
        self.user.can_manage_office(office_id)
    }
}

/// Authorization service for roster mutations.
///
/// Each action combines a permission slug with an office-ownership check.
/// The backend enforces the same rules; these checks only stop requests
/// that would be refused anyway.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if a user may create duties on a chart of `chart_office_id`.
    ///
    /// Requires `duties.create_duty` and that the user manages the office.
    /// The any-office permission does not apply here.
    ///
    /// # Errors
    ///
    /// Returns an error naming the missing permission or the office restriction.
    pub fn authorize_create_duty(user: &AuthUser, chart_office_id: i64) -> Result<(), AuthError> {
        if !user.has_permission(permissions::CREATE_DUTY) {
            return Err(AuthError::Unauthorized {
                action: String::from("create_duty"),
                message: String::from("You do not have permission to assign duties."),
            });
        }
        if !user.can_manage_office(chart_office_id) {
            return Err(AuthError::Unauthorized {
                action: String::from("create_duty"),
                message: String::from("Office Admin can only assign Duty for His Office"),
            });
        }
        Ok(())
    }

    /// Checks if a user may edit a chart of `chart_office_id`.
    ///
    /// Requires `duties.edit_chart` and either office management or
    /// `duties.assign_any_office_employee`.
    ///
    /// # Errors
    ///
    /// Returns an error if either check fails.
    pub fn authorize_edit_chart(user: &AuthUser, chart_office_id: i64) -> Result<(), AuthError> {
        if !user.has_permission(permissions::EDIT_CHART) {
            return Err(AuthError::Unauthorized {
                action: String::from("edit_chart"),
                message: String::from("You do not have permission to edit duty charts."),
            });
        }
        if !user.can_manage_office(chart_office_id)
            && !user.has_permission(permissions::ASSIGN_ANY_OFFICE_EMPLOYEE)
        {
            return Err(AuthError::Unauthorized {
                action: String::from("edit_chart"),
                message: String::from("You can only edit duty charts of offices you manage."),
            });
        }
        Ok(())
    }

    /// Checks if a user may create a chart for `office_id`.
    ///
    /// Requires `duties.create_chart` and either office management or
    /// `duties.create_any_office_chart`.
    ///
    /// # Errors
    ///
    /// Returns an error if either check fails.
    pub fn authorize_create_chart(user: &AuthUser, office_id: i64) -> Result<(), AuthError> {
        if !user.has_permission(permissions::CREATE_CHART) {
            return Err(AuthError::Unauthorized {
                action: String::from("create_chart"),
                message: String::from("You do not have permission to create duty charts."),
            });
        }
        if !user.can_manage_office(office_id)
            && !user.has_permission(permissions::CREATE_ANY_OFFICE_CHART)
        {
            return Err(AuthError::Unauthorized {
                action: String::from("create_chart"),
                message: String::from("You can only create duty charts for offices you manage."),
            });
        }
        Ok(())
    }

    /// Checks if a user may delete duties.
    ///
    /// # Errors
    ///
    /// Returns an error without `duties.delete`.
    pub fn authorize_delete_duty(user: &AuthUser) -> Result<(), AuthError> {
        Self::require(
            user,
            permissions::DELETE_DUTY,
            "delete_duty",
            "You do not have permission to delete duties.",
        )
    }

    /// Checks if a user may delete charts.
    ///
    /// # Errors
    ///
    /// Returns an error without `duties.delete_chart`.
    pub fn authorize_delete_chart(user: &AuthUser) -> Result<(), AuthError> {
        Self::require(
            user,
            permissions::DELETE_CHART,
            "delete_chart",
            "You do not have permission to delete duty charts.",
        )
    }

    /// Checks if a user may export charts.
    ///
    /// # Errors
    ///
    /// Returns an error without `duties.export_chart`.
    pub fn authorize_export_chart(user: &AuthUser) -> Result<(), AuthError> {
        Self::require(
            user,
            permissions::EXPORT_CHART,
            "export_chart",
            "You do not have permission to export duty charts.",
        )
    }

    fn require(user: &AuthUser, slug: &str, action: &str, message: &str) -> Result<(), AuthError> {
        if user.has_permission(slug) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                message: message.to_string(),
            })
        }
    }
}
