// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what actions a user is permitted to perform. They
//! are advisory only and do not replace backend authorization checks.

use crate::auth::{AuthUser, AuthorizationService, permissions};
use crate::request_response::{Capability, ChartCapabilities, GlobalCapabilities};
use duty_roster_domain::{DutyChart, Office};

/// Computes chart-independent capabilities for a user.
#[must_use]
pub fn compute_global_capabilities(user: &AuthUser) -> GlobalCapabilities {
    GlobalCapabilities {
        can_create_chart: Capability::from_bool(user.has_permission(permissions::CREATE_CHART)),
        can_create_any_office_chart: Capability::from_bool(
            user.has_permission(permissions::CREATE_CHART)
                && user.has_permission(permissions::CREATE_ANY_OFFICE_CHART),
        ),
        can_assign_any_office_employee: Capability::from_bool(
            user.has_permission(permissions::ASSIGN_ANY_OFFICE_EMPLOYEE),
        ),
        can_delete_duty: Capability::from_bool(AuthorizationService::authorize_delete_duty(user).is_ok()),
        can_delete_chart: Capability::from_bool(
            AuthorizationService::authorize_delete_chart(user).is_ok(),
        ),
        can_export_chart: Capability::from_bool(
            AuthorizationService::authorize_export_chart(user).is_ok(),
        ),
    }
}

/// Computes what a user may do on one chart.
///
/// Each flag is exactly the outcome of the matching authorization check.
#[must_use]
pub fn compute_chart_capabilities(user: &AuthUser, chart: &DutyChart) -> ChartCapabilities {
    ChartCapabilities {
        chart_id: chart.id,
        can_create_duty: Capability::from_bool(
            AuthorizationService::authorize_create_duty(user, chart.office_id).is_ok(),
        ),
        can_edit_chart: Capability::from_bool(
            AuthorizationService::authorize_edit_chart(user, chart.office_id).is_ok(),
        ),
        can_delete_duty: Capability::from_bool(AuthorizationService::authorize_delete_duty(user).is_ok()),
        can_delete_chart: Capability::from_bool(
            AuthorizationService::authorize_delete_chart(user).is_ok(),
        ),
        can_export_chart: Capability::from_bool(
            AuthorizationService::authorize_export_chart(user).is_ok(),
        ),
    }
}

/// Filters offices to those offered in pickers.
///
/// An office is offered when the user manages it or holds
/// `duties.assign_any_office_employee`.
#[must_use]
pub fn manageable_offices(user: &AuthUser, offices: Vec<Office>) -> Vec<Office> {
    let any_office: bool = user.has_permission(permissions::ASSIGN_ANY_OFFICE_EMPLOYEE);
    offices
        .into_iter()
        .filter(|office| any_office || user.can_manage_office(office.id))
        .collect()
}
