// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_office_admin, create_test_user, create_test_viewer};
use crate::{AuthError, AuthUser, AuthorizationService, Role, permissions};

#[test]
fn test_create_duty_requires_permission() {
    let viewer: AuthUser = create_test_viewer();

    let result: Result<(), AuthError> = AuthorizationService::authorize_create_duty(&viewer, 3);

    assert!(matches!(
        result,
        Err(AuthError::Unauthorized { ref action, .. }) if action == "create_duty"
    ));
}

#[test]
fn test_create_duty_limited_to_managed_offices() {
    let admin: AuthUser = create_test_office_admin();

    assert!(AuthorizationService::authorize_create_duty(&admin, 3).is_ok());
    let Err(AuthError::Unauthorized { message, .. }) =
        AuthorizationService::authorize_create_duty(&admin, 4)
    else {
        panic!("expected an office restriction");
    };
    assert_eq!(message, "Office Admin can only assign Duty for His Office");
}

#[test]
fn test_any_office_permission_does_not_widen_duty_creation() {
    let user: AuthUser = create_test_user(
        Role::NetworkAdmin,
        Some(3),
        &[permissions::CREATE_DUTY, permissions::ASSIGN_ANY_OFFICE_EMPLOYEE],
    );

    assert!(AuthorizationService::authorize_create_duty(&user, 4).is_err());
}

#[test]
fn test_secondary_offices_are_managed() {
    let mut admin: AuthUser = create_test_office_admin();
    admin.secondary_offices = vec![9];

    assert!(AuthorizationService::authorize_create_duty(&admin, 9).is_ok());
    assert!(AuthorizationService::authorize_edit_chart(&admin, 9).is_ok());
}

#[test]
fn test_superadmin_manages_every_office() {
    let user: AuthUser = create_test_user(Role::SuperAdmin, None, &[permissions::CREATE_DUTY]);

    assert!(AuthorizationService::authorize_create_duty(&user, 77).is_ok());
}

#[test]
fn test_edit_chart_of_other_office_needs_any_office_permission() {
    let admin: AuthUser = create_test_office_admin();
    assert!(AuthorizationService::authorize_edit_chart(&admin, 4).is_err());

    let mut network: AuthUser = create_test_office_admin();
    network
        .permissions
        .insert(permissions::ASSIGN_ANY_OFFICE_EMPLOYEE.to_string());
    assert!(AuthorizationService::authorize_edit_chart(&network, 4).is_ok());
}

#[test]
fn test_create_chart_for_other_office_needs_any_office_chart() {
    let admin: AuthUser = create_test_office_admin();
    assert!(AuthorizationService::authorize_create_chart(&admin, 3).is_ok());
    assert!(AuthorizationService::authorize_create_chart(&admin, 4).is_err());

    let mut wide: AuthUser = create_test_office_admin();
    wide.permissions
        .insert(permissions::CREATE_ANY_OFFICE_CHART.to_string());
    assert!(AuthorizationService::authorize_create_chart(&wide, 4).is_ok());
}

#[test]
fn test_any_office_chart_alone_is_not_enough() {
    let user: AuthUser =
        create_test_user(Role::NetworkAdmin, Some(3), &[permissions::CREATE_ANY_OFFICE_CHART]);

    assert!(AuthorizationService::authorize_create_chart(&user, 4).is_err());
}

#[test]
fn test_delete_and_export_are_permission_only() {
    let admin: AuthUser = create_test_office_admin();
    let viewer: AuthUser = create_test_viewer();

    assert!(AuthorizationService::authorize_delete_duty(&admin).is_ok());
    assert!(AuthorizationService::authorize_delete_chart(&admin).is_ok());
    assert!(AuthorizationService::authorize_export_chart(&admin).is_ok());
    assert!(AuthorizationService::authorize_delete_duty(&viewer).is_err());
    assert!(AuthorizationService::authorize_delete_chart(&viewer).is_err());
    assert!(AuthorizationService::authorize_export_chart(&viewer).is_err());
}

#[test]
fn test_role_slugs_round_trip() {
    assert_eq!(Role::from_slug("superadmin"), Role::SuperAdmin);
    assert_eq!(Role::from_slug("office_admin"), Role::OfficeAdmin);
    assert_eq!(Role::from_slug("something-else"), Role::User);
}
