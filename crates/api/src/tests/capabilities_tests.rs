// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    create_test_chart, create_test_office_admin, create_test_state, create_test_user,
    create_test_viewer,
};
use crate::{
    AuthUser, CapabilitiesResponse, Capability, ChartCapabilities, GlobalCapabilities, Role,
    compute_chart_capabilities, compute_global_capabilities, get_capabilities, manageable_offices,
    permissions,
};
use duty_roster::RosterState;
use duty_roster_domain::{DutyChart, Office};

#[test]
fn test_office_admin_global_capabilities() {
    let admin: AuthUser = create_test_office_admin();

    let global: GlobalCapabilities = compute_global_capabilities(&admin);

    assert_eq!(global.can_create_chart, Capability::Allowed);
    assert_eq!(global.can_create_any_office_chart, Capability::Denied);
    assert_eq!(global.can_assign_any_office_employee, Capability::Denied);
    assert_eq!(global.can_delete_duty, Capability::Allowed);
    assert_eq!(global.can_export_chart, Capability::Allowed);
}

#[test]
fn test_chart_capabilities_follow_office() {
    let admin: AuthUser = create_test_office_admin();
    let own: DutyChart = create_test_chart();
    let other: DutyChart = DutyChart {
        office_id: 4,
        ..create_test_chart()
    };

    let on_own: ChartCapabilities = compute_chart_capabilities(&admin, &own);
    let on_other: ChartCapabilities = compute_chart_capabilities(&admin, &other);

    assert_eq!(on_own.chart_id, 5);
    assert!(on_own.can_create_duty.is_allowed());
    assert!(on_own.can_edit_chart.is_allowed());
    assert!(!on_other.can_create_duty.is_allowed());
    assert!(!on_other.can_edit_chart.is_allowed());
    // Deleting is not tied to an office.
    assert!(on_other.can_delete_chart.is_allowed());
}

#[test]
fn test_viewer_may_do_nothing() {
    let viewer: AuthUser = create_test_viewer();
    let state: RosterState = create_test_state();

    let response: CapabilitiesResponse = get_capabilities(&viewer, Some(&state));

    let chart: ChartCapabilities = response.chart.unwrap();
    assert!(!chart.can_create_duty.is_allowed());
    assert!(!chart.can_export_chart.is_allowed());
    assert!(!response.global.can_create_chart.is_allowed());
    assert_eq!(response.role, "USER");
}

#[test]
fn test_no_chart_without_loaded_roster() {
    let admin: AuthUser = create_test_office_admin();

    let response: CapabilitiesResponse = get_capabilities(&admin, None);

    assert_eq!(response.user_id, 42);
    assert!(response.chart.is_none());
}

#[test]
fn test_manageable_offices_filters_by_office() {
    let offices: Vec<Office> = vec![
        Office::new(3, String::from("Kathmandu")),
        Office::new(4, String::from("Pokhara")),
    ];
    let admin: AuthUser = create_test_office_admin();
    let network: AuthUser = create_test_user(
        Role::NetworkAdmin,
        Some(3),
        &[permissions::ASSIGN_ANY_OFFICE_EMPLOYEE],
    );

    let own: Vec<Office> = manageable_offices(&admin, offices.clone());
    let all: Vec<Office> = manageable_offices(&network, offices);

    assert_eq!(own.iter().map(|o| o.id).collect::<Vec<i64>>(), vec![3]);
    assert_eq!(all.len(), 2);
}
