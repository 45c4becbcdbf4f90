// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_test_chart, create_test_duty, create_test_schedule, create_test_schedules,
    create_test_state,
};
use crate::{MonthView, RosterState, WeekView};
use duty_roster_domain::{
    Assignment, BsMonth, CalendarMonth, Duty, Employee, Office, Schedule, ShiftKey,
};
use std::collections::HashSet;
use time::macros::{date, datetime};
use time::{Month, Weekday};

#[test]
fn test_loading_chart_derives_shift_columns() {
    let state: RosterState = create_test_state();

    assert_eq!(state.shifts().len(), 3);
    assert_eq!(state.shift_index().len(), 3);
    assert_eq!(state.assignments().len(), 1);
    assert_eq!(state.assignments()[0].employee_name, "Employee 7");
}

#[test]
fn test_shift_key_resolves_to_its_schedule() {
    let state: RosterState = create_test_state();

    assert_eq!(state.schedule_for_shift("Mid|10:00|18:00"), Some(13));
    assert_eq!(state.schedule_for_shift("Mid|10:00|19:00"), None);
}

#[test]
fn test_week_view_groups_assignments() {
    let state: RosterState = create_test_state();

    let view: WeekView = state.week_view(date!(2025 - 01 - 08)).unwrap();

    assert_eq!(view.days.len(), 7);
    assert_eq!(view.days[0], date!(2025 - 01 - 05));
    let morning: &ShiftKey = &view.shifts[0].key;
    assert_eq!(view.grouped[&date!(2025 - 01 - 10)][morning].len(), 1);
    assert!(view.grouped[&date!(2025 - 01 - 09)][morning].is_empty());
}

#[test]
fn test_week_view_honours_week_start() {
    let mut state: RosterState = RosterState::new(3, Weekday::Monday);
    state.load_chart(create_test_chart(), create_test_schedules(), Vec::new());

    let view: WeekView = state.week_view(date!(2025 - 01 - 08)).unwrap();

    assert_eq!(view.days[0], date!(2025 - 01 - 06));
    assert_eq!(view.days[6], date!(2025 - 01 - 12));
}

#[test]
fn test_month_view_covers_padding_days() {
    let state: RosterState = create_test_state();

    let view: MonthView = state
        .month_view(CalendarMonth::Gregorian {
            year: 2025,
            month: Month::January,
        })
        .unwrap();

    // January 2025 starts on a Wednesday and ends on a Friday.
    assert_eq!(view.grid.days.len(), 35);
    assert_eq!(view.grouped.len(), 35);
    let morning: &ShiftKey = &view.shifts[0].key;
    assert_eq!(view.grouped[&date!(2025 - 01 - 10)][morning].len(), 1);
}

#[test]
fn test_bs_month_view() {
    let state: RosterState = create_test_state();

    let view: MonthView = state
        .month_view(CalendarMonth::BikramSambat(BsMonth::new(2081, 9).unwrap()))
        .unwrap();

    assert!(view.grid.dates().contains(&date!(2025 - 01 - 10)));
    assert_eq!(view.grid.days.len() % 7, 0);
}

#[test]
fn test_cached_employee_enriches_assignments() {
    let mut state: RosterState = create_test_state();
    let employee: Employee = Employee {
        id: 7,
        full_name: String::from("Employee 7"),
        phone_number: Some(String::from("9800000007")),
        office_id: Some(9),
        ..Employee::default()
    };

    state.cache_employees([employee]);

    assert_eq!(
        state.assignments()[0].phone_number.as_deref(),
        Some("9800000007")
    );
}

#[test]
fn test_missing_ids_skip_cached_entries() {
    let mut state: RosterState = create_test_state();
    assert_eq!(state.missing_employee_ids(), vec![7]);
    assert_eq!(state.missing_office_ids(), vec![3]);

    state.cache_employees([Employee {
        id: 7,
        office_id: Some(9),
        ..Employee::default()
    }]);
    state.cache_offices([Office::new(3, String::from("Head Office"))]);

    assert!(state.missing_employee_ids().is_empty());
    assert_eq!(state.missing_office_ids(), vec![9]);
}

#[test]
fn test_active_assignments_follow_schedule_times() {
    let schedules: Vec<Schedule> = vec![
        create_test_schedule(11, "Morning", "06:00", "14:00"),
        create_test_schedule(14, "Night", "22:00", "06:00"),
    ];
    let duties: Vec<Duty> = vec![
        create_test_duty(100, 7, date!(2025 - 01 - 10), &schedules[0]),
        create_test_duty(101, 8, date!(2025 - 01 - 10), &schedules[1]),
    ];
    let mut state: RosterState = RosterState::new(3, Weekday::Sunday);
    state.load_chart(create_test_chart(), schedules, duties);

    let morning: Vec<&Assignment> = state.active_assignments(datetime!(2025-01-10 09:30));
    assert_eq!(morning.len(), 1);
    assert_eq!(morning[0].duty_id, 100);

    let overnight: Vec<&Assignment> = state.active_assignments(datetime!(2025-01-11 03:00));
    assert_eq!(overnight.len(), 1);
    assert_eq!(overnight[0].duty_id, 101);
}

#[test]
fn test_edit_chart_schedules_prefers_chart_selection() {
    let state: RosterState = create_test_state();
    let mut other_office: Schedule = create_test_schedule(21, "Morning", "06:00", "14:00");
    other_office.office_id = Some(4);
    let candidates: Vec<Schedule> = vec![other_office, create_test_schedules()[0].clone()];

    let offered: Vec<Schedule> = state.edit_chart_schedules(&candidates);

    let ids: HashSet<i64> = offered.iter().map(|s| s.id).collect();
    assert_eq!(ids, HashSet::from([11]));
}

#[test]
fn test_scope_and_snapshot_without_chart() {
    let state: RosterState = RosterState::new(3, Weekday::Sunday);

    assert_eq!(state.scope().chart_id, None);
    assert_eq!(
        state.to_snapshot().data,
        "office=3,chart=none,schedules=0,duties=0"
    );
}
