// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_chart, create_test_duty, create_test_schedule, t};
use crate::{
    DomainError, Duty, DutyChart, Schedule, find_overlapping_duty, validate_chart_dates,
    validate_chart_name, validate_duty_in_chart, validate_no_overlap, validate_not_backdated,
    validate_schedule_times, validate_single_duty_per_day,
};
use time::macros::date;

fn schedules() -> Vec<Schedule> {
    vec![
        create_test_schedule(11, "Morning", "06:00", "14:00", Some(3)),
        create_test_schedule(12, "Evening", "14:00", "22:00", Some(3)),
        create_test_schedule(13, "Mid", "10:00", "18:00", Some(3)),
    ]
}

#[test]
fn test_chart_dates_allow_equal_and_open_end() {
    assert!(validate_chart_dates(date!(2025 - 01 - 01), Some(date!(2025 - 01 - 01))).is_ok());
    assert!(validate_chart_dates(date!(2025 - 01 - 01), None).is_ok());
}

#[test]
fn test_chart_dates_reject_end_before_effective() {
    let result: Result<(), DomainError> =
        validate_chart_dates(date!(2025 - 01 - 10), Some(date!(2025 - 01 - 09)));
    assert!(matches!(result, Err(DomainError::InvalidChartDates { .. })));
}

#[test]
fn test_chart_name_rejects_blank() {
    assert!(validate_chart_name(None).is_ok());
    assert!(validate_chart_name(Some("Roster A")).is_ok());
    assert!(matches!(
        validate_chart_name(Some("   ")),
        Err(DomainError::InvalidChartName(_))
    ));
}

#[test]
fn test_duty_must_fall_inside_chart() {
    let chart: DutyChart = create_test_chart(date!(2025 - 01 - 01), Some(date!(2025 - 01 - 31)));

    assert!(validate_duty_in_chart(&chart, date!(2025 - 01 - 15)).is_ok());
    assert!(matches!(
        validate_duty_in_chart(&chart, date!(2024 - 12 - 31)),
        Err(DomainError::DutyBeforeChartStart { .. })
    ));
    assert!(matches!(
        validate_duty_in_chart(&chart, date!(2025 - 02 - 01)),
        Err(DomainError::DutyAfterChartEnd { .. })
    ));
}

#[test]
fn test_backdated_duty_is_rejected() {
    let today = date!(2025 - 01 - 10);
    assert!(validate_not_backdated(today, today).is_ok());
    assert!(validate_not_backdated(date!(2025 - 01 - 11), today).is_ok());
    assert!(matches!(
        validate_not_backdated(date!(2025 - 01 - 09), today),
        Err(DomainError::BackdatedDuty { .. })
    ));
}

#[test]
fn test_schedule_times_allow_overnight() {
    assert!(validate_schedule_times(t("22:00"), t("06:00")).is_ok());
    assert!(matches!(
        validate_schedule_times(t("08:00"), t("08:00:30")),
        Err(DomainError::InvalidScheduleTimes { .. })
    ));
}

#[test]
fn test_overlap_found_via_schedule_lookup() {
    let existing: Vec<Duty> = vec![create_test_duty(100, 7, date!(2025 - 01 - 10), 11)];

    let conflict: Option<&Duty> = find_overlapping_duty(
        7,
        date!(2025 - 01 - 10),
        (t("10:00"), t("18:00")),
        &existing,
        &schedules(),
    );
    assert_eq!(conflict.map(|d| d.id), Some(100));
}

#[test]
fn test_adjacent_shifts_do_not_conflict() {
    let existing: Vec<Duty> = vec![create_test_duty(100, 7, date!(2025 - 01 - 10), 11)];

    let result: Result<(), DomainError> = validate_no_overlap(
        7,
        date!(2025 - 01 - 10),
        (t("14:00"), t("22:00")),
        &existing,
        &schedules(),
    );
    assert!(result.is_ok());
}

#[test]
fn test_overlap_ignores_other_users_and_days() {
    let existing: Vec<Duty> = vec![
        create_test_duty(100, 8, date!(2025 - 01 - 10), 11),
        create_test_duty(101, 7, date!(2025 - 01 - 11), 11),
    ];

    let result: Result<(), DomainError> = validate_no_overlap(
        7,
        date!(2025 - 01 - 10),
        (t("06:00"), t("14:00")),
        &existing,
        &schedules(),
    );
    assert!(result.is_ok());
}

#[test]
fn test_overlap_prefers_duty_own_times() {
    let mut duty: Duty = create_test_duty(100, 7, date!(2025 - 01 - 10), 999);
    duty.details.start_time = Some(t("09:00"));
    duty.details.end_time = Some(t("12:00"));

    let result: Result<(), DomainError> = validate_no_overlap(
        7,
        date!(2025 - 01 - 10),
        (t("11:00"), t("13:00")),
        &[duty],
        &schedules(),
    );
    assert!(matches!(
        result,
        Err(DomainError::ShiftOverlap {
            existing_duty_id: 100,
            ..
        })
    ));
}

#[test]
fn test_unresolvable_duty_interval_is_ignored() {
    let existing: Vec<Duty> = vec![create_test_duty(100, 7, date!(2025 - 01 - 10), 999)];
    let conflict: Option<&Duty> = find_overlapping_duty(
        7,
        date!(2025 - 01 - 10),
        (t("06:00"), t("14:00")),
        &existing,
        &schedules(),
    );
    assert!(conflict.is_none());
}

#[test]
fn test_single_duty_per_day() {
    let existing: Vec<Duty> = vec![create_test_duty(100, 7, date!(2025 - 01 - 10), 11)];
    assert!(validate_single_duty_per_day(7, date!(2025 - 01 - 11), &existing).is_ok());
    assert!(matches!(
        validate_single_duty_per_day(7, date!(2025 - 01 - 10), &existing),
        Err(DomainError::DuplicateDutyForDay { user_id: 7, .. })
    ));
}
