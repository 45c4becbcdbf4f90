// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_test_actor, create_test_cause, create_test_chart, create_test_duty,
    create_test_schedules, create_test_state, today,
};
use crate::{Command, CoreError, Mutation, RosterState, TransitionResult, apply};
use duty_roster_domain::{DomainError, Duty, DutyChartDraft, DutyDraft, Schedule};
use time::Weekday;
use time::macros::date;

fn run(state: &RosterState, command: Command) -> Result<TransitionResult, CoreError> {
    apply(state, command, create_test_actor(), create_test_cause(), today())
}

fn assign(user_id: Option<i64>, schedule_id: Option<i64>, day: time::Date) -> Command {
    Command::AssignDuty {
        user_id,
        schedule_id,
        date: day,
    }
}

#[test]
fn test_assign_duty_produces_create_mutation() {
    let state: RosterState = create_test_state();

    let transition: TransitionResult =
        run(&state, assign(Some(8), Some(12), date!(2025 - 01 - 10))).unwrap();

    assert_eq!(
        transition.mutation,
        Mutation::CreateDuty(DutyDraft::new(date!(2025 - 01 - 10), 8, 3, 12, 5))
    );
    let Mutation::CreateDuty(draft) = transition.mutation else {
        panic!("expected a create mutation");
    };
    assert!(!draft.is_completed);
    assert!(draft.currently_available);
}

#[test]
fn test_assign_duty_emits_audit_event() {
    let state: RosterState = create_test_state();

    let transition: TransitionResult =
        run(&state, assign(Some(8), Some(12), date!(2025 - 01 - 10))).unwrap();

    assert_eq!(transition.audit_event.action.name, "AssignDuty");
    assert_eq!(transition.audit_event.actor.id, "42");
    assert_eq!(transition.audit_event.scope.chart_id, Some(5));
    assert_eq!(
        transition.audit_event.action.details.as_deref(),
        Some("user=8 schedule=12 date=2025-01-10")
    );
    assert_eq!(
        transition.audit_event.before.data,
        "office=3,chart=5,schedules=3,duties=1"
    );
}

#[test]
fn test_assign_duty_requires_employee_then_shift() {
    let state: RosterState = create_test_state();

    let result: Result<TransitionResult, CoreError> =
        run(&state, assign(None, None, date!(2025 - 01 - 10)));
    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::MissingEmployee)
    );

    let result: Result<TransitionResult, CoreError> =
        run(&state, assign(Some(8), None, date!(2025 - 01 - 10)));
    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::MissingShift)
    );
}

#[test]
fn test_assign_duty_outside_chart_is_rejected() {
    let state: RosterState = create_test_state();

    let result: Result<TransitionResult, CoreError> =
        run(&state, assign(Some(8), Some(11), date!(2025 - 02 - 01)));

    let err: CoreError = result.unwrap_err();
    assert_eq!(err.to_string(), "Duty date must be on or before 2025-01-31.");
}

#[test]
fn test_backdated_duty_is_rejected() {
    let state: RosterState = create_test_state();

    let result: Result<TransitionResult, CoreError> =
        run(&state, assign(Some(8), Some(11), date!(2025 - 01 - 04)));

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::BackdatedDuty { .. }))
    ));
}

#[test]
fn test_overlapping_shift_is_rejected() {
    let state: RosterState = create_test_state();

    // Employee 7 already works Morning 06:00-14:00; Mid runs 10:00-18:00.
    let result: Result<TransitionResult, CoreError> =
        run(&state, assign(Some(7), Some(13), date!(2025 - 01 - 10)));

    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::ShiftOverlap {
            user_id: 7,
            date: date!(2025 - 01 - 10),
            existing_duty_id: 100,
        })
    );
}

#[test]
fn test_back_to_back_shift_hits_one_per_day_rule() {
    let state: RosterState = create_test_state();

    // Evening starts when Morning ends, so only the one-per-day rule applies.
    let result: Result<TransitionResult, CoreError> =
        run(&state, assign(Some(7), Some(12), date!(2025 - 01 - 10)));

    let err: CoreError = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Same person cannot have duties of two shifts in the same day."
    );
}

#[test]
fn test_unknown_schedule_is_rejected() {
    let state: RosterState = create_test_state();

    let result: Result<TransitionResult, CoreError> =
        run(&state, assign(Some(8), Some(99), date!(2025 - 01 - 10)));

    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::ScheduleNotFound(99))
    );
}

#[test]
fn test_assign_without_chart_is_rejected() {
    let state: RosterState = RosterState::new(3, Weekday::Sunday);

    let result: Result<TransitionResult, CoreError> =
        run(&state, assign(Some(8), Some(11), date!(2025 - 01 - 10)));

    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::NoChartSelected)
    );
}

#[test]
fn test_range_assignment_expands_every_day() {
    let state: RosterState = create_test_state();

    let transition: TransitionResult = run(
        &state,
        Command::AssignDutyRange {
            user_id: Some(8),
            schedule_id: Some(12),
            start_date: date!(2025 - 01 - 06),
            end_date: date!(2025 - 01 - 08),
        },
    )
    .unwrap();

    let Mutation::BulkUpsertDuties(drafts) = transition.mutation else {
        panic!("expected a bulk upsert");
    };
    assert_eq!(drafts.len(), 3);
    assert_eq!(drafts[0].date, date!(2025 - 01 - 06));
    assert_eq!(drafts[2].date, date!(2025 - 01 - 08));
    assert!(drafts.iter().all(|d| d.schedule_id == 12 && d.duty_chart_id == 5));
}

#[test]
fn test_range_over_same_schedule_is_an_update() {
    let state: RosterState = create_test_state();

    // Employee 7 already has Morning on the 10th; re-assigning Morning is an upsert.
    let result: Result<TransitionResult, CoreError> = run(
        &state,
        Command::AssignDutyRange {
            user_id: Some(7),
            schedule_id: Some(11),
            start_date: date!(2025 - 01 - 09),
            end_date: date!(2025 - 01 - 11),
        },
    );

    assert!(result.is_ok());
}

#[test]
fn test_range_conflicting_with_other_shift_is_rejected() {
    let state: RosterState = create_test_state();

    let result: Result<TransitionResult, CoreError> = run(
        &state,
        Command::AssignDutyRange {
            user_id: Some(7),
            schedule_id: Some(13),
            start_date: date!(2025 - 01 - 09),
            end_date: date!(2025 - 01 - 11),
        },
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::ShiftOverlap { .. }))
    ));
}

#[test]
fn test_reversed_range_is_rejected() {
    let state: RosterState = create_test_state();

    let result: Result<TransitionResult, CoreError> = run(
        &state,
        Command::AssignDutyRange {
            user_id: Some(8),
            schedule_id: Some(12),
            start_date: date!(2025 - 01 - 08),
            end_date: date!(2025 - 01 - 06),
        },
    );

    assert_eq!(
        result.unwrap_err().to_string(),
        "End date cannot be before start date"
    );
}

#[test]
fn test_range_past_chart_end_is_rejected() {
    let state: RosterState = create_test_state();

    let result: Result<TransitionResult, CoreError> = run(
        &state,
        Command::AssignDutyRange {
            user_id: Some(8),
            schedule_id: Some(12),
            start_date: date!(2025 - 01 - 30),
            end_date: date!(2025 - 02 - 02),
        },
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::DutyAfterChartEnd { .. }))
    ));
}

#[test]
fn test_remove_duty_drops_it_from_new_state() {
    let state: RosterState = create_test_state();

    let transition: TransitionResult = run(&state, Command::RemoveDuty { duty_id: 100 }).unwrap();

    assert_eq!(transition.mutation, Mutation::DeleteDuty { duty_id: 100 });
    assert!(transition.new_state.duties().is_empty());
    assert!(transition.new_state.assignments().is_empty());
    assert_eq!(state.duties().len(), 1);
    assert_eq!(
        transition.audit_event.after.data,
        "office=3,chart=5,schedules=3,duties=0"
    );
}

#[test]
fn test_remove_unknown_duty() {
    let state: RosterState = create_test_state();

    let result: Result<TransitionResult, CoreError> =
        run(&state, Command::RemoveDuty { duty_id: 404 });

    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::DutyNotFound(404))
    );
}

#[test]
fn test_create_chart_validates_dates() {
    let state: RosterState = RosterState::new(3, Weekday::Sunday);

    let result: Result<TransitionResult, CoreError> = run(
        &state,
        Command::CreateDutyChart {
            office_id: 3,
            name: Some(String::from("February")),
            effective_date: date!(2025 - 02 - 28),
            end_date: Some(date!(2025 - 02 - 01)),
            schedule_ids: vec![11],
        },
    );

    assert_eq!(
        result.unwrap_err().to_string(),
        "End date must be after effective date."
    );
}

#[test]
fn test_create_chart_is_scoped_to_office() {
    let state: RosterState = RosterState::new(3, Weekday::Sunday);

    let transition: TransitionResult = run(
        &state,
        Command::CreateDutyChart {
            office_id: 4,
            name: None,
            effective_date: date!(2025 - 02 - 01),
            end_date: None,
            schedule_ids: vec![11, 12],
        },
    )
    .unwrap();

    assert_eq!(
        transition.mutation,
        Mutation::CreateDutyChart(DutyChartDraft {
            office_id: 4,
            name: None,
            effective_date: date!(2025 - 02 - 01),
            end_date: None,
            schedule_ids: vec![11, 12],
        })
    );
    assert_eq!(transition.audit_event.scope.office_id, 4);
    assert_eq!(transition.audit_event.scope.chart_id, None);
}

#[test]
fn test_add_schedules_requires_something_new() {
    let state: RosterState = create_test_state();

    let result: Result<TransitionResult, CoreError> = run(
        &state,
        Command::UpdateDutyChart {
            name: None,
            selected: Some(vec![11, 12]),
        },
    );

    assert_eq!(
        result.unwrap_err().to_string(),
        "No new schedules have been selected."
    );
}

#[test]
fn test_add_schedules_sends_full_list() {
    let state: RosterState = create_test_state();

    let transition: TransitionResult = run(
        &state,
        Command::UpdateDutyChart {
            name: None,
            selected: Some(vec![11, 14, 15]),
        },
    )
    .unwrap();

    assert_eq!(
        transition.mutation,
        Mutation::UpdateDutyChart {
            chart_id: 5,
            name: None,
            schedule_ids: Some(vec![11, 12, 13, 14, 15]),
        }
    );
    assert_eq!(
        transition.new_state.chart().unwrap().schedule_ids,
        vec![11, 12, 13, 14, 15]
    );
}

#[test]
fn test_rename_chart() {
    let state: RosterState = create_test_state();

    let transition: TransitionResult = run(
        &state,
        Command::UpdateDutyChart {
            name: Some(String::from("  Winter Roster ")),
            selected: None,
        },
    )
    .unwrap();

    assert_eq!(
        transition.mutation,
        Mutation::UpdateDutyChart {
            chart_id: 5,
            name: Some(String::from("Winter Roster")),
            schedule_ids: None,
        }
    );
    assert_eq!(
        transition.new_state.chart().unwrap().name.as_deref(),
        Some("Winter Roster")
    );
}

#[test]
fn test_rename_to_blank_is_rejected() {
    let state: RosterState = create_test_state();

    let result: Result<TransitionResult, CoreError> = run(
        &state,
        Command::UpdateDutyChart {
            name: Some(String::from("   ")),
            selected: Some(vec![14]),
        },
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidChartName(_)))
    ));
}

#[test]
fn test_rename_with_nothing_new_fails_as_a_whole() {
    let state: RosterState = create_test_state();

    let result: Result<TransitionResult, CoreError> = run(
        &state,
        Command::UpdateDutyChart {
            name: Some(String::from("Winter Roster")),
            selected: Some(vec![12]),
        },
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::NoNewSchedules))
    ));
}

#[test]
fn test_rename_and_add_schedules_together() {
    let state: RosterState = create_test_state();

    let transition: TransitionResult = run(
        &state,
        Command::UpdateDutyChart {
            name: Some(String::from("Winter Roster")),
            selected: Some(vec![14]),
        },
    )
    .unwrap();

    assert_eq!(
        transition.mutation,
        Mutation::UpdateDutyChart {
            chart_id: 5,
            name: Some(String::from("Winter Roster")),
            schedule_ids: Some(vec![11, 12, 13, 14]),
        }
    );
    assert_eq!(
        transition.audit_event.action.details.as_deref(),
        Some("name=Winter Roster added schedules [14]")
    );
}

#[test]
fn test_empty_chart_update_is_rejected() {
    let state: RosterState = create_test_state();

    let result: Result<TransitionResult, CoreError> = run(
        &state,
        Command::UpdateDutyChart {
            name: None,
            selected: None,
        },
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::EmptyChartUpdate))
    ));
}

#[test]
fn test_delete_chart_clears_state() {
    let state: RosterState = create_test_state();

    let transition: TransitionResult = run(&state, Command::DeleteDutyChart).unwrap();

    assert_eq!(transition.mutation, Mutation::DeleteDutyChart { chart_id: 5 });
    assert!(transition.new_state.chart().is_none());
    assert!(transition.new_state.shifts().is_empty());
    assert_eq!(transition.audit_event.scope.chart_id, Some(5));
}

#[test]
fn test_failed_command_leaves_state_untouched() {
    let state: RosterState = create_test_state();
    let before: RosterState = state.clone();

    let _ = run(&state, assign(Some(7), Some(13), date!(2025 - 01 - 10)));

    assert_eq!(state, before);
}

#[test]
fn test_reloaded_duties_feed_the_next_check() {
    let mut state: RosterState = create_test_state();
    let schedules: Vec<Schedule> = create_test_schedules();
    let mut duties: Vec<Duty> = state.duties().to_vec();
    duties.push(create_test_duty(101, 8, date!(2025 - 01 - 10), &schedules[1]));
    state.replace_duties(duties);

    let result: Result<TransitionResult, CoreError> =
        run(&state, assign(Some(8), Some(13), date!(2025 - 01 - 10)));

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::ShiftOverlap {
            existing_duty_id: 101,
            ..
        }))
    ));
    assert_eq!(state.chart(), Some(&create_test_chart()));
}

#[test]
fn test_import_duties_targets_loaded_chart() {
    let state: RosterState = create_test_state();
    let drafts: Vec<DutyDraft> = vec![
        DutyDraft::new(date!(2025 - 01 - 10), 8, 99, 12, 77),
        DutyDraft::new(date!(2025 - 01 - 11), 7, 3, 11, 5),
    ];

    let transition: TransitionResult = run(&state, Command::ImportDuties { drafts }).unwrap();

    let Mutation::BulkUpsertDuties(drafts) = transition.mutation else {
        panic!("expected a bulk upsert");
    };
    assert!(drafts.iter().all(|d| d.office_id == 3 && d.duty_chart_id == 5));
    assert_eq!(transition.audit_event.action.name, "ImportDuties");
    assert_eq!(
        transition.audit_event.action.details.as_deref(),
        Some("chart=5 rows=2")
    );
}

#[test]
fn test_import_duties_rejects_same_day_twice() {
    let state: RosterState = create_test_state();
    let drafts: Vec<DutyDraft> = vec![
        DutyDraft::new(date!(2025 - 01 - 12), 8, 3, 11, 5),
        DutyDraft::new(date!(2025 - 01 - 12), 8, 3, 12, 5),
    ];

    let result: Result<TransitionResult, CoreError> =
        run(&state, Command::ImportDuties { drafts });

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::DuplicateDutyForDay { user_id: 8, .. }))
    ));
}

#[test]
fn test_import_duties_rejects_unknown_schedule() {
    let state: RosterState = create_test_state();
    let drafts: Vec<DutyDraft> = vec![DutyDraft::new(date!(2025 - 01 - 12), 8, 3, 404, 5)];

    let result: Result<TransitionResult, CoreError> =
        run(&state, Command::ImportDuties { drafts });

    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::ScheduleNotFound(404))
    );
}

#[test]
fn test_import_duties_overlapping_existing_shift_is_rejected() {
    let state: RosterState = create_test_state();
    // Employee 7 works Morning on the 10th; Mid overlaps it.
    let drafts: Vec<DutyDraft> = vec![DutyDraft::new(date!(2025 - 01 - 10), 7, 3, 13, 5)];

    let result: Result<TransitionResult, CoreError> =
        run(&state, Command::ImportDuties { drafts });

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::ShiftOverlap { .. }))
    ));
}
