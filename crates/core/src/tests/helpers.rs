// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::RosterState;
use duty_roster_audit::{Actor, Cause};
use duty_roster_domain::{Duty, DutyChart, DutyDetails, Schedule};
use time::macros::date;
use time::{Date, Weekday};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("42"), String::from("user"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Roster edit"))
}

/// The day commands are applied on.
pub fn today() -> Date {
    date!(2025 - 01 - 05)
}

pub fn create_test_schedule(id: i64, name: &str, start: &str, end: &str) -> Schedule {
    Schedule::new(
        id,
        Some(String::from(name)),
        start.parse().unwrap(),
        end.parse().unwrap(),
        Some(3),
    )
}

pub fn create_test_chart() -> DutyChart {
    DutyChart {
        id: 5,
        name: Some(String::from("January Roster")),
        office_id: 3,
        effective_date: date!(2025 - 01 - 01),
        end_date: Some(date!(2025 - 01 - 31)),
        schedule_ids: vec![11, 12, 13],
    }
}

pub fn create_test_duty(id: i64, user_id: i64, date: Date, schedule: &Schedule) -> Duty {
    Duty {
        id,
        date,
        user_id,
        office_id: 3,
        schedule_id: schedule.id,
        duty_chart_id: Some(5),
        is_completed: false,
        currently_available: true,
        details: DutyDetails {
            user_name: Some(format!("Employee {user_id}")),
            schedule_name: schedule.name.clone(),
            ..DutyDetails::default()
        },
    }
}

pub fn create_test_schedules() -> Vec<Schedule> {
    vec![
        create_test_schedule(11, "Morning", "06:00", "14:00"),
        create_test_schedule(12, "Evening", "14:00", "22:00"),
        create_test_schedule(13, "Mid", "10:00", "18:00"),
    ]
}

/// Office 3, chart 5, employee 7 on the Morning shift of 2025-01-10.
pub fn create_test_state() -> RosterState {
    let schedules: Vec<Schedule> = create_test_schedules();
    let duties: Vec<Duty> = vec![create_test_duty(100, 7, date!(2025 - 01 - 10), &schedules[0])];
    let mut state: RosterState = RosterState::new(3, Weekday::Sunday);
    state.load_chart(create_test_chart(), schedules, duties);
    state
}
