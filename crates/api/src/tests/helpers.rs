// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use axum::Router;
use duty_roster::RosterState;
use duty_roster_audit::Cause;
use duty_roster_backend::{BackendClient, TokenStore, Tokens};
use duty_roster_domain::{Duty, DutyChart, DutyDetails, Schedule};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::net::SocketAddr;
use time::macros::{date, datetime};
use time::{Date, PrimitiveDateTime, Weekday};

use crate::{AuthUser, Role, Session, permissions};

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener: tokio::net::TcpListener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr: SocketAddr = listener.local_addr().expect("mock backend address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock backend");
    });
    format!("http://{addr}")
}

/// A host nothing listens on. Tests using it must fail before any request.
pub const UNREACHABLE_HOST: &str = "http://127.0.0.1:9";

pub fn create_test_user(role: Role, office_id: Option<i64>, granted: &[&str]) -> AuthUser {
    AuthUser {
        id: 42,
        full_name: String::from("Test Admin"),
        email: String::from("admin@example.org"),
        employee_id: Some(String::from("E-42")),
        role,
        office_id,
        secondary_offices: Vec::new(),
        permissions: granted.iter().map(|p| (*p).to_string()).collect::<HashSet<String>>(),
    }
}

/// Office admin of office 3 holding every duty permission except the
/// cross-office ones.
pub fn create_test_office_admin() -> AuthUser {
    create_test_user(
        Role::OfficeAdmin,
        Some(3),
        &[
            permissions::CREATE_DUTY,
            permissions::EDIT_CHART,
            permissions::CREATE_CHART,
            permissions::DELETE_DUTY,
            permissions::DELETE_CHART,
            permissions::EXPORT_CHART,
        ],
    )
}

/// A plain user of office 3 with no permissions.
pub fn create_test_viewer() -> AuthUser {
    create_test_user(Role::User, Some(3), &[])
}

pub fn create_test_session(host: &str, user: AuthUser) -> Session {
    let tokens: TokenStore = TokenStore::with_tokens(Tokens {
        access: String::from("access-1"),
        refresh: None,
    });
    Session::new(user, BackendClient::new(host, tokens).expect("client"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-789"), String::from("Roster edit"))
}

/// The day commands are applied on.
pub fn today() -> Date {
    date!(2025 - 01 - 05)
}

pub fn morning_of_duty() -> PrimitiveDateTime {
    datetime!(2025 - 01 - 10 08:30)
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
        schedule_ids: vec![11, 12],
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

/// Office 3, chart 5 with Morning and Evening shifts, employee 7 on the
/// Morning shift of 2025-01-10.
pub fn create_test_state() -> RosterState {
    let schedules: Vec<Schedule> = vec![
        create_test_schedule(11, "Morning", "06:00", "14:00"),
        create_test_schedule(12, "Evening", "14:00", "22:00"),
    ];
    let duties: Vec<Duty> = vec![create_test_duty(100, 7, date!(2025 - 01 - 10), &schedules[0])];
    let mut state: RosterState = RosterState::new(3, Weekday::Sunday);
    state.load_chart(create_test_chart(), schedules, duties);
    state
}

pub fn duty_json(id: i64, user: i64, date: &str, schedule: i64) -> Value {
    json!({
        "id": id,
        "date": date,
        "user": user,
        "office": 3,
        "schedule": schedule,
        "duty_chart": 5,
        "is_completed": false,
        "currently_available": true,
        "user_name": format!("Employee {user}"),
        "office_name": "Office 3"
    })
}

pub fn chart_json(id: i64, office: i64) -> Value {
    json!({
        "id": id,
        "office": office,
        "effective_date": "2025-01-01",
        "end_date": "2025-01-31",
        "name": "January Roster",
        "schedules": [11, 12]
    })
}

pub fn schedules_json() -> Value {
    json!([
        { "id": 11, "name": "Morning", "start_time": "06:00:00", "end_time": "14:00:00", "office": 3 },
        { "id": 12, "name": "Evening", "start_time": "14:00:00", "end_time": "22:00:00", "office": 3 }
    ])
}

pub fn user_json(id: i64, employee_id: &str) -> Value {
    json!({
        "id": id,
        "username": format!("user{id}"),
        "email": format!("user{id}@example.org"),
        "employee_id": employee_id,
        "full_name": format!("Employee {id}"),
        "phone_number": "9800000000",
        "office": 3,
        "office_name": "Office 3"
    })
}
