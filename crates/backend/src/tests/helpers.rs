// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{BackendClient, TokenStore, Tokens};
use axum::Router;
use duty_roster_domain::{Duty, DutyDetails};
use serde_json::{Value, json};
use std::net::SocketAddr;
use time::Date;
use time::macros::date;

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

pub fn create_test_tokens() -> TokenStore {
    TokenStore::with_tokens(Tokens {
        access: String::from("stale"),
        refresh: Some(String::from("refresh-1")),
    })
}

pub fn create_test_client(host: &str) -> BackendClient {
    BackendClient::new(host, create_test_tokens()).expect("client")
}

pub fn duty_json(id: i64, user: i64, date: &str) -> Value {
    json!({
        "id": id,
        "date": date,
        "user": user,
        "office": 3,
        "schedule": 11,
        "duty_chart": 5,
        "is_completed": false,
        "currently_available": true,
        "user_name": "Asha Rai",
        "schedule_name": "Morning",
        "start_time": "06:00:00",
        "end_time": "14:00:00"
    })
}

pub fn user_json(id: i64, office: i64) -> Value {
    json!({
        "id": id,
        "username": format!("user{id}"),
        "email": format!("user{id}@example.org"),
        "full_name": format!("Employee {id}"),
        "phone_number": "9800000000",
        "office": office,
        "office_name": format!("Office {office}")
    })
}

pub fn chart_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "office": 3,
        "effective_date": "2025-01-01",
        "end_date": "2025-01-31",
        "name": name,
        "schedules": [11, 12]
    })
}

pub fn create_test_duty(id: i64, user_id: i64, date: Date) -> Duty {
    Duty {
        id,
        date,
        user_id,
        office_id: 3,
        schedule_id: 11,
        duty_chart_id: Some(5),
        is_completed: false,
        currently_available: true,
        details: DutyDetails {
            user_name: Some(format!("Employee {user_id}")),
            schedule_name: Some(String::from("Morning")),
            ..DutyDetails::default()
        },
    }
}

pub fn test_day() -> Date {
    date!(2025 - 01 - 10)
}
