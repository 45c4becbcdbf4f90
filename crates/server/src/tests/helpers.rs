// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router test helpers and a mock backend.

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    routing::get,
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tower::ServiceExt;

use crate::config::ServerConfig;
use crate::{AppState, build_router};

/// A host nothing listens on. Tests using it must fail before any request.
pub const UNREACHABLE_HOST: &str = "http://127.0.0.1:9";

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

pub fn create_test_app_state(backend_url: &str) -> AppState {
    let config: ServerConfig = ServerConfig {
        backend_url: backend_url.to_string(),
        ..ServerConfig::default()
    };
    AppState::new(config).expect("app state")
}

/// `auth/me/` record of an office admin of office 3.
pub fn office_admin_json() -> Value {
    json!({
        "id": 42,
        "full_name": "Test Admin",
        "email": "admin@example.org",
        "employee_id": "E-42",
        "role": "OFFICE_ADMIN",
        "office_id": 3,
        "permissions": [
            "duties.create_duty",
            "duties.edit_chart",
            "duties.create_chart",
            "duties.delete",
            "duties.delete_chart",
            "duties.export_chart"
        ]
    })
}

/// `auth/me/` record of a second office admin of office 3.
pub fn second_admin_json() -> Value {
    let mut me: Value = office_admin_json();
    me["id"] = json!(44);
    me["full_name"] = json!("Other Admin");
    me["email"] = json!("other@example.org");
    me["employee_id"] = json!("E-44");
    me
}

/// `auth/me/` record of a plain user of office 3.
pub fn viewer_json() -> Value {
    json!({
        "id": 43,
        "full_name": "Test Viewer",
        "role": "USER",
        "office_id": 3
    })
}

/// Chart 5 of office 3, covering all of 2099.
pub fn chart_json() -> Value {
    json!({
        "id": 5,
        "office": 3,
        "effective_date": "2099-01-01",
        "end_date": "2099-12-31",
        "name": "Future Roster",
        "schedules": [11, 12]
    })
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

/// Mock backend answering `auth/me/` with `me` and serving chart 5 with one
/// duty on 2099-01-10.
pub fn roster_backend(me: Value) -> Router {
    with_me(roster_routes(), me)
}

/// Like [`roster_backend`] without the `duties/` route.
pub fn chart_backend(me: Value) -> Router {
    with_me(chart_routes(), me)
}

fn with_me(router: Router, me: Value) -> Router {
    router.route(
        "/api/v1/auth/me/",
        get(move || {
            let me: Value = me.clone();
            async move { Json(me) }
        }),
    )
}

/// Chart 5, its schedules and its one duty, without `auth/me/`.
pub fn roster_routes() -> Router {
    chart_routes().route(
        "/api/v1/duties/",
        get(|| async { Json(json!([duty_json(100, 7, "2099-01-10", 11)])) }),
    )
}

/// Chart 5 and its schedules, without `auth/me/`.
pub fn chart_routes() -> Router {
    Router::new()
        .route("/api/v1/duty-charts/5/", get(|| async { Json(chart_json()) }))
        .route(
            "/api/v1/schedule/",
            get(|| async {
                Json(json!([
                    { "id": 11, "name": "Morning", "start_time": "06:00:00", "end_time": "14:00:00", "office": 3 },
                    { "id": 12, "name": "Evening", "start_time": "14:00:00", "end_time": "22:00:00", "office": 3 }
                ]))
            }),
        )
}

/// Sends `request` through the gateway router.
pub async fn send(app_state: &AppState, request: Request<Body>) -> Response {
    build_router(app_state.clone())
        .oneshot(request)
        .await
        .unwrap()
}

pub fn authorized(method: &str, uri: &str, body: Option<&Value>) -> Request<Body> {
    authorized_as("access-1", method, uri, body)
}

pub fn authorized_as(token: &str, method: &str, uri: &str, body: Option<&Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("content-type", "application/json");
    let body: Body = body.map_or_else(Body::empty, |value| Body::from(value.to_string()));
    builder.body(body).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}
