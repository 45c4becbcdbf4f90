// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{chart_json, create_test_client, duty_json, spawn_backend, test_day};
use crate::{BackendClient, BackendError, BulkUpsertResult, DashboardOrder, MutationOutcome};
use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{delete, patch, post};
use axum::Json;
use duty_roster::Mutation;
use duty_roster_domain::{DutyChart, DutyDraft};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

type Recorded = Arc<Mutex<Vec<Value>>>;

fn recorder() -> Recorded {
    Arc::new(Mutex::new(Vec::new()))
}

#[tokio::test]
async fn test_bulk_upsert_sends_every_draft() {
    let seen: Recorded = recorder();
    let sink: Recorded = seen.clone();
    let router: Router = Router::new().route(
        "/api/v1/duties/bulk-upsert/",
        post(move |Json(body): Json<Value>| {
            let sink: Recorded = sink.clone();
            async move {
                let count: usize = body.as_array().map_or(0, Vec::len);
                sink.lock().unwrap().push(body);
                Json(json!({ "created": count - 1, "updated": 1 }))
            }
        }),
    );
    let host: String = spawn_backend(router).await;
    let client: BackendClient = create_test_client(&host);

    let base: DutyDraft = DutyDraft::new(test_day(), 7, 3, 11, 5);
    let drafts: Vec<DutyDraft> = vec![
        base.clone(),
        base.on(time::macros::date!(2025 - 01 - 11)),
        base.on(time::macros::date!(2025 - 01 - 12)),
    ];
    let result: BulkUpsertResult = client.bulk_upsert_duties(&drafts).await.unwrap();

    assert_eq!(result.total(), 3);
    let bodies = seen.lock().unwrap();
    let first: &Value = &bodies[0][0];
    assert_eq!(first["date"], "2025-01-10");
    assert_eq!(first["user"], 7);
    assert_eq!(first["duty_chart"], 5);
    assert_eq!(first["is_completed"], false);
    assert_eq!(first["currently_available"], true);
    assert_eq!(bodies[0][2]["date"], "2025-01-12");
}

#[tokio::test]
async fn test_perform_create_duty_returns_the_created_duty() {
    let router: Router = Router::new().route(
        "/api/v1/duties/",
        post(|Json(body): Json<Value>| async move {
            let date: String = body["date"].as_str().unwrap_or_default().to_string();
            (StatusCode::CREATED, Json(duty_json(101, 7, &date)))
        }),
    );
    let host: String = spawn_backend(router).await;
    let client: BackendClient = create_test_client(&host);

    let mutation: Mutation = Mutation::CreateDuty(DutyDraft::new(test_day(), 7, 3, 11, 5));
    let outcome: MutationOutcome = client.perform(&mutation).await.unwrap();

    let MutationOutcome::DutyCreated(duty) = outcome else {
        panic!("expected a created duty, got {outcome:?}");
    };
    assert_eq!(duty.id, 101);
    assert_eq!(duty.date, test_day());
}

#[tokio::test]
async fn test_rename_patches_only_the_name() {
    let seen: Recorded = recorder();
    let sink: Recorded = seen.clone();
    let router: Router = Router::new().route(
        "/api/v1/duty-charts/{id}/",
        patch(move |Path(id): Path<i64>, Json(body): Json<Value>| {
            let sink: Recorded = sink.clone();
            async move {
                let name: String = body["name"].as_str().unwrap_or_default().to_string();
                sink.lock().unwrap().push(body);
                Json(chart_json(id, &name))
            }
        }),
    );
    let host: String = spawn_backend(router).await;
    let client: BackendClient = create_test_client(&host);

    let mutation: Mutation = Mutation::UpdateDutyChart {
        chart_id: 5,
        name: Some(String::from("February Roster")),
        schedule_ids: None,
    };
    let outcome: MutationOutcome = client.perform(&mutation).await.unwrap();

    let MutationOutcome::ChartSaved(chart) = outcome else {
        panic!("expected a saved chart, got {outcome:?}");
    };
    assert_eq!(chart.name.as_deref(), Some("February Roster"));
    assert_eq!(seen.lock().unwrap()[0], json!({ "name": "February Roster" }));
}

#[tokio::test]
async fn test_schedule_update_patches_the_full_list() {
    let seen: Recorded = recorder();
    let sink: Recorded = seen.clone();
    let router: Router = Router::new().route(
        "/api/v1/duty-charts/{id}/",
        patch(move |Path(id): Path<i64>, Json(body): Json<Value>| {
            let sink: Recorded = sink.clone();
            async move {
                sink.lock().unwrap().push(body);
                Json(chart_json(id, "January Roster"))
            }
        }),
    );
    let host: String = spawn_backend(router).await;
    let client: BackendClient = create_test_client(&host);

    let mutation: Mutation = Mutation::UpdateDutyChart {
        chart_id: 5,
        name: None,
        schedule_ids: Some(vec![11, 12, 14]),
    };
    let chart: DutyChart = match client.perform(&mutation).await.unwrap() {
        MutationOutcome::ChartSaved(chart) => chart,
        other => panic!("expected a saved chart, got {other:?}"),
    };

    assert_eq!(chart.id, 5);
    assert_eq!(seen.lock().unwrap()[0], json!({ "schedules": [11, 12, 14] }));
}

#[tokio::test]
async fn test_rejected_chart_delete_keeps_backend_message() {
    let router: Router = Router::new().route(
        "/api/v1/duty-charts/{id}/",
        delete(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": "Chart still has assigned duties." })),
            )
        }),
    );
    let host: String = spawn_backend(router).await;
    let client: BackendClient = create_test_client(&host);

    let err: BackendError = client
        .perform(&Mutation::DeleteDutyChart { chart_id: 5 })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert!(err.body().unwrap().contains("Chart still has assigned duties."));
}

#[tokio::test]
async fn test_delete_duty_accepts_empty_response() {
    let router: Router = Router::new().route(
        "/api/v1/duties/{id}/",
        delete(|| async { StatusCode::NO_CONTENT }),
    );
    let host: String = spawn_backend(router).await;
    let client: BackendClient = create_test_client(&host);

    let outcome: MutationOutcome = client
        .perform(&Mutation::DeleteDuty { duty_id: 100 })
        .await
        .unwrap();

    assert_eq!(outcome, MutationOutcome::DutyDeleted(100));
}

#[tokio::test]
async fn test_dashboard_reorder_posts_orders() {
    let seen: Recorded = recorder();
    let sink: Recorded = seen.clone();
    let router: Router = Router::new().route(
        "/api/v1/user-dashboard-offices/reorder/",
        post(move |Json(body): Json<Value>| {
            let sink: Recorded = sink.clone();
            async move {
                sink.lock().unwrap().push(body);
                Json(json!({ "status": "ok" }))
            }
        }),
    );
    let host: String = spawn_backend(router).await;
    let client: BackendClient = create_test_client(&host);

    client
        .reorder_dashboard_offices(&[
            DashboardOrder { id: 2, order: 0 },
            DashboardOrder { id: 1, order: 1 },
        ])
        .await
        .unwrap();

    assert_eq!(
        seen.lock().unwrap()[0],
        json!({ "orders": [{ "id": 2, "order": 0 }, { "id": 1, "order": 1 }] })
    );
}
