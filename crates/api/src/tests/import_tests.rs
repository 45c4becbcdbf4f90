// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    UNREACHABLE_HOST, create_test_cause, create_test_office_admin, create_test_session,
    create_test_state, create_test_viewer, spawn_backend, today, user_json,
};
use crate::{
    ApiError, ApiResult, BulkAssignResponse, CsvImportRequest, CsvPreviewResponse, CsvRowStatus,
    Session, import_duty_csv, preview_duty_csv,
};
use axum::Json;
use axum::Router;
use axum::routing::{get, post};
use duty_roster::RosterState;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

type Recorded = Arc<Mutex<Vec<Value>>>;

fn import_request(csv_content: &str) -> CsvImportRequest {
    CsvImportRequest {
        office_id: 3,
        chart_id: 5,
        csv_content: csv_content.to_string(),
    }
}

fn staff_backend() -> Router {
    Router::new().route(
        "/api/v1/users/",
        get(|| async { Json(json!([user_json(7, "E-7"), user_json(8, "E-8")])) }),
    )
}

#[tokio::test]
async fn test_preview_reports_each_row() {
    let host: String = spawn_backend(staff_backend()).await;
    let session: Session = create_test_session(&host, create_test_office_admin());
    let state: RosterState = create_test_state();
    let csv: &str = "Date,Employee ID,Schedule\n\
                     2025-01-12,e-8,Evening\n\
                     2025-01-12,E-99,Evening\n";

    let preview: CsvPreviewResponse =
        preview_duty_csv(&session, &state, import_request(csv), today())
            .await
            .unwrap();

    assert_eq!(preview.total_rows, 2);
    assert_eq!(preview.valid_count, 1);
    assert_eq!(preview.rows[0].status, CsvRowStatus::Valid);
    assert_eq!(preview.rows[1].status, CsvRowStatus::Invalid);
    assert!(preview.rows[1].errors[0].starts_with("employee_id:"));
}

#[tokio::test]
async fn test_preview_requires_permission() {
    let session: Session = create_test_session(UNREACHABLE_HOST, create_test_viewer());
    let state: RosterState = create_test_state();

    let result: Result<CsvPreviewResponse, ApiError> = preview_duty_csv(
        &session,
        &state,
        import_request("date,employee_id,schedule\n"),
        today(),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[tokio::test]
async fn test_import_sends_one_bulk_upsert() {
    let seen: Recorded = Arc::new(Mutex::new(Vec::new()));
    let sink: Recorded = seen.clone();
    let router: Router = staff_backend()
        .route(
            "/api/v1/duties/bulk-upsert/",
            post(move |Json(body): Json<Value>| {
                let sink: Recorded = sink.clone();
                async move {
                    sink.lock().unwrap().push(body);
                    Json(json!({ "created": 1, "updated": 1 }))
                }
            }),
        )
        .route("/api/v1/duties/", get(|| async { Json(json!([])) }));
    let host: String = spawn_backend(router).await;
    let session: Session = create_test_session(&host, create_test_office_admin());
    let state: RosterState = create_test_state();
    let csv: &str = "date,employee_id,schedule\n\
                     2025-01-10,E-7,Morning\n\
                     2025-01-12,8,12\n";

    let result: ApiResult<BulkAssignResponse> = import_duty_csv(
        &session,
        &state,
        import_request(csv),
        create_test_cause(),
        today(),
    )
    .await
    .unwrap();

    assert_eq!(result.response.message, "Duties Imported Successfully");
    assert_eq!(result.response.created, 1);
    assert_eq!(result.response.updated, 1);
    assert_eq!(result.audit_event.action.name, "ImportDuties");
    let bodies = seen.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0].as_array().unwrap().len(), 2);
    assert_eq!(bodies[0][1]["user"], 8);
    assert_eq!(bodies[0][1]["schedule"], 12);
    assert_eq!(bodies[0][1]["duty_chart"], 5);
}

#[tokio::test]
async fn test_import_rejects_file_with_invalid_rows() {
    let host: String = spawn_backend(staff_backend()).await;
    let session: Session = create_test_session(&host, create_test_office_admin());
    let state: RosterState = create_test_state();
    let csv: &str = "date,employee_id,schedule\n\
                     2025-01-12,E-8,Evening\n\
                     2025-03-01,E-8,Evening\n";

    let result: Result<ApiResult<BulkAssignResponse>, ApiError> = import_duty_csv(
        &session,
        &state,
        import_request(csv),
        create_test_cause(),
        today(),
    )
    .await;

    let Err(ApiError::InvalidInput { field, message }) = result else {
        panic!("expected the file to be rejected");
    };
    assert_eq!(field, "csv_content");
    assert!(message.starts_with("1 of 2 rows"));
}

#[tokio::test]
async fn test_import_of_empty_file() {
    let host: String = spawn_backend(staff_backend()).await;
    let session: Session = create_test_session(&host, create_test_office_admin());
    let state: RosterState = create_test_state();

    let result: Result<ApiResult<BulkAssignResponse>, ApiError> = import_duty_csv(
        &session,
        &state,
        import_request("date,employee_id,schedule\n"),
        create_test_cause(),
        today(),
    )
    .await;

    assert!(matches!(result, Err(ApiError::InvalidCsvFormat { .. })));
}

#[tokio::test]
async fn test_import_with_missing_header() {
    let host: String = spawn_backend(staff_backend()).await;
    let session: Session = create_test_session(&host, create_test_office_admin());
    let state: RosterState = create_test_state();

    let Err(ApiError::InvalidCsvFormat { reason }) = import_duty_csv(
        &session,
        &state,
        import_request("date,employee_id\n2025-01-12,E-8\n"),
        create_test_cause(),
        today(),
    )
    .await
    else {
        panic!("expected a header error");
    };

    assert!(reason.contains("schedule"));
}
