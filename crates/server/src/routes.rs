// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route handlers.
//!
//! Each handler loads the roster it needs, calls into the API layer and,
//! after a successful mutation, caches the new roster and notifies live
//! clients.

use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
    http::header,
    response::{IntoResponse, Response},
};
use duty_roster::RosterState;
use duty_roster_api::{
    ApiResult, AssignDutyRangeRequest, AssignDutyRequest, AssignDutyResponse, BulkAssignResponse,
    CapabilitiesResponse, ChartResponse, ChartSchedulesResponse, CreateChartRequest,
    CsvImportRequest, CsvPreviewResponse, ExportFile, ExportRequest, MessageResponse,
    MonthRosterRequest, MonthRosterResponse, ReorderDashboardRequest, UpdateChartRequest,
    WeekRosterRequest, WeekRosterResponse, assign_duty, assign_duty_range, create_duty_chart,
    delete_duty_chart, export_download, export_preview, export_weekly_roster_csv,
    get_capabilities, get_month_roster, get_week_roster, import_duty_csv, list_audit_logs,
    list_chart_schedule_options, list_dashboard_offices, list_manageable_offices, list_sms_logs,
    load_duty_roster, preview_duty_csv, remove_duty, reorder_dashboard_offices, resolve_month,
    resolve_week_anchor, update_duty_chart,
};
use duty_roster_backend::{
    AuditLogQuery, AuditLogRecord, DashboardOfficeRecord, ExportPreview, Paginated, SmsLogQuery,
    SmsLogRecord,
};
use duty_roster_domain::{CalendarMonth, Office};
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};
use tracing::info;

use crate::AppState;
use crate::http::HttpError;
use crate::live::LiveEvent;
use crate::session::RequestSession;

/// Response for GET `/health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Query of GET `/capabilities`.
#[derive(Debug, Default, Deserialize)]
pub struct CapabilitiesQuery {
    /// Chart whose capabilities are wanted as well.
    pub chart_id: Option<i64>,
}

/// Handler for GET `/health` endpoint.
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
        version: String::from(env!("CARGO_PKG_VERSION")),
    })
}

// ========================================================================
// Views
// ========================================================================

/// Handler for GET `/roster/week` endpoint.
pub async fn handle_week_roster(
    AxumState(app_state): AxumState<AppState>,
    RequestSession { session, .. }: RequestSession,
    Query(req): Query<WeekRosterRequest>,
) -> Result<Json<WeekRosterResponse>, HttpError> {
    let now: PrimitiveDateTime = app_state.now()?;
    let anchor: Date = resolve_week_anchor(req.date.as_deref(), now.date())?;
    let state: RosterState = app_state
        .load_office(&session, req.office_id, req.chart_id)
        .await?;
    Ok(Json(get_week_roster(&state, anchor, now)?))
}

/// Handler for GET `/roster/month` endpoint.
pub async fn handle_month_roster(
    AxumState(app_state): AxumState<AppState>,
    RequestSession { session, .. }: RequestSession,
    Query(req): Query<MonthRosterRequest>,
) -> Result<Json<MonthRosterResponse>, HttpError> {
    let now: PrimitiveDateTime = app_state.now()?;
    let month: CalendarMonth = resolve_month(&req, now.date())?;
    let state: RosterState = app_state
        .load_office(&session, req.office_id, req.chart_id)
        .await?;
    Ok(Json(get_month_roster(&state, month, now)?))
}

/// Handler for GET `/capabilities` endpoint.
pub async fn handle_capabilities(
    AxumState(app_state): AxumState<AppState>,
    RequestSession { session, .. }: RequestSession,
    Query(req): Query<CapabilitiesQuery>,
) -> Result<Json<CapabilitiesResponse>, HttpError> {
    let state: Option<RosterState> = match req.chart_id {
        Some(chart_id) => Some(app_state.load_chart(&session, chart_id).await?),
        None => None,
    };
    Ok(Json(get_capabilities(&session.user, state.as_ref())))
}

// ========================================================================
// Duties
// ========================================================================

/// Handler for POST `/duties` endpoint.
pub async fn handle_assign_duty(
    AxumState(app_state): AxumState<AppState>,
    RequestSession { session, cause }: RequestSession,
    Json(req): Json<AssignDutyRequest>,
) -> Result<Json<AssignDutyResponse>, HttpError> {
    let today: Date = app_state.now()?.date();
    let chart_id: i64 = req.chart_id;
    let state: RosterState = app_state
        .load_office(&session, req.office_id, Some(chart_id))
        .await?;

    let result: ApiResult<AssignDutyResponse> =
        assign_duty(&session, &state, req, cause, today).await?;
    app_state
        .commit(
            &session,
            &result.new_state,
            &LiveEvent::DutyAssigned {
                office_id: result.new_state.office_id(),
                chart_id,
                duty_id: result.response.duty_id,
            },
        )
        .await;
    Ok(Json(result.response))
}

/// Handler for POST `/duties/range` endpoint.
pub async fn handle_assign_duty_range(
    AxumState(app_state): AxumState<AppState>,
    RequestSession { session, cause }: RequestSession,
    Json(req): Json<AssignDutyRangeRequest>,
) -> Result<Json<BulkAssignResponse>, HttpError> {
    let today: Date = app_state.now()?.date();
    let chart_id: i64 = req.chart_id;
    let state: RosterState = app_state
        .load_office(&session, req.office_id, Some(chart_id))
        .await?;

    let result: ApiResult<BulkAssignResponse> =
        assign_duty_range(&session, &state, req, cause, today).await?;
    app_state
        .commit(
            &session,
            &result.new_state,
            &LiveEvent::DutiesAssigned {
                office_id: result.new_state.office_id(),
                chart_id,
                count: result.response.created + result.response.updated,
            },
        )
        .await;
    Ok(Json(result.response))
}

/// Handler for DELETE `/duties/{id}` endpoint.
pub async fn handle_remove_duty(
    AxumState(app_state): AxumState<AppState>,
    RequestSession { session, cause }: RequestSession,
    Path(duty_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    let today: Date = app_state.now()?.date();
    let state: RosterState =
        load_duty_roster(&session, duty_id, app_state.config.week_start, None).await?;

    let result: ApiResult<MessageResponse> =
        remove_duty(&session, &state, duty_id, cause, today).await?;
    app_state
        .commit(
            &session,
            &result.new_state,
            &LiveEvent::DutyRemoved {
                office_id: result.new_state.office_id(),
                chart_id: result.new_state.chart().map(|chart| chart.id),
                duty_id,
            },
        )
        .await;
    Ok(Json(result.response))
}

/// Handler for POST `/duties/import/preview` endpoint.
pub async fn handle_preview_import(
    AxumState(app_state): AxumState<AppState>,
    RequestSession { session, .. }: RequestSession,
    Json(req): Json<CsvImportRequest>,
) -> Result<Json<CsvPreviewResponse>, HttpError> {
    let today: Date = app_state.now()?.date();
    let state: RosterState = app_state
        .load_office(&session, req.office_id, Some(req.chart_id))
        .await?;
    Ok(Json(preview_duty_csv(&session, &state, req, today).await?))
}

/// Handler for POST `/duties/import` endpoint.
pub async fn handle_import(
    AxumState(app_state): AxumState<AppState>,
    RequestSession { session, cause }: RequestSession,
    Json(req): Json<CsvImportRequest>,
) -> Result<Json<BulkAssignResponse>, HttpError> {
    let today: Date = app_state.now()?.date();
    let chart_id: i64 = req.chart_id;
    let state: RosterState = app_state
        .load_office(&session, req.office_id, Some(chart_id))
        .await?;

    let result: ApiResult<BulkAssignResponse> =
        import_duty_csv(&session, &state, req, cause, today).await?;
    info!(
        chart_id,
        created = result.response.created,
        updated = result.response.updated,
        "Imported duties"
    );
    app_state
        .commit(
            &session,
            &result.new_state,
            &LiveEvent::DutiesImported {
                office_id: result.new_state.office_id(),
                chart_id,
                count: result.response.created + result.response.updated,
            },
        )
        .await;
    Ok(Json(result.response))
}

// ========================================================================
// Charts
// ========================================================================

/// Handler for POST `/duty-charts` endpoint.
pub async fn handle_create_chart(
    AxumState(app_state): AxumState<AppState>,
    RequestSession { session, cause }: RequestSession,
    Json(req): Json<CreateChartRequest>,
) -> Result<Json<ChartResponse>, HttpError> {
    let today: Date = app_state.now()?.date();
    let state: RosterState = app_state.load_office(&session, req.office_id, None).await?;

    let result: ApiResult<ChartResponse> =
        create_duty_chart(&session, &state, req, cause, today).await?;
    app_state
        .commit(
            &session,
            &result.new_state,
            &LiveEvent::ChartCreated {
                office_id: result.response.chart.office_id,
                chart_id: result.response.chart.id,
            },
        )
        .await;
    Ok(Json(result.response))
}

/// Handler for PATCH `/duty-charts/{id}` endpoint.
///
/// Renames the chart, adds schedules to it, or both in one backend write.
pub async fn handle_update_chart(
    AxumState(app_state): AxumState<AppState>,
    RequestSession { session, cause }: RequestSession,
    Path(chart_id): Path<i64>,
    Json(req): Json<UpdateChartRequest>,
) -> Result<Json<ChartResponse>, HttpError> {
    let today: Date = app_state.now()?.date();
    let state: RosterState = app_state.load_chart(&session, chart_id).await?;

    let result: ApiResult<ChartResponse> =
        update_duty_chart(&session, &state, chart_id, req, cause, today).await?;
    app_state
        .commit(
            &session,
            &result.new_state,
            &LiveEvent::ChartUpdated {
                office_id: result.new_state.office_id(),
                chart_id,
            },
        )
        .await;
    Ok(Json(result.response))
}

/// Handler for GET `/duty-charts/{id}/schedules` endpoint.
pub async fn handle_chart_schedules(
    AxumState(app_state): AxumState<AppState>,
    RequestSession { session, .. }: RequestSession,
    Path(chart_id): Path<i64>,
) -> Result<Json<ChartSchedulesResponse>, HttpError> {
    let state: RosterState = app_state.load_chart(&session, chart_id).await?;
    let response: ChartSchedulesResponse =
        list_chart_schedule_options(&session, &state, chart_id).await?;
    Ok(Json(response))
}

/// Handler for DELETE `/duty-charts/{id}` endpoint.
pub async fn handle_delete_chart(
    AxumState(app_state): AxumState<AppState>,
    RequestSession { session, cause }: RequestSession,
    Path(chart_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    let today: Date = app_state.now()?.date();
    let state: RosterState = app_state.load_chart(&session, chart_id).await?;

    let result: ApiResult<MessageResponse> =
        delete_duty_chart(&session, &state, chart_id, cause, today).await?;
    app_state
        .commit(
            &session,
            &result.new_state,
            &LiveEvent::ChartDeleted {
                office_id: result.new_state.office_id(),
                chart_id,
            },
        )
        .await;
    Ok(Json(result.response))
}

// ========================================================================
// Exports
// ========================================================================

fn file_response(file: ExportFile) -> Response {
    let disposition: String = format!("attachment; filename=\"{}\"", file.filename);
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response()
}

/// Handler for GET `/export/preview` endpoint.
pub async fn handle_export_preview(
    RequestSession { session, .. }: RequestSession,
    Query(req): Query<ExportRequest>,
) -> Result<Json<ExportPreview>, HttpError> {
    Ok(Json(export_preview(&session, &req).await?))
}

/// Handler for GET `/export/download` endpoint.
pub async fn handle_export_download(
    RequestSession { session, .. }: RequestSession,
    Query(req): Query<ExportRequest>,
) -> Result<Response, HttpError> {
    let file: ExportFile = export_download(&session, &req).await?;
    Ok(file_response(file))
}

/// Handler for GET `/export/roster.csv` endpoint.
pub async fn handle_export_roster_csv(
    AxumState(app_state): AxumState<AppState>,
    RequestSession { session, .. }: RequestSession,
    Query(req): Query<WeekRosterRequest>,
) -> Result<Response, HttpError> {
    let today: Date = app_state.now()?.date();
    let anchor: Date = resolve_week_anchor(req.date.as_deref(), today)?;
    let state: RosterState = app_state
        .load_office(&session, req.office_id, req.chart_id)
        .await?;
    let file: ExportFile = export_weekly_roster_csv(&state, anchor)?;
    Ok(file_response(file))
}

// ========================================================================
// Logs, offices and dashboard
// ========================================================================

/// Handler for GET `/audit-logs` endpoint.
pub async fn handle_audit_logs(
    RequestSession { session, .. }: RequestSession,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<Paginated<AuditLogRecord>>, HttpError> {
    Ok(Json(list_audit_logs(&session, &query).await?))
}

/// Handler for GET `/sms-logs` endpoint.
pub async fn handle_sms_logs(
    RequestSession { session, .. }: RequestSession,
    Query(query): Query<SmsLogQuery>,
) -> Result<Json<Paginated<SmsLogRecord>>, HttpError> {
    Ok(Json(list_sms_logs(&session, &query).await?))
}

/// Handler for GET `/offices` endpoint.
///
/// Only the offices the signed-in user may manage.
pub async fn handle_offices(
    RequestSession { session, .. }: RequestSession,
) -> Result<Json<Vec<Office>>, HttpError> {
    Ok(Json(list_manageable_offices(&session).await?))
}

/// Handler for GET `/dashboard-offices` endpoint.
pub async fn handle_dashboard_offices(
    RequestSession { session, .. }: RequestSession,
) -> Result<Json<Vec<DashboardOfficeRecord>>, HttpError> {
    Ok(Json(list_dashboard_offices(&session).await?))
}

/// Handler for POST `/dashboard-offices/reorder` endpoint.
pub async fn handle_reorder_dashboard(
    RequestSession { session, .. }: RequestSession,
    Json(req): Json<ReorderDashboardRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    Ok(Json(reorder_dashboard_offices(&session, &req).await?))
}

