// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary of the duty roster.
//!
//! Handlers here check the signed-in user's permissions, run commands
//! through the core state machine and forward the resulting mutations to
//! the backend. Transport concerns belong to the server crate.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod capabilities;
mod csv_preview;
mod error;
mod handlers;
mod request_response;
mod roster_export;

#[cfg(test)]
mod tests;

pub use auth::{AuthUser, AuthorizationService, Role, Session, permissions};
pub use capabilities::{compute_chart_capabilities, compute_global_capabilities, manageable_offices};
pub use csv_preview::{DutyCsvPreview, REQUIRED_HEADERS};
pub use error::{
    ApiError, AuthError, extract_backend_message, translate_backend_error, translate_core_error,
    translate_domain_error,
};
pub use handlers::{
    ApiResult, assign_duty, assign_duty_range, create_duty_chart, delete_duty_chart,
    export_download, export_preview, export_weekly_roster_csv, get_capabilities,
    get_month_roster, get_week_roster, import_duty_csv, list_audit_logs,
    list_chart_schedule_options, list_dashboard_offices, list_manageable_offices, list_sms_logs,
    load_chart_roster, load_duty_roster, load_roster, preview_duty_csv, remove_duty,
    reorder_dashboard_offices, resolve_month, resolve_week_anchor, update_duty_chart,
};
pub use request_response::{
    AssignDutyRangeRequest, AssignDutyRequest, AssignDutyResponse, AssignmentInfo,
    BulkAssignResponse, CalendarKind, CapabilitiesResponse, Capability, CellInfo, ChartCapabilities,
    ChartInfo, ChartResponse, ChartSchedulesResponse, CreateChartRequest, CsvImportRequest,
    CsvPreviewResponse, CsvRowPreview, CsvRowStatus, DayInfo, ExportFile, ExportRequest,
    GlobalCapabilities, MessageResponse, MonthRosterRequest, MonthRosterResponse,
    ReorderDashboardRequest, ScheduleOption, ShiftInfo, UpdateChartRequest, WeekRosterRequest,
    WeekRosterResponse, parse_date_field, parse_required_date,
};
pub use roster_export::{RosterCsvError, WEEKLY_ROSTER_HEADERS, weekly_roster_csv, weekly_roster_filename};
