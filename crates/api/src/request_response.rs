// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API layer.
//!
//! Dates travel as `YYYY-MM-DD` strings and times as `HH:MM`.

use crate::error::ApiError;
use duty_roster_backend::{DashboardOrder, ExportFormat, ExportScope};
use duty_roster_domain::{
    Assignment, DutyChart, GridDay, Schedule, Shift, format_iso_date, parse_iso_date,
};
use serde::{Deserialize, Serialize};
use time::Date;

// ========================================================================
// Roster views
// ========================================================================

/// Query of the week view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WeekRosterRequest {
    /// The office whose roster is shown.
    pub office_id: i64,
    /// The chart to show; the roster is empty without one.
    pub chart_id: Option<i64>,
    /// Any day of the wanted week; defaults to today.
    pub date: Option<String>,
}

/// Calendar used to pick a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarKind {
    /// Bikram Sambat months.
    #[default]
    Bs,
    /// Gregorian months.
    Gregorian,
}

/// Query of the month view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonthRosterRequest {
    /// The office whose roster is shown.
    pub office_id: i64,
    /// The chart to show.
    pub chart_id: Option<i64>,
    /// Calendar of `year` and `month`.
    #[serde(default)]
    pub calendar: CalendarKind,
    /// Year; defaults to the year containing today.
    pub year: Option<i32>,
    /// 1-based month; defaults to the month containing today.
    pub month: Option<u8>,
}

/// A chart as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartInfo {
    pub id: i64,
    pub name: Option<String>,
    pub office_id: i64,
    pub effective_date: String,
    pub end_date: Option<String>,
    pub schedule_ids: Vec<i64>,
}

impl From<&DutyChart> for ChartInfo {
    fn from(chart: &DutyChart) -> Self {
        Self {
            id: chart.id,
            name: chart.name.clone(),
            office_id: chart.office_id,
            effective_date: format_iso_date(chart.effective_date),
            end_date: chart.end_date.map(format_iso_date),
            schedule_ids: chart.schedule_ids.clone(),
        }
    }
}

/// A shift column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftInfo {
    /// Stable column key.
    pub key: String,
    pub name: String,
    /// Schedule used when creating duties in this column.
    pub schedule_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub crosses_midnight: bool,
}

impl From<&Shift> for ShiftInfo {
    fn from(shift: &Shift) -> Self {
        Self {
            key: shift.key.to_string(),
            name: shift.name().to_string(),
            schedule_id: shift.schedule_id,
            start_time: shift.start_time.to_string(),
            end_time: shift.end_time.to_string(),
            crosses_midnight: shift.end_time.hour_minute() < shift.start_time.hour_minute(),
        }
    }
}

/// A day of a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayInfo {
    pub date: String,
    /// Bikram Sambat date, when convertible.
    pub bs_date: Option<String>,
    /// False for padding days of a month grid.
    pub in_month: bool,
}

impl From<&GridDay> for DayInfo {
    fn from(day: &GridDay) -> Self {
        Self {
            date: format_iso_date(day.date),
            bs_date: day.bs_date.map(|d| d.to_string()),
            in_month: day.in_month,
        }
    }
}

/// One assignment in a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentInfo {
    pub duty_id: i64,
    pub date: String,
    pub user_id: i64,
    pub schedule_id: i64,
    pub employee_name: String,
    pub shift_name: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub office: Option<String>,
    pub directorate: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub is_completed: bool,
    pub currently_available: bool,
    /// Whether the shift is in progress right now.
    pub active_now: bool,
}

impl AssignmentInfo {
    /// Builds the client view of an assignment.
    #[must_use]
    pub fn new(assignment: &Assignment, active_now: bool) -> Self {
        Self {
            duty_id: assignment.duty_id,
            date: format_iso_date(assignment.date),
            user_id: assignment.user_id,
            schedule_id: assignment.schedule_id,
            employee_name: assignment.employee_name.clone(),
            shift_name: assignment.shift_name.clone(),
            start_time: assignment.start_time.map(|t| t.to_string()),
            end_time: assignment.end_time.map(|t| t.to_string()),
            phone_number: assignment.phone_number.clone(),
            email: assignment.email.clone(),
            office: assignment.office.clone(),
            directorate: assignment.directorate.clone(),
            department: assignment.department.clone(),
            position: assignment.position.clone(),
            is_completed: assignment.is_completed,
            currently_available: assignment.currently_available,
            active_now,
        }
    }
}

/// The assignments of one day and shift column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellInfo {
    pub date: String,
    pub shift_key: String,
    pub assignments: Vec<AssignmentInfo>,
}

/// Response of the week view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRosterResponse {
    pub office_id: i64,
    pub chart: Option<ChartInfo>,
    pub days: Vec<DayInfo>,
    pub shifts: Vec<ShiftInfo>,
    /// Every day x shift cell, day-major.
    pub cells: Vec<CellInfo>,
    /// Anchor of the preceding week.
    pub previous_week: String,
    /// Anchor of the following week.
    pub next_week: String,
}

/// Response of the month view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRosterResponse {
    pub office_id: i64,
    pub chart: Option<ChartInfo>,
    /// E.g. "Poush 2081".
    pub label: String,
    pub month_start: String,
    pub month_end: String,
    /// Column headers, in the month's calendar.
    pub weekday_labels: Vec<String>,
    /// Years offered by the month picker, in the month's calendar.
    pub year_options: Vec<i32>,
    /// Rows of seven days.
    pub weeks: Vec<Vec<DayInfo>>,
    pub shifts: Vec<ShiftInfo>,
    pub cells: Vec<CellInfo>,
}

// ========================================================================
// Mutations
// ========================================================================

/// Assigns one duty on the loaded chart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssignDutyRequest {
    pub office_id: i64,
    pub chart_id: i64,
    pub user_id: Option<i64>,
    pub schedule_id: Option<i64>,
    /// Shift column key from a roster view; used when `schedule_id` is absent.
    #[serde(default)]
    pub shift_key: Option<String>,
    pub date: String,
}

/// Assigns one duty per day of an inclusive range.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssignDutyRangeRequest {
    pub office_id: i64,
    pub chart_id: i64,
    pub user_id: Option<i64>,
    pub schedule_id: Option<i64>,
    /// Shift column key from a roster view; used when `schedule_id` is absent.
    #[serde(default)]
    pub shift_key: Option<String>,
    pub start_date: String,
    pub end_date: String,
}

/// Creates a chart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateChartRequest {
    pub office_id: i64,
    pub name: Option<String>,
    pub effective_date: String,
    pub end_date: Option<String>,
    #[serde(default)]
    pub schedule_ids: Vec<i64>,
}

/// A schedule offered in the chart editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOption {
    pub id: i64,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    /// Whether the chart already carries this schedule.
    pub on_chart: bool,
}

impl ScheduleOption {
    #[must_use]
    pub fn new(schedule: &Schedule, on_chart: bool) -> Self {
        Self {
            id: schedule.id,
            name: schedule.display_name().to_string(),
            start_time: schedule.start_time.to_string(),
            end_time: schedule.end_time.to_string(),
            on_chart,
        }
    }
}

/// Schedules to offer when editing a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSchedulesResponse {
    pub chart_id: i64,
    pub schedules: Vec<ScheduleOption>,
}

/// Renames a chart and/or adds schedules to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateChartRequest {
    pub name: Option<String>,
    /// Selected schedules; only ids the chart lacks are added.
    pub schedule_ids: Option<Vec<i64>>,
}

/// A plain confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Result of a single duty assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignDutyResponse {
    pub message: String,
    pub duty_id: i64,
}

/// Result of a range assignment or CSV import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAssignResponse {
    pub message: String,
    pub created: u64,
    pub updated: u64,
}

/// Result of a chart create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartResponse {
    pub message: String,
    pub chart: ChartInfo,
}

// ========================================================================
// CSV import
// ========================================================================

/// CSV duties to preview or import into a chart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CsvImportRequest {
    pub office_id: i64,
    pub chart_id: i64,
    pub csv_content: String,
}

/// Status of a CSV row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvRowStatus {
    /// The row can be imported.
    Valid,
    /// The row has errors.
    Invalid,
}

/// One previewed CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRowPreview {
    /// 1-based, excluding the header.
    pub row_number: usize,
    pub date: Option<String>,
    pub employee: Option<String>,
    pub schedule: Option<String>,
    pub status: CsvRowStatus,
    pub errors: Vec<String>,
}

/// Response of a CSV preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvPreviewResponse {
    pub rows: Vec<CsvRowPreview>,
    pub total_rows: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
}

// ========================================================================
// Exports
// ========================================================================

/// A file handed back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Query of the chart export preview and download.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportRequest {
    pub chart_id: i64,
    #[serde(default)]
    pub scope: ExportScope,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// Only used for downloads.
    pub format: Option<ExportFormat>,
}

// ========================================================================
// Dashboard
// ========================================================================

/// New positions of the signed-in user's dashboard offices.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReorderDashboardRequest {
    pub orders: Vec<DashboardOrder>,
}

// ========================================================================
// Capability Model
// ========================================================================

/// Represents whether a specific action is permitted.
///
/// Serializes to JSON as true/false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let b: bool = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(b))
    }
}

/// Actions that do not depend on a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalCapabilities {
    /// Create charts for managed offices.
    pub can_create_chart: Capability,
    /// Create charts for any office.
    pub can_create_any_office_chart: Capability,
    /// Pick employees and offices outside the managed set.
    pub can_assign_any_office_employee: Capability,
    pub can_delete_duty: Capability,
    pub can_delete_chart: Capability,
    pub can_export_chart: Capability,
}

/// Actions on one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartCapabilities {
    pub chart_id: i64,
    pub can_create_duty: Capability,
    pub can_edit_chart: Capability,
    pub can_delete_duty: Capability,
    pub can_delete_chart: Capability,
    pub can_export_chart: Capability,
}

/// Response of the capabilities query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitiesResponse {
    pub user_id: i64,
    pub role: String,
    pub global: GlobalCapabilities,
    pub chart: Option<ChartCapabilities>,
}

/// Parses an optional `YYYY-MM-DD` field, defaulting when absent.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` naming `field` if the value is not a date.
pub fn parse_date_field(
    field: &str,
    value: Option<&str>,
    default: Date,
) -> Result<Date, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => parse_required_date(field, raw),
    }
}

/// Parses a required `YYYY-MM-DD` field.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` naming `field` if the value is not a date.
pub fn parse_required_date(field: &str, value: &str) -> Result<Date, ApiError> {
    parse_iso_date(value).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: e.to_string(),
    })
}
