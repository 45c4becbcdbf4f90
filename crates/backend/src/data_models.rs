// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wire records exchanged with the backend and their domain conversions.

use crate::error::BackendError;
use duty_roster_domain::{
    Duty, DutyChart, DutyChartDraft, DutyDetails, DutyDraft, Employee, Office, Schedule,
    ShiftTime, format_iso_date, parse_iso_date,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const fn default_true() -> bool {
    true
}

fn parse_optional_time(value: Option<&str>) -> Result<Option<ShiftTime>, BackendError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => Ok(Some(raw.parse()?)),
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Total number of matching records.
    pub count: u64,
    /// URL of the next page.
    pub next: Option<String>,
    /// URL of the previous page.
    pub previous: Option<String>,
    /// Records on this page.
    pub results: Vec<T>,
}

/// A list endpoint that may or may not paginate.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    /// `{ "results": [...] }`
    Page {
        /// Records on this page.
        results: Vec<T>,
    },
    /// A bare array.
    List(Vec<T>),
}

impl<T> ListResponse<T> {
    /// Returns the records regardless of shape.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Page { results } | Self::List(results) => results,
        }
    }
}

/// The signed-in user as returned by `auth/me/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUserRecord {
    pub id: i64,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub employee_id: Option<String>,
    pub role: String,
    pub office_id: Option<i64>,
    #[serde(default)]
    pub secondary_offices: Vec<i64>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// `offices/` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeRecord {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub department: Option<i64>,
    pub department_name: Option<String>,
    pub directorate_name: Option<String>,
}

impl From<OfficeRecord> for Office {
    fn from(record: OfficeRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            department_id: record.department,
            department_name: record.department_name,
            directorate_name: record.directorate_name,
        }
    }
}

/// `users/` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub employee_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub office: Option<i64>,
    pub office_name: Option<String>,
    pub department: Option<i64>,
    pub department_name: Option<String>,
    pub directorate: Option<i64>,
    pub directorate_name: Option<String>,
    pub secondary_offices: Option<Vec<i64>>,
    pub position: Option<i64>,
    pub position_name: Option<String>,
    pub is_activated: Option<bool>,
}

impl From<UserRecord> for Employee {
    fn from(record: UserRecord) -> Self {
        let full_name: String = record
            .full_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(record.username);
        Self {
            id: record.id,
            full_name,
            email: Some(record.email).filter(|e| !e.is_empty()),
            employee_id: record.employee_id,
            phone_number: record.phone_number,
            office_id: record.office,
            office_name: record.office_name,
            position_name: record.position_name,
            department_name: record.department_name,
            directorate_name: record.directorate_name,
            secondary_offices: record.secondary_offices.unwrap_or_default(),
        }
    }
}

/// `schedule/` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub id: i64,
    pub name: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub office: Option<i64>,
    pub office_name: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<ScheduleRecord> for Schedule {
    type Error = BackendError;

    fn try_from(record: ScheduleRecord) -> Result<Self, Self::Error> {
        let mut schedule: Self = Self::new(
            record.id,
            record.name,
            record.start_time.parse()?,
            record.end_time.parse()?,
            record.office,
        );
        schedule.office_name = record.office_name;
        schedule.status = record.status;
        Ok(schedule)
    }
}

/// `duty-charts/` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyChartRecord {
    pub id: i64,
    pub office: i64,
    pub effective_date: String,
    pub end_date: Option<String>,
    pub name: Option<String>,
    pub schedules: Option<Vec<i64>>,
    pub office_name: Option<String>,
    pub department_name: Option<String>,
    pub directorate_name: Option<String>,
    pub duties_count: Option<u64>,
}

impl TryFrom<DutyChartRecord> for DutyChart {
    type Error = BackendError;

    fn try_from(record: DutyChartRecord) -> Result<Self, Self::Error> {
        let end_date: Option<time::Date> = match record.end_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_iso_date(raw)?),
        };
        Ok(Self {
            id: record.id,
            name: record.name,
            office_id: record.office,
            effective_date: parse_iso_date(&record.effective_date)?,
            end_date,
            schedule_ids: record.schedules.unwrap_or_default(),
        })
    }
}

/// Body of `POST duty-charts/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DutyChartWrite {
    pub office: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub effective_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub schedules: Vec<i64>,
}

impl From<&DutyChartDraft> for DutyChartWrite {
    fn from(draft: &DutyChartDraft) -> Self {
        Self {
            office: draft.office_id,
            name: draft.name.clone(),
            effective_date: format_iso_date(draft.effective_date),
            end_date: draft.end_date.map(format_iso_date),
            schedules: draft.schedule_ids.clone(),
        }
    }
}

/// Body of `PATCH duty-charts/{id}/`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DutyChartPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedules: Option<Vec<i64>>,
}

/// `duties/` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyRecord {
    pub id: i64,
    pub date: String,
    pub user: i64,
    pub office: i64,
    pub schedule: i64,
    pub duty_chart: Option<i64>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default = "default_true")]
    pub currently_available: bool,
    pub user_name: Option<String>,
    pub office_name: Option<String>,
    pub schedule_name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub position_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub user_office_name: Option<String>,
    pub user_department_name: Option<String>,
    pub user_directorate_name: Option<String>,
}

impl TryFrom<DutyRecord> for Duty {
    type Error = BackendError;

    fn try_from(record: DutyRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            date: parse_iso_date(&record.date)?,
            user_id: record.user,
            office_id: record.office,
            schedule_id: record.schedule,
            duty_chart_id: record.duty_chart,
            is_completed: record.is_completed,
            currently_available: record.currently_available,
            details: DutyDetails {
                start_time: parse_optional_time(record.start_time.as_deref())?,
                end_time: parse_optional_time(record.end_time.as_deref())?,
                user_name: record.user_name,
                office_name: record.office_name,
                schedule_name: record.schedule_name,
                position_name: record.position_name,
                phone_number: record.phone_number,
                email: record.email,
                user_office_name: record.user_office_name,
                user_department_name: record.user_department_name,
                user_directorate_name: record.user_directorate_name,
            },
        })
    }
}

/// Body of `POST duties/` and one element of `duties/bulk-upsert/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DutyWrite {
    pub date: String,
    pub user: i64,
    pub office: i64,
    pub schedule: i64,
    pub duty_chart: i64,
    pub is_completed: bool,
    pub currently_available: bool,
}

impl From<&DutyDraft> for DutyWrite {
    fn from(draft: &DutyDraft) -> Self {
        Self {
            date: format_iso_date(draft.date),
            user: draft.user_id,
            office: draft.office_id,
            schedule: draft.schedule_id,
            duty_chart: draft.duty_chart_id,
            is_completed: draft.is_completed,
            currently_available: draft.currently_available,
        }
    }
}

/// Response of `duties/bulk-upsert/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUpsertResult {
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub updated: u64,
}

impl BulkUpsertResult {
    /// Number of duties written.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.created + self.updated
    }
}

/// `auditlogs/` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogRecord {
    pub id: String,
    pub timestamp: String,
    pub actor: Option<i64>,
    pub actor_userid: Option<String>,
    pub actor_employee_id: Option<String>,
    pub actor_full_name: Option<String>,
    pub actor_email: Option<String>,
    pub action: String,
    pub entity_type: String,
    pub ip_address: Option<String>,
    pub status: String,
    pub details: Option<serde_json::Value>,
}

/// `notifications/sms-logs/` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsLogRecord {
    pub id: i64,
    pub user: Option<i64>,
    pub phone: String,
    pub message: String,
    pub status: String,
    pub response_raw: Option<serde_json::Value>,
    pub created_at: String,
    pub user_full_name: Option<String>,
}

/// `user-dashboard-offices/` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardOfficeRecord {
    pub id: i64,
    pub user: i64,
    pub office: i64,
    pub office_name: Option<String>,
    pub order: i64,
}

/// One `{id, order}` pair of a dashboard reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardOrder {
    pub id: i64,
    pub order: i64,
}

/// Chart header of an export preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportChartSummary {
    pub id: i64,
    pub name: Option<String>,
    pub office: Option<String>,
    pub effective_date: String,
    pub end_date: Option<String>,
}

/// Column descriptor of an export preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportColumn {
    pub key: String,
    pub label: String,
}

/// Pagination block of an export preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

/// Response of `export/duty-chart/preview/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPreview {
    pub chart: ExportChartSummary,
    pub columns: Vec<ExportColumn>,
    pub pagination: ExportPagination,
    pub rows: Vec<BTreeMap<String, serde_json::Value>>,
}
