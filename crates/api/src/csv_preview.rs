// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV preview and validation for bulk duty import.
//!
//! Rows are matched against the office's employees and the loaded chart's
//! schedules and checked with the same rules as a single assignment. Nothing
//! is sent to the backend here; valid rows come back as drafts.

use csv::StringRecord;
use duty_roster::RosterState;
use duty_roster_domain::{
    DomainError, Duty, DutyChart, DutyDraft, Employee, Schedule, format_iso_date, parse_iso_date,
    validate_duty_in_chart, validate_no_overlap, validate_not_backdated,
    validate_single_duty_per_day,
};
use std::collections::{HashMap, HashSet};
use time::Date;

use crate::error::ApiError;
use crate::request_response::{CsvPreviewResponse, CsvRowPreview, CsvRowStatus};

/// Required CSV column headers (case-insensitive, normalized).
pub const REQUIRED_HEADERS: &[&str] = &["date", "employee_id", "schedule"];

/// Result of previewing a duty CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutyCsvPreview {
    /// Per-row results for display.
    pub response: CsvPreviewResponse,
    /// Drafts for the valid rows, in file order.
    pub drafts: Vec<DutyDraft>,
}

/// Normalizes a CSV header string for case-insensitive, whitespace-tolerant matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Validates that all required headers are present in the CSV.
fn validate_headers(headers: &StringRecord) -> Result<HashMap<String, usize>, ApiError> {
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| (normalize_header(header), idx))
        .collect();

    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|required| !header_map.contains_key(*required))
        .collect();

    if !missing.is_empty() {
        return Err(ApiError::InvalidCsvFormat {
            reason: format!("Missing required headers: {}", missing.join(", ")),
        });
    }

    Ok(header_map)
}

/// Finds the employee a CSV value refers to.
///
/// The organization employee number wins; a bare number falls back to the
/// backend user id.
fn match_employee<'a>(value: &str, employees: &'a [Employee]) -> Option<&'a Employee> {
    employees
        .iter()
        .find(|e| {
            e.employee_id
                .as_deref()
                .is_some_and(|id| id.trim().eq_ignore_ascii_case(value))
        })
        .or_else(|| {
            let id: i64 = value.parse().ok()?;
            employees.iter().find(|e| e.id == id)
        })
}

/// Finds the chart schedule a CSV value refers to, by id or by name.
fn match_schedule<'a>(value: &str, schedules: &'a [Schedule]) -> Result<&'a Schedule, String> {
    if let Ok(id) = value.parse::<i64>()
        && let Some(schedule) = schedules.iter().find(|s| s.id == id)
    {
        return Ok(schedule);
    }

    let mut named = schedules
        .iter()
        .filter(|s| s.display_name().eq_ignore_ascii_case(value));
    match (named.next(), named.next()) {
        (Some(schedule), None) => Ok(schedule),
        (Some(_), Some(_)) => Err(format!(
            "schedule: '{value}' matches more than one shift, use the schedule id"
        )),
        (None, _) => Err(format!("schedule: no shift on this chart matches '{value}'")),
    }
}

/// Checks a matched row against the chart and the duties already on it.
///
/// A row repeating an existing duty's employee and shift is an update, so
/// that duty is not a conflict.
fn validate_row(
    chart: &DutyChart,
    state: &RosterState,
    user_id: i64,
    schedule: &Schedule,
    date: Date,
    today: Date,
) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();

    if let Err(e) = validate_duty_in_chart(chart, date) {
        errors.push(format!("date: {e}"));
    }
    if let Err(e) = validate_not_backdated(date, today) {
        errors.push(format!("date: {e}"));
    }

    let others: Vec<Duty> = state
        .duties()
        .iter()
        .filter(|d| !(d.user_id == user_id && d.schedule_id == schedule.id))
        .cloned()
        .collect();
    let conflict: Result<(), DomainError> = validate_no_overlap(
        user_id,
        date,
        (schedule.start_time, schedule.end_time),
        &others,
        state.schedules(),
    )
    .and_then(|()| validate_single_duty_per_day(user_id, date, &others));
    if let Err(e) = conflict {
        errors.push(format!("schedule: {e}"));
    }

    errors
}

/// Previews and validates CSV duty rows for the loaded chart.
///
/// # Arguments
///
/// * `csv_content` - The raw CSV content
/// * `state` - The roster with the target chart loaded
/// * `employees` - Employees the rows may refer to
/// * `today` - The current local date
///
/// # Errors
///
/// Returns an error if no chart is loaded or the CSV headers are invalid.
/// Row-level problems are reported per row instead.
#[allow(clippy::too_many_lines)]
pub fn preview_duty_csv(
    csv_content: &str,
    state: &RosterState,
    employees: &[Employee],
    today: Date,
) -> Result<DutyCsvPreview, ApiError> {
    let chart: &DutyChart = state.chart().ok_or_else(|| ApiError::ResourceNotFound {
        resource_type: String::from("Duty chart"),
        message: String::from("Select a duty chart before importing duties"),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(csv_content.as_bytes());

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| ApiError::InvalidCsvFormat {
            reason: format!("Failed to read CSV headers: {e}"),
        })?
        .clone();
    let header_map: HashMap<String, usize> = validate_headers(&headers)?;

    let mut rows: Vec<CsvRowPreview> = Vec::new();
    let mut drafts: Vec<DutyDraft> = Vec::new();
    let mut seen: HashSet<(i64, Date)> = HashSet::new();

    for (idx, result) in reader.records().enumerate() {
        let row_number: usize = idx + 1;

        let record: StringRecord = match result {
            Ok(rec) => rec,
            Err(e) => {
                rows.push(CsvRowPreview {
                    row_number,
                    date: None,
                    employee: None,
                    schedule: None,
                    status: CsvRowStatus::Invalid,
                    errors: vec![format!("CSV parse error: {e}")],
                });
                continue;
            }
        };

        let get_field = |name: &str| -> Option<String> {
            header_map
                .get(name)
                .and_then(|&idx| record.get(idx))
                .map(str::to_string)
                .filter(|s| !s.is_empty())
        };

        let mut errors: Vec<String> = Vec::new();
        let raw_date: Option<String> = get_field("date");
        let raw_employee: Option<String> = get_field("employee_id");
        let raw_schedule: Option<String> = get_field("schedule");

        let date: Option<Date> = match raw_date.as_deref() {
            Some(value) => parse_iso_date(value)
                .map_err(|e| errors.push(format!("date: {e}")))
                .ok(),
            None => {
                errors.push(String::from("date: required field is missing or empty"));
                None
            }
        };

        let employee: Option<&Employee> = match raw_employee.as_deref() {
            Some(value) => {
                let found: Option<&Employee> = match_employee(value, employees);
                if found.is_none() {
                    errors.push(format!("employee_id: no employee matches '{value}'"));
                }
                found
            }
            None => {
                errors.push(String::from(
                    "employee_id: required field is missing or empty",
                ));
                None
            }
        };

        let schedule: Option<&Schedule> = match raw_schedule.as_deref() {
            Some(value) => match_schedule(value, state.schedules())
                .map_err(|e| errors.push(e))
                .ok(),
            None => {
                errors.push(String::from("schedule: required field is missing or empty"));
                None
            }
        };

        if let (Some(date), Some(employee), Some(schedule)) = (date, employee, schedule) {
            errors.extend(validate_row(chart, state, employee.id, schedule, date, today));

            if !seen.insert((employee.id, date)) {
                errors.push(format!(
                    "employee_id: duplicate within CSV - '{}' already has a duty on {}",
                    employee.full_name,
                    format_iso_date(date)
                ));
            }

            if errors.is_empty() {
                drafts.push(DutyDraft::new(
                    date,
                    employee.id,
                    chart.office_id,
                    schedule.id,
                    chart.id,
                ));
            }
        }

        let status: CsvRowStatus = if errors.is_empty() {
            CsvRowStatus::Valid
        } else {
            CsvRowStatus::Invalid
        };

        rows.push(CsvRowPreview {
            row_number,
            date: date.map(format_iso_date).or(raw_date),
            employee: employee.map(|e| e.full_name.clone()).or(raw_employee),
            schedule: schedule.map(|s| s.display_name().to_string()).or(raw_schedule),
            status,
            errors,
        });
    }

    let total_rows: usize = rows.len();
    let valid_count: usize = rows
        .iter()
        .filter(|r| r.status == CsvRowStatus::Valid)
        .count();

    Ok(DutyCsvPreview {
        response: CsvPreviewResponse {
            rows,
            total_rows,
            valid_count,
            invalid_count: total_rows - valid_count,
        },
        drafts,
    })
}
