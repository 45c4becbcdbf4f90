// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Display-ready assignments and the day x shift index.

use crate::shifts::{Shift, ShiftKey};
use crate::types::{Duty, Employee, Office, ShiftTime};
use std::collections::{BTreeMap, HashMap};
use time::Date;

/// Name shown when a duty carries no employee name.
pub const UNKNOWN_EMPLOYEE: &str = "Unknown";

/// A duty enriched with employee and office details for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// The duty id.
    pub duty_id: i64,
    /// The duty date.
    pub date: Date,
    /// The assigned employee.
    pub user_id: i64,
    /// The schedule the duty uses.
    pub schedule_id: i64,
    /// The office the duty is performed for.
    pub office_id: i64,
    /// Employee name, or "Unknown".
    pub employee_name: String,
    /// Shift name, or "Shift".
    pub shift_name: String,
    /// Shift start, when the backend supplied it.
    pub start_time: Option<ShiftTime>,
    /// Shift end, when the backend supplied it.
    pub end_time: Option<ShiftTime>,
    /// Contact phone.
    pub phone_number: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Directorate label.
    pub directorate: Option<String>,
    /// Department label.
    pub department: Option<String>,
    /// Position title.
    pub position: Option<String>,
    /// Office label.
    pub office: Option<String>,
    /// Completion flag.
    pub is_completed: bool,
    /// Availability flag.
    pub currently_available: bool,
}

/// Returns the first candidate that is present and non-empty.
fn first_present(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
        .map(|value| (*value).to_string())
}

/// Builds the display record for a duty.
///
/// Fields fall back from the duty's own denormalized values to the
/// employee record, then to the duty office:
///
/// - phone, email, position: duty, then employee
/// - directorate, department: duty, then employee, then duty office
/// - office label: employee office on the duty, then employee, then duty office name
///
/// # Arguments
///
/// * `duty` - The duty as returned by the backend
/// * `employee` - Cached employee record, if fetched
/// * `duty_office` - Cached record for the duty's office, if fetched
#[must_use]
pub fn enrich_duty(duty: &Duty, employee: Option<&Employee>, duty_office: Option<&Office>) -> Assignment {
    let d = &duty.details;

    Assignment {
        duty_id: duty.id,
        date: duty.date,
        user_id: duty.user_id,
        schedule_id: duty.schedule_id,
        office_id: duty.office_id,
        employee_name: first_present(&[d.user_name.as_deref()])
            .unwrap_or_else(|| String::from(UNKNOWN_EMPLOYEE)),
        shift_name: first_present(&[d.schedule_name.as_deref()])
            .unwrap_or_else(|| String::from(crate::types::Schedule::DEFAULT_NAME)),
        start_time: d.start_time,
        end_time: d.end_time,
        phone_number: first_present(&[
            d.phone_number.as_deref(),
            employee.and_then(|e| e.phone_number.as_deref()),
        ]),
        email: first_present(&[d.email.as_deref(), employee.and_then(|e| e.email.as_deref())]),
        directorate: first_present(&[
            d.user_directorate_name.as_deref(),
            employee.and_then(|e| e.directorate_name.as_deref()),
            duty_office.and_then(|o| o.directorate_name.as_deref()),
        ]),
        department: first_present(&[
            d.user_department_name.as_deref(),
            employee.and_then(|e| e.department_name.as_deref()),
            duty_office.and_then(|o| o.department_name.as_deref()),
        ]),
        position: first_present(&[
            d.position_name.as_deref(),
            employee.and_then(|e| e.position_name.as_deref()),
        ]),
        office: first_present(&[
            d.user_office_name.as_deref(),
            employee.and_then(|e| e.office_name.as_deref()),
            d.office_name.as_deref(),
        ]),
        is_completed: duty.is_completed,
        currently_available: duty.currently_available,
    }
}

/// Enriches every duty using id-keyed caches.
#[must_use]
pub fn enrich_duties(
    duties: &[Duty],
    employees: &HashMap<i64, Employee>,
    offices: &HashMap<i64, Office>,
) -> Vec<Assignment> {
    duties
        .iter()
        .map(|duty| {
            enrich_duty(
                duty,
                employees.get(&duty.user_id),
                offices.get(&duty.office_id),
            )
        })
        .collect()
}

/// Assignments indexed by day, then shift column.
pub type GroupedAssignments = BTreeMap<Date, HashMap<ShiftKey, Vec<Assignment>>>;

/// Groups assignments into grid cells.
///
/// Every `(day, shift)` pair is present, possibly empty. An assignment lands
/// in every column whose shift name equals its own, so same-named shifts with
/// different hours share assignments.
#[must_use]
pub fn group_assignments(assignments: &[Assignment], days: &[Date], shifts: &[Shift]) -> GroupedAssignments {
    let mut grouped: GroupedAssignments = BTreeMap::new();

    for day in days {
        let cells: &mut HashMap<ShiftKey, Vec<Assignment>> = grouped.entry(*day).or_default();
        for shift in shifts {
            let matching: Vec<Assignment> = assignments
                .iter()
                .filter(|a| a.date == *day && a.shift_name == shift.name())
                .cloned()
                .collect();
            cells.insert(shift.key.clone(), matching);
        }
    }

    grouped
}
