// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::shift_window::times_overlap;
use crate::types::{Duty, DutyChart, Schedule, ShiftTime};
use time::Date;

/// Validates that a chart does not end before it takes effect.
///
/// # Errors
///
/// Returns `DomainError::InvalidChartDates` if `end_date` precedes `effective_date`.
pub fn validate_chart_dates(effective_date: Date, end_date: Option<Date>) -> Result<(), DomainError> {
    match end_date {
        Some(end_date) if end_date < effective_date => Err(DomainError::InvalidChartDates {
            effective_date,
            end_date,
        }),
        _ => Ok(()),
    }
}

/// Validates an optional chart name.
///
/// A missing name is allowed; a present name must contain non-whitespace.
///
/// # Errors
///
/// Returns `DomainError::InvalidChartName` for a blank name.
pub fn validate_chart_name(name: Option<&str>) -> Result<(), DomainError> {
    match name {
        Some(name) if name.trim().is_empty() => Err(DomainError::InvalidChartName(String::from(
            "Chart name cannot be blank",
        ))),
        _ => Ok(()),
    }
}

/// Validates that a duty date falls inside the chart period.
///
/// # Errors
///
/// Returns an error if the date is before the effective date or after the end date.
pub fn validate_duty_in_chart(chart: &DutyChart, date: Date) -> Result<(), DomainError> {
    if date < chart.effective_date {
        return Err(DomainError::DutyBeforeChartStart {
            date,
            effective_date: chart.effective_date,
        });
    }
    if let Some(end_date) = chart.end_date
        && date > end_date
    {
        return Err(DomainError::DutyAfterChartEnd { date, end_date });
    }
    Ok(())
}

/// Validates that a duty is not dated in the past.
///
/// # Errors
///
/// Returns `DomainError::BackdatedDuty` if `date` is before `today`.
pub fn validate_not_backdated(date: Date, today: Date) -> Result<(), DomainError> {
    if date < today {
        return Err(DomainError::BackdatedDuty { date, today });
    }
    Ok(())
}

/// Validates shift boundaries.
///
/// Overnight shifts (end before start) are valid; only a zero-length shift is rejected.
///
/// # Errors
///
/// Returns `DomainError::InvalidScheduleTimes` if start and end are the same minute.
pub fn validate_schedule_times(start: ShiftTime, end: ShiftTime) -> Result<(), DomainError> {
    if start.hour_minute() == end.hour_minute() {
        return Err(DomainError::InvalidScheduleTimes {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}

/// Resolves a duty's shift interval from its own fields or its schedule.
fn duty_interval(duty: &Duty, schedules: &[Schedule]) -> Option<(ShiftTime, ShiftTime)> {
    if let (Some(start), Some(end)) = (duty.details.start_time, duty.details.end_time) {
        return Some((start, end));
    }
    schedules
        .iter()
        .find(|s| s.id == duty.schedule_id)
        .map(|s| (s.start_time, s.end_time))
}

/// Finds an existing duty of the same employee on the same day whose shift overlaps.
///
/// Duties whose interval cannot be resolved are ignored.
///
/// # Arguments
///
/// * `user_id` - The employee being assigned
/// * `date` - The day of the new duty
/// * `interval` - The new duty's `(start, end)`
/// * `existing` - Duties already known
/// * `schedules` - Schedules used to resolve intervals of existing duties
#[must_use]
pub fn find_overlapping_duty<'a>(
    user_id: i64,
    date: Date,
    interval: (ShiftTime, ShiftTime),
    existing: &'a [Duty],
    schedules: &[Schedule],
) -> Option<&'a Duty> {
    existing
        .iter()
        .filter(|d| d.user_id == user_id && d.date == date)
        .find(|d| {
            duty_interval(d, schedules)
                .is_some_and(|(start, end)| times_overlap(interval.0, interval.1, start, end))
        })
}

/// Validates that a new duty does not overlap the employee's other shifts that day.
///
/// # Errors
///
/// Returns `DomainError::ShiftOverlap` naming the first conflicting duty.
pub fn validate_no_overlap(
    user_id: i64,
    date: Date,
    interval: (ShiftTime, ShiftTime),
    existing: &[Duty],
    schedules: &[Schedule],
) -> Result<(), DomainError> {
    match find_overlapping_duty(user_id, date, interval, existing, schedules) {
        Some(conflict) => Err(DomainError::ShiftOverlap {
            user_id,
            date,
            existing_duty_id: conflict.id,
        }),
        None => Ok(()),
    }
}

/// Validates that the employee has no other duty on the same day.
///
/// # Errors
///
/// Returns `DomainError::DuplicateDutyForDay` if one exists.
pub fn validate_single_duty_per_day(user_id: i64, date: Date, existing: &[Duty]) -> Result<(), DomainError> {
    if existing.iter().any(|d| d.user_id == user_id && d.date == date) {
        return Err(DomainError::DuplicateDutyForDay { user_id, date });
    }
    Ok(())
}
