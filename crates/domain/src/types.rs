// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// Formats a date as `YYYY-MM-DD`, the wire and display format for roster dates.
#[must_use]
pub fn format_iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Parses a `YYYY-MM-DD` date string.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid calendar date.
pub fn parse_iso_date(value: &str) -> Result<Date, DomainError> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(value.trim(), format).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// A wall-clock shift boundary.
///
/// Parsed from `HH:MM` or `HH:MM:SS`. Equality and ordering include seconds;
/// shift identity uses [`ShiftTime::hour_minute`] only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShiftTime(time::Time);

impl ShiftTime {
    /// Creates a shift time from hour and minute.
    ///
    /// # Errors
    ///
    /// Returns an error if the hour or minute is out of range.
    pub fn from_hm(hour: u8, minute: u8) -> Result<Self, DomainError> {
        time::Time::from_hms(hour, minute, 0)
            .map(Self)
            .map_err(|_| DomainError::InvalidShiftTime(format!("{hour:02}:{minute:02}")))
    }

    /// Returns the underlying time value.
    #[must_use]
    pub const fn time(&self) -> time::Time {
        self.0
    }

    /// Returns the `(hour, minute)` pair, ignoring seconds.
    #[must_use]
    pub const fn hour_minute(&self) -> (u8, u8) {
        (self.0.hour(), self.0.minute())
    }

    /// Returns the number of whole minutes since midnight.
    #[must_use]
    pub fn minutes_since_midnight(&self) -> u16 {
        u16::from(self.0.hour()) * 60 + u16::from(self.0.minute())
    }
}

impl FromStr for ShiftTime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        let mut parts = trimmed.split(':');
        let invalid = || DomainError::InvalidShiftTime(trimmed.to_string());

        let hour: u8 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let minute: u8 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let second: u8 = match parts.next() {
            Some(p) => p.parse().map_err(|_| invalid())?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }

        time::Time::from_hms(hour, minute, second)
            .map(Self)
            .map_err(|_| invalid())
    }
}

impl std::fmt::Display for ShiftTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl Serialize for ShiftTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!(
            "{:02}:{:02}:{:02}",
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        ))
    }
}

impl<'de> Deserialize<'de> for ShiftTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: String = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// An office in the organizational hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Office {
    /// Server-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Owning department, if linked.
    pub department_id: Option<i64>,
    /// Denormalized department name.
    pub department_name: Option<String>,
    /// Denormalized directorate name.
    pub directorate_name: Option<String>,
}

impl Office {
    /// Creates an office with only an id and name.
    #[must_use]
    pub const fn new(id: i64, name: String) -> Self {
        Self {
            id,
            name,
            department_id: None,
            department_name: None,
            directorate_name: None,
        }
    }
}

/// An employee who can be assigned to duties.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Employee {
    /// Server-assigned user identifier.
    pub id: i64,
    /// Full display name.
    pub full_name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Organization-issued employee number.
    pub employee_id: Option<String>,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Primary office.
    pub office_id: Option<i64>,
    /// Denormalized primary office name.
    pub office_name: Option<String>,
    /// Denormalized position title.
    pub position_name: Option<String>,
    /// Denormalized department name.
    pub department_name: Option<String>,
    /// Denormalized directorate name.
    pub directorate_name: Option<String>,
    /// Additional offices this employee may act for.
    pub secondary_offices: Vec<i64>,
}

/// A shift definition.
///
/// A schedule with no office is a template shared by every office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Server-assigned identifier.
    pub id: i64,
    /// Shift name, e.g. "Morning".
    pub name: Option<String>,
    /// Shift start time.
    pub start_time: ShiftTime,
    /// Shift end time. Earlier than `start_time` for overnight shifts.
    pub end_time: ShiftTime,
    /// Owning office; `None` for templates.
    pub office_id: Option<i64>,
    /// Denormalized office name.
    pub office_name: Option<String>,
    /// Backend status label.
    pub status: Option<String>,
}

impl Schedule {
    /// Name used when the schedule has none.
    pub const DEFAULT_NAME: &'static str = "Shift";

    /// Creates an office-scoped schedule.
    #[must_use]
    pub const fn new(
        id: i64,
        name: Option<String>,
        start_time: ShiftTime,
        end_time: ShiftTime,
        office_id: Option<i64>,
    ) -> Self {
        Self {
            id,
            name,
            start_time,
            end_time,
            office_id,
            office_name: None,
            status: None,
        }
    }

    /// Returns the shift name, falling back to "Shift".
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(Self::DEFAULT_NAME)
    }

    /// Returns whether this is a template schedule.
    #[must_use]
    pub const fn is_template(&self) -> bool {
        self.office_id.is_none()
    }

    /// Returns whether the shift ends on the following day.
    #[must_use]
    pub fn crosses_midnight(&self) -> bool {
        self.end_time.hour_minute() < self.start_time.hour_minute()
    }
}

/// A rotation definition tied to one office and a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyChart {
    /// Server-assigned identifier.
    pub id: i64,
    /// Optional display name.
    pub name: Option<String>,
    /// Owning office.
    pub office_id: i64,
    /// First day the chart is in effect.
    #[serde(with = "iso_date")]
    pub effective_date: Date,
    /// Last day the chart is in effect, if bounded.
    #[serde(with = "iso_date::option")]
    pub end_date: Option<Date>,
    /// Schedules attached to the chart.
    pub schedule_ids: Vec<i64>,
}

impl DutyChart {
    /// Returns whether `date` falls inside the chart period (inclusive).
    #[must_use]
    pub fn covers(&self, date: Date) -> bool {
        date >= self.effective_date && self.end_date.is_none_or(|end| date <= end)
    }
}

/// A chart that has not been submitted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyChartDraft {
    /// Owning office.
    pub office_id: i64,
    /// Optional display name.
    pub name: Option<String>,
    /// First day the chart is in effect.
    #[serde(with = "iso_date")]
    pub effective_date: Date,
    /// Last day the chart is in effect, if bounded.
    #[serde(with = "iso_date::option")]
    pub end_date: Option<Date>,
    /// Schedules to attach.
    pub schedule_ids: Vec<i64>,
}

/// Display fields the backend denormalizes onto a duty record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DutyDetails {
    /// Assigned employee's name.
    pub user_name: Option<String>,
    /// Duty office name.
    pub office_name: Option<String>,
    /// Shift name.
    pub schedule_name: Option<String>,
    /// Shift start.
    pub start_time: Option<ShiftTime>,
    /// Shift end.
    pub end_time: Option<ShiftTime>,
    /// Employee position.
    pub position_name: Option<String>,
    /// Employee phone.
    pub phone_number: Option<String>,
    /// Employee email.
    pub email: Option<String>,
    /// Employee's own office name.
    pub user_office_name: Option<String>,
    /// Employee department name.
    pub user_department_name: Option<String>,
    /// Employee directorate name.
    pub user_directorate_name: Option<String>,
}

/// A dated shift assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duty {
    /// Server-assigned identifier.
    pub id: i64,
    /// The day of the duty.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Assigned employee.
    pub user_id: i64,
    /// Office the duty is performed for.
    pub office_id: i64,
    /// Shift definition.
    pub schedule_id: i64,
    /// Chart this duty belongs to.
    pub duty_chart_id: Option<i64>,
    /// Whether the duty has been completed.
    pub is_completed: bool,
    /// Whether the employee is currently available.
    pub currently_available: bool,
    /// Denormalized display fields.
    pub details: DutyDetails,
}

/// A duty that has not been submitted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyDraft {
    /// The day of the duty.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Employee to assign.
    pub user_id: i64,
    /// Office the duty is performed for.
    pub office_id: i64,
    /// Shift definition.
    pub schedule_id: i64,
    /// Owning chart.
    pub duty_chart_id: i64,
    /// Always `false` for new drafts.
    pub is_completed: bool,
    /// Always `true` for new drafts.
    pub currently_available: bool,
}

impl DutyDraft {
    /// Creates a draft with the default completion flags.
    #[must_use]
    pub const fn new(
        date: Date,
        user_id: i64,
        office_id: i64,
        schedule_id: i64,
        duty_chart_id: i64,
    ) -> Self {
        Self {
            date,
            user_id,
            office_id,
            schedule_id,
            duty_chart_id,
            is_completed: false,
            currently_available: true,
        }
    }

    /// Returns a copy of this draft moved to another date.
    #[must_use]
    pub const fn on(&self, date: Date) -> Self {
        Self {
            date,
            user_id: self.user_id,
            office_id: self.office_id,
            schedule_id: self.schedule_id,
            duty_chart_id: self.duty_chart_id,
            is_completed: self.is_completed,
            currently_available: self.currently_available,
        }
    }
}
