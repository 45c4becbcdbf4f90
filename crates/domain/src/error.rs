// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::format_iso_date;
use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A shift time string is not `HH:MM` or `HH:MM:SS`.
    InvalidShiftTime(String),
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// A Bikram Sambat year is outside the conversion table.
    BsYearOutOfRange {
        /// The requested year.
        year: i32,
    },
    /// A Gregorian date falls outside the conversion table.
    GregorianDateOutOfRange {
        /// The requested date.
        date: Date,
    },
    /// A Bikram Sambat month or day does not exist.
    InvalidBsDate {
        /// Year.
        year: i32,
        /// Month (1-based).
        month: u8,
        /// Day (1-based).
        day: u8,
    },
    /// A date range ends before it starts.
    InvalidDateRange {
        /// Range start.
        start: Date,
        /// Range end.
        end: Date,
    },
    /// A chart ends before it takes effect.
    InvalidChartDates {
        /// Effective date.
        effective_date: Date,
        /// End date.
        end_date: Date,
    },
    /// A duty date precedes the chart's effective date.
    DutyBeforeChartStart {
        /// The duty date.
        date: Date,
        /// The chart's effective date.
        effective_date: Date,
    },
    /// A duty date is after the chart's end date.
    DutyAfterChartEnd {
        /// The duty date.
        date: Date,
        /// The chart's end date.
        end_date: Date,
    },
    /// A duty is dated before today.
    BackdatedDuty {
        /// The duty date.
        date: Date,
        /// The current local date.
        today: Date,
    },
    /// The employee already works an overlapping shift that day.
    ShiftOverlap {
        /// The employee.
        user_id: i64,
        /// The day.
        date: Date,
        /// The conflicting duty.
        existing_duty_id: i64,
    },
    /// The employee already has a duty that day.
    DuplicateDutyForDay {
        /// The employee.
        user_id: i64,
        /// The day.
        date: Date,
    },
    /// A shift starts and ends at the same time.
    InvalidScheduleTimes {
        /// Start time as entered.
        start: String,
        /// End time as entered.
        end: String,
    },
    /// No employee was selected.
    MissingEmployee,
    /// No shift was selected.
    MissingShift,
    /// A schedule id is unknown.
    ScheduleNotFound(i64),
    /// A duty id is unknown.
    DutyNotFound(i64),
    /// Every selected schedule is already on the chart.
    NoNewSchedules,
    /// A chart update names neither a new name nor schedules.
    EmptyChartUpdate,
    /// The operation needs a loaded duty chart.
    NoChartSelected,
    /// A chart name is empty.
    InvalidChartName(String),
    /// Timezone name is not a known IANA zone.
    InvalidTimezone(String),
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidShiftTime(value) => write!(f, "Invalid shift time: '{value}'"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::BsYearOutOfRange { year } => {
                write!(f, "Bikram Sambat year {year} is outside the supported range")
            }
            Self::GregorianDateOutOfRange { date } => write!(
                f,
                "Date {} cannot be converted to Bikram Sambat",
                format_iso_date(*date)
            ),
            Self::InvalidBsDate { year, month, day } => {
                write!(f, "Invalid Bikram Sambat date {year}-{month:02}-{day:02}")
            }
            Self::InvalidDateRange { .. } => write!(f, "End date cannot be before start date"),
            Self::InvalidChartDates { .. } => write!(f, "End date must be after effective date."),
            Self::DutyBeforeChartStart { .. } => write!(f, "Duty date is before chart start date."),
            Self::DutyAfterChartEnd { end_date, .. } => write!(
                f,
                "Duty date must be on or before {}.",
                format_iso_date(*end_date)
            ),
            Self::BackdatedDuty { date, .. } => write!(
                f,
                "Cannot assign a duty on a past date ({})",
                format_iso_date(*date)
            ),
            Self::ShiftOverlap { date, .. } => write!(
                f,
                "Employee already has an overlapping shift on {}",
                format_iso_date(*date)
            ),
            Self::DuplicateDutyForDay { .. } => {
                write!(f, "Same person cannot have duties of two shifts in the same day.")
            }
            Self::InvalidScheduleTimes { .. } => write!(f, "End time must be after start time."),
            Self::MissingEmployee => write!(f, "Please select an employee"),
            Self::MissingShift => write!(f, "Please select a shift"),
            Self::ScheduleNotFound(id) => write!(f, "Schedule {id} not found"),
            Self::DutyNotFound(id) => write!(f, "Duty {id} not found"),
            Self::NoNewSchedules => write!(f, "No new schedules have been selected."),
            Self::EmptyChartUpdate => write!(f, "Provide a new name or the schedules to add"),
            Self::NoChartSelected => write!(f, "Select a duty chart to edit."),
            Self::InvalidChartName(msg) => write!(f, "Invalid chart name: {msg}"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
        }
    }
}

impl std::error::Error for DomainError {}
