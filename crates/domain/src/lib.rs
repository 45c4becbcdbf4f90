// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod assignments;
mod bikram_sambat;
mod calendar_grid;
mod duty_range;
mod error;
mod shift_window;
mod shifts;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use assignments::{
    Assignment, GroupedAssignments, UNKNOWN_EMPLOYEE, enrich_duties, enrich_duty, group_assignments,
};
pub use bikram_sambat::{
    BS_MAX_YEAR, BS_MIN_YEAR, BS_MONTH_NAMES, BsDate, NEPALI_WEEKDAY_LABELS, days_in_bs_month,
    days_in_bs_year, month_name,
};
pub use calendar_grid::{
    BsMonth, CalendarMonth, DEFAULT_WEEK_START, GridDay, MonthGrid, bs_year_options, end_of_week,
    month_grid, parse_week_start, shift_weeks, start_of_week, week_days, weekday_labels,
};
pub use duty_range::expand_duty_range;
pub use error::DomainError;
pub use shift_window::{
    DEFAULT_TIMEZONE, is_shift_active, is_shift_active_in_zone, local_today, local_wall_clock,
    parse_timezone, time_strings_overlap, times_overlap,
};
pub use shifts::{
    Shift, ShiftKey, derive_shifts, new_schedule_ids, select_chart_schedules, shift_schedule_index,
};

// Re-export public types
pub use types::{
    Duty, DutyChart, DutyChartDraft, DutyDetails, DutyDraft, Employee, Office, Schedule,
    ShiftTime, format_iso_date, iso_date, parse_iso_date,
};
pub use validation::{
    find_overlapping_duty, validate_chart_dates, validate_chart_name, validate_duty_in_chart,
    validate_no_overlap, validate_not_backdated, validate_schedule_times,
    validate_single_duty_per_day,
};
