// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift interval checks.
//!
//! Two checks with deliberately different midnight handling:
//!
//! - [`times_overlap`] compares minutes since midnight and treats each shift as
//!   a same-day half-open interval. An overnight shift (end before start) is
//!   NOT rolled into the next day.
//! - [`is_shift_active`] rolls the end of an overnight shift into the next
//!   calendar day and treats the interval as closed at both ends.

use crate::error::DomainError;
use crate::types::ShiftTime;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use time::{Date, Duration, PrimitiveDateTime};

/// Timezone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Asia/Kathmandu";

/// Returns whether two same-day shift intervals overlap.
///
/// Overlap holds iff `start1 < end2 && end1 > start2`, compared in whole minutes.
/// Intervals that only touch at an endpoint do not overlap, and a zero-length
/// interval overlaps nothing. Shifts crossing midnight are not rolled over.
#[must_use]
pub fn times_overlap(start1: ShiftTime, end1: ShiftTime, start2: ShiftTime, end2: ShiftTime) -> bool {
    let (s1, e1, s2, e2) = (
        start1.minutes_since_midnight(),
        end1.minutes_since_midnight(),
        start2.minutes_since_midnight(),
        end2.minutes_since_midnight(),
    );
    if s1 == e1 || s2 == e2 {
        return false;
    }
    s1 < e2 && e1 > s2
}

/// String form of [`times_overlap`] for `HH:MM` input.
///
/// # Errors
///
/// Returns an error if any input is not a valid shift time.
pub fn time_strings_overlap(
    start1: &str,
    end1: &str,
    start2: &str,
    end2: &str,
) -> Result<bool, DomainError> {
    Ok(times_overlap(
        start1.parse()?,
        end1.parse()?,
        start2.parse()?,
        end2.parse()?,
    ))
}

/// Returns whether a shift on `date` is in progress at `now`.
///
/// When the end `(hour, minute)` is earlier than the start, the shift ends on
/// the following day. Both endpoints are inclusive.
///
/// # Arguments
///
/// * `date` - The duty date (the day the shift starts)
/// * `start` - Shift start time
/// * `end` - Shift end time
/// * `now` - Current local wall-clock time
#[must_use]
pub fn is_shift_active(date: Date, start: ShiftTime, end: ShiftTime, now: PrimitiveDateTime) -> bool {
    let shift_start: PrimitiveDateTime = PrimitiveDateTime::new(date, start.time());
    let mut shift_end: PrimitiveDateTime = PrimitiveDateTime::new(date, end.time());
    if end.hour_minute() < start.hour_minute() {
        match shift_end.checked_add(Duration::days(1)) {
            Some(rolled) => shift_end = rolled,
            None => return false,
        }
    }
    now >= shift_start && now <= shift_end
}

/// Parses an IANA timezone name.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` if the name is unknown.
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

/// Converts a UTC instant to the wall-clock time of `tz`.
///
/// # Errors
///
/// Returns an error if the local date cannot be represented.
pub fn local_wall_clock(now_utc: chrono::DateTime<Utc>, tz: Tz) -> Result<PrimitiveDateTime, DomainError> {
    let local: NaiveDateTime = tz.from_utc_datetime(&now_utc.naive_utc()).naive_local();
    to_primitive(local)
}

fn to_primitive(local: NaiveDateTime) -> Result<PrimitiveDateTime, DomainError> {
    use chrono::{Datelike, Timelike};

    let naive_date: NaiveDate = local.date();
    let naive_time: NaiveTime = local.time();

    let month: time::Month = u8::try_from(naive_date.month())
        .ok()
        .and_then(|m| time::Month::try_from(m).ok())
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: String::from("converting local month"),
        })?;
    let day: u8 = u8::try_from(naive_date.day()).map_err(|_| DomainError::DateArithmeticOverflow {
        operation: String::from("converting local day"),
    })?;
    let date: Date = Date::from_calendar_date(naive_date.year(), month, day).map_err(|e| {
        DomainError::DateParseError {
            date_string: naive_date.to_string(),
            error: e.to_string(),
        }
    })?;

    let as_u8 = |v: u32| u8::try_from(v).unwrap_or_default();
    let wall: time::Time = time::Time::from_hms(
        as_u8(naive_time.hour()),
        as_u8(naive_time.minute()),
        as_u8(naive_time.second()),
    )
    .map_err(|e| DomainError::DateParseError {
        date_string: naive_time.to_string(),
        error: e.to_string(),
    })?;

    Ok(PrimitiveDateTime::new(date, wall))
}

/// Returns whether a shift is in progress at a UTC instant, judged in `tz`.
///
/// # Errors
///
/// Returns an error if the instant cannot be converted to local time.
pub fn is_shift_active_in_zone(
    date: Date,
    start: ShiftTime,
    end: ShiftTime,
    now_utc: chrono::DateTime<Utc>,
    tz: Tz,
) -> Result<bool, DomainError> {
    let now: PrimitiveDateTime = local_wall_clock(now_utc, tz)?;
    Ok(is_shift_active(date, start, end, now))
}

/// Returns today's date in `tz`.
///
/// # Errors
///
/// Returns an error if the instant cannot be converted to local time.
pub fn local_today(now_utc: chrono::DateTime<Utc>, tz: Tz) -> Result<Date, DomainError> {
    Ok(local_wall_clock(now_utc, tz)?.date())
}
