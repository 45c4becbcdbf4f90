// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Week and month grid construction.
//!
//! Grids are always expressed in Gregorian dates. A month view for a
//! Bikram Sambat month spans from the week start on or before the first
//! day of the BS month through the week end on or after its last day.
//!
//! ## Invariants
//!
//! - A week has exactly seven consecutive dates
//! - A month grid starts on a week start and ends on a week end
//! - Padding days from adjacent months are flagged `in_month = false`

use crate::bikram_sambat::{
    BS_MAX_YEAR, BS_MIN_YEAR, BsDate, NEPALI_WEEKDAY_LABELS, days_in_bs_month, month_name,
};
use crate::error::DomainError;
use time::{Date, Duration, Month, Weekday};

/// Default first day of the week.
pub const DEFAULT_WEEK_START: Weekday = Weekday::Sunday;

fn overflow(operation: &str) -> DomainError {
    DomainError::DateArithmeticOverflow {
        operation: operation.to_string(),
    }
}

fn add_days(date: Date, days: i64, operation: &str) -> Result<Date, DomainError> {
    date.checked_add(Duration::days(days))
        .ok_or_else(|| overflow(operation))
}

/// Parses a weekday name into a week start.
///
/// Full names and three-letter abbreviations are accepted in any case
/// (`"sunday"`, `"Mon"`).
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the name is not a weekday.
pub fn parse_week_start(value: &str) -> Result<Weekday, DomainError> {
    let normalized: String = value.trim().to_lowercase();
    let weekday: Weekday = match normalized.as_str() {
        "sun" | "sunday" => Weekday::Sunday,
        "mon" | "monday" => Weekday::Monday,
        "tue" | "tuesday" => Weekday::Tuesday,
        "wed" | "wednesday" => Weekday::Wednesday,
        "thu" | "thursday" => Weekday::Thursday,
        "fri" | "friday" => Weekday::Friday,
        "sat" | "saturday" => Weekday::Saturday,
        _ => {
            return Err(DomainError::DateParseError {
                date_string: value.to_string(),
                error: String::from("expected a weekday name"),
            });
        }
    };
    Ok(weekday)
}

/// Returns the first day of the week containing `date`.
///
/// # Errors
///
/// Returns an error if the result is before the earliest representable date.
pub fn start_of_week(date: Date, week_start: Weekday) -> Result<Date, DomainError> {
    let back: u8 =
        (date.weekday().number_days_from_sunday() + 7 - week_start.number_days_from_sunday()) % 7;
    add_days(date, -i64::from(back), "finding start of week")
}

/// Short English weekday labels, Sunday first.
const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Column headers for a month grid of `month`, starting at `week_start`.
///
/// Bikram Sambat months are headed in Nepali.
#[must_use]
pub fn weekday_labels(month: &CalendarMonth, week_start: Weekday) -> Vec<&'static str> {
    let labels: &[&'static str; 7] = match month {
        CalendarMonth::Gregorian { .. } => &WEEKDAY_LABELS,
        CalendarMonth::BikramSambat(_) => &NEPALI_WEEKDAY_LABELS,
    };
    let first: usize = usize::from(week_start.number_days_from_sunday());
    (0..7).map(|offset| labels[(first + offset) % 7]).collect()
}

/// Returns the last day of the week containing `date`.
///
/// # Errors
///
/// Returns an error if date arithmetic overflows.
pub fn end_of_week(date: Date, week_start: Weekday) -> Result<Date, DomainError> {
    add_days(start_of_week(date, week_start)?, 6, "finding end of week")
}

/// Lists the seven dates of the week containing `anchor`.
///
/// # Errors
///
/// Returns an error if date arithmetic overflows.
pub fn week_days(anchor: Date, week_start: Weekday) -> Result<Vec<Date>, DomainError> {
    let start: Date = start_of_week(anchor, week_start)?;
    (0..7)
        .map(|offset| add_days(start, offset, "listing week days"))
        .collect()
}

/// Moves an anchor date by whole weeks (negative moves backwards).
///
/// # Errors
///
/// Returns an error if date arithmetic overflows.
pub fn shift_weeks(anchor: Date, weeks: i64) -> Result<Date, DomainError> {
    let days: i64 = weeks
        .checked_mul(7)
        .ok_or_else(|| overflow("shifting weeks"))?;
    add_days(anchor, days, "shifting weeks")
}

/// A Bikram Sambat month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BsMonth {
    year: i32,
    month: u8,
}

impl BsMonth {
    /// Creates a validated BS month.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is outside the conversion table or the month is not 1-12.
    pub fn new(year: i32, month: u8) -> Result<Self, DomainError> {
        days_in_bs_month(year, month)?;
        Ok(Self { year, month })
    }

    /// Returns the BS month containing a Gregorian date.
    ///
    /// # Errors
    ///
    /// Returns an error if the date is outside the conversion table.
    pub fn containing(date: Date) -> Result<Self, DomainError> {
        let bs: BsDate = BsDate::from_gregorian(date)?;
        Ok(Self {
            year: bs.year(),
            month: bs.month(),
        })
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the 1-based month.
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the month name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        month_name(self.month)
    }

    /// Returns the following month, wrapping into the next year after Chaitra.
    ///
    /// # Errors
    ///
    /// Returns an error past the end of the conversion table.
    pub fn next(&self) -> Result<Self, DomainError> {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Returns the preceding month, wrapping into the previous year before Baisakh.
    ///
    /// # Errors
    ///
    /// Returns an error before the start of the conversion table.
    pub fn previous(&self) -> Result<Self, DomainError> {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// Gregorian date of the first day of this month.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion fails.
    pub fn first_day(&self) -> Result<Date, DomainError> {
        BsDate::new(self.year, self.month, 1)?.to_gregorian()
    }

    /// Gregorian date of the last day of this month.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion fails.
    pub fn last_day(&self) -> Result<Date, DomainError> {
        let len: u8 = days_in_bs_month(self.year, self.month)?;
        BsDate::new(self.year, self.month, len)?.to_gregorian()
    }
}

/// A month in either supported calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarMonth {
    /// A Gregorian month.
    Gregorian {
        /// Year.
        year: i32,
        /// Month.
        month: Month,
    },
    /// A Bikram Sambat month.
    BikramSambat(BsMonth),
}

impl CalendarMonth {
    /// First day of the month.
    ///
    /// # Errors
    ///
    /// Returns an error if the month cannot be represented.
    pub fn first_day(&self) -> Result<Date, DomainError> {
        match self {
            Self::Gregorian { year, month } => Date::from_calendar_date(*year, *month, 1)
                .map_err(|e| DomainError::DateParseError {
                    date_string: format!("{year}-{month}"),
                    error: e.to_string(),
                }),
            Self::BikramSambat(bs) => bs.first_day(),
        }
    }

    /// Last day of the month.
    ///
    /// # Errors
    ///
    /// Returns an error if the month cannot be represented.
    pub fn last_day(&self) -> Result<Date, DomainError> {
        match self {
            Self::Gregorian { .. } => {
                let following: Date = self.next()?.first_day()?;
                following
                    .previous_day()
                    .ok_or_else(|| overflow("finding end of month"))
            }
            Self::BikramSambat(bs) => bs.last_day(),
        }
    }

    /// The following month.
    ///
    /// # Errors
    ///
    /// Returns an error past the representable range.
    pub fn next(&self) -> Result<Self, DomainError> {
        match self {
            Self::Gregorian { year, month } => {
                let year: i32 = if *month == Month::December {
                    year + 1
                } else {
                    *year
                };
                Ok(Self::Gregorian {
                    year,
                    month: month.next(),
                })
            }
            Self::BikramSambat(bs) => Ok(Self::BikramSambat(bs.next()?)),
        }
    }

    /// The preceding month.
    ///
    /// # Errors
    ///
    /// Returns an error before the representable range.
    pub fn previous(&self) -> Result<Self, DomainError> {
        match self {
            Self::Gregorian { year, month } => {
                let year: i32 = if *month == Month::January {
                    year - 1
                } else {
                    *year
                };
                Ok(Self::Gregorian {
                    year,
                    month: month.previous(),
                })
            }
            Self::BikramSambat(bs) => Ok(Self::BikramSambat(bs.previous()?)),
        }
    }

    /// The month's year in its own calendar.
    #[must_use]
    pub const fn year(&self) -> i32 {
        match self {
            Self::Gregorian { year, .. } => *year,
            Self::BikramSambat(bs) => bs.year(),
        }
    }

    /// Human-readable label, e.g. "Kartik 2081" or "October 2024".
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Gregorian { year, month } => format!("{month} {year}"),
            Self::BikramSambat(bs) => format!("{} {}", bs.name(), bs.year()),
        }
    }
}

/// One cell of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDay {
    /// Gregorian date.
    pub date: Date,
    /// Bikram Sambat date, when within the conversion table.
    pub bs_date: Option<BsDate>,
    /// Whether the date belongs to the displayed month.
    pub in_month: bool,
}

/// A month padded to whole weeks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// The displayed month.
    pub month: CalendarMonth,
    /// First day of each row.
    pub week_start: Weekday,
    /// First day of the displayed month.
    pub month_start: Date,
    /// Last day of the displayed month.
    pub month_end: Date,
    /// All cells, row-major, a multiple of seven long.
    pub days: Vec<GridDay>,
}

impl MonthGrid {
    /// Iterates the grid one week at a time.
    pub fn weeks(&self) -> std::slice::Chunks<'_, GridDay> {
        self.days.chunks(7)
    }

    /// Returns just the dates of the grid.
    #[must_use]
    pub fn dates(&self) -> Vec<Date> {
        self.days.iter().map(|d| d.date).collect()
    }
}

/// Builds the month grid for a Gregorian or Bikram Sambat month.
///
/// # Arguments
///
/// * `month` - The month to display
/// * `week_start` - First day of each grid row
///
/// # Errors
///
/// Returns an error if the month falls outside the supported range.
pub fn month_grid(month: CalendarMonth, week_start: Weekday) -> Result<MonthGrid, DomainError> {
    let month_start: Date = month.first_day()?;
    let month_end: Date = month.last_day()?;
    let grid_start: Date = start_of_week(month_start, week_start)?;
    let grid_end: Date = end_of_week(month_end, week_start)?;

    let mut days: Vec<GridDay> = Vec::with_capacity(42);
    let mut current: Date = grid_start;
    while current <= grid_end {
        days.push(GridDay {
            date: current,
            bs_date: BsDate::from_gregorian(current).ok(),
            in_month: current >= month_start && current <= month_end,
        });
        current = add_days(current, 1, "building month grid")?;
    }

    Ok(MonthGrid {
        month,
        week_start,
        month_start,
        month_end,
        days,
    })
}

/// Lists selectable BS years around `center`, clamped to the conversion table.
#[must_use]
pub fn bs_year_options(center: i32, span: i32) -> Vec<i32> {
    let low: i32 = (center - span).max(BS_MIN_YEAR);
    let high: i32 = (center + span).min(BS_MAX_YEAR);
    (low..=high).collect()
}
