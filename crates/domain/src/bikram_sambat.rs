// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bikram Sambat (Nepali calendar) conversion.
//!
//! Bikram Sambat month lengths are not computable from a formula; they are
//! published per year. This module embeds the table for BS 2000 through
//! BS 2090 (AD 1943-04-14 through AD 2034-04-13).
//!
//! ## Invariants
//!
//! - BS 2000-01-01 is AD 1943-04-14
//! - Months and days are 1-based
//! - Dates outside the table are rejected, never extrapolated

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::Date;

/// First year covered by the conversion table.
pub const BS_MIN_YEAR: i32 = 2000;

/// Last year covered by the conversion table.
pub const BS_MAX_YEAR: i32 = 2090;

/// Gregorian date of BS 2000-01-01.
const BS_EPOCH: Date = time::macros::date!(1943 - 04 - 14);

/// Month names, Baisakh first.
pub const BS_MONTH_NAMES: [&str; 12] = [
    "Baisakh", "Jestha", "Ashad", "Shrawan", "Bhadra", "Ashwin", "Kartik", "Mangsir", "Poush",
    "Magh", "Falgun", "Chaitra",
];

/// Short Nepali weekday labels, Sunday first.
pub const NEPALI_WEEKDAY_LABELS: [&str; 7] = ["आइत", "सोम", "मंगल", "बुध", "बिही", "शुक्र", "शनि"];

/// Days per month for each year from `BS_MIN_YEAR` to `BS_MAX_YEAR`.
#[rustfmt::skip]
const MONTH_DAYS: [[u8; 12]; 91] = [
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2000
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2001
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2002
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2003
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2004
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2005
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2006
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2007
    [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 29, 31], // 2008
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2009
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2010
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2011
    [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 30, 30], // 2012
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2013
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2014
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2015
    [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 30, 30], // 2016
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2017
    [31, 32, 31, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2018
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2019
    [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30], // 2020
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2021
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30], // 2022
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2023
    [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30], // 2024
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2025
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2026
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2027
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2028
    [31, 31, 32, 31, 32, 30, 30, 29, 30, 29, 30, 30], // 2029
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2030
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2031
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2032
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2033
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2034
    [30, 32, 31, 32, 31, 31, 29, 30, 30, 29, 29, 31], // 2035
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2036
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2037
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2038
    [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 30, 30], // 2039
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2040
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2041
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2042
    [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 30, 30], // 2043
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2044
    [31, 32, 31, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2045
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2046
    [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30], // 2047
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2048
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30], // 2049
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2050
    [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30], // 2051
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2052
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30], // 2053
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2054
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2055
    [31, 31, 32, 31, 32, 30, 30, 29, 30, 29, 30, 30], // 2056
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2057
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2058
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2059
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2060
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2061
    [30, 32, 31, 32, 31, 31, 29, 30, 29, 30, 29, 31], // 2062
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2063
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2064
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2065
    [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 29, 31], // 2066
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2067
    [31, 31, 32, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2068
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2069
    [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 30, 30], // 2070
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2071
    [31, 32, 31, 32, 31, 30, 30, 29, 30, 29, 30, 30], // 2072
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31], // 2073
    [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30], // 2074
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2075
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30], // 2076
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31], // 2077
    [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30], // 2078
    [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30], // 2079
    [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30], // 2080
    [31, 31, 32, 32, 31, 30, 30, 30, 29, 30, 30, 30], // 2081
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 30, 30], // 2082
    [31, 31, 32, 31, 31, 30, 30, 30, 29, 30, 30, 30], // 2083
    [31, 31, 32, 31, 31, 30, 30, 30, 29, 30, 30, 30], // 2084
    [31, 32, 31, 32, 30, 31, 30, 30, 29, 30, 30, 30], // 2085
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 30, 30], // 2086
    [31, 31, 32, 31, 31, 31, 30, 30, 29, 30, 30, 30], // 2087
    [30, 31, 32, 32, 30, 31, 30, 30, 29, 30, 30, 30], // 2088
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 30, 30], // 2089
    [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 30, 30], // 2090
];

fn year_row(year: i32) -> Result<&'static [u8; 12], DomainError> {
    usize::try_from(year - BS_MIN_YEAR)
        .ok()
        .and_then(|idx| MONTH_DAYS.get(idx))
        .ok_or(DomainError::BsYearOutOfRange { year })
}

/// Returns the number of days in a Bikram Sambat month.
///
/// # Errors
///
/// Returns an error if the year is outside the table or the month is not 1-12.
pub fn days_in_bs_month(year: i32, month: u8) -> Result<u8, DomainError> {
    let row: &[u8; 12] = year_row(year)?;
    month
        .checked_sub(1)
        .and_then(|idx| row.get(usize::from(idx)))
        .copied()
        .ok_or(DomainError::InvalidBsDate {
            year,
            month,
            day: 1,
        })
}

/// Returns the number of days in a Bikram Sambat year.
///
/// # Errors
///
/// Returns an error if the year is outside the table.
pub fn days_in_bs_year(year: i32) -> Result<u16, DomainError> {
    Ok(year_row(year)?.iter().map(|d| u16::from(*d)).sum())
}

/// A date in the Bikram Sambat calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BsDate {
    year: i32,
    month: u8,
    day: u8,
}

impl BsDate {
    /// Creates a validated Bikram Sambat date.
    ///
    /// # Arguments
    ///
    /// * `year` - BS year (2000-2090)
    /// * `month` - Month, 1 = Baisakh
    /// * `day` - Day of month
    ///
    /// # Errors
    ///
    /// Returns an error if the year is unsupported or the month/day does not exist.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, DomainError> {
        let month_len: u8 =
            days_in_bs_month(year, month).map_err(|err| match err {
                DomainError::InvalidBsDate { .. } => DomainError::InvalidBsDate { year, month, day },
                other => other,
            })?;
        if day == 0 || day > month_len {
            return Err(DomainError::InvalidBsDate { year, month, day });
        }
        Ok(Self { year, month, day })
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

    /// Returns the 1-based day.
    #[must_use]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Returns the month name, e.g. "Baisakh".
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    /// Converts a Gregorian date to Bikram Sambat.
    ///
    /// # Errors
    ///
    /// Returns an error if the date is outside the conversion table.
    pub fn from_gregorian(date: Date) -> Result<Self, DomainError> {
        let out_of_range = || DomainError::GregorianDateOutOfRange { date };

        let mut remaining: i64 =
            i64::from(date.to_julian_day()) - i64::from(BS_EPOCH.to_julian_day());
        if remaining < 0 {
            return Err(out_of_range());
        }

        for (year, row) in (BS_MIN_YEAR..=BS_MAX_YEAR).zip(MONTH_DAYS.iter()) {
            let year_len: i64 = row.iter().map(|d| i64::from(*d)).sum();
            if remaining >= year_len {
                remaining -= year_len;
                continue;
            }

            for (month_idx, month_len) in (1u8..).zip(row.iter()) {
                let month_len: i64 = i64::from(*month_len);
                if remaining < month_len {
                    let day: u8 = u8::try_from(remaining + 1).map_err(|_| out_of_range())?;
                    return Ok(Self {
                        year,
                        month: month_idx,
                        day,
                    });
                }
                remaining -= month_len;
            }
        }

        Err(out_of_range())
    }

    /// Converts this date to the Gregorian calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if date arithmetic overflows.
    pub fn to_gregorian(&self) -> Result<Date, DomainError> {
        let mut offset: i64 = 0;
        for year in BS_MIN_YEAR..self.year {
            offset += i64::from(days_in_bs_year(year)?);
        }
        let row: &[u8; 12] = year_row(self.year)?;
        offset += row
            .iter()
            .take(usize::from(self.month.saturating_sub(1)))
            .map(|d| i64::from(*d))
            .sum::<i64>();
        offset += i64::from(self.day) - 1;

        BS_EPOCH
            .checked_add(time::Duration::days(offset))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("converting BS {self} to Gregorian"),
            })
    }
}

impl std::fmt::Display for BsDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Returns the name of a 1-based BS month, or an empty string if out of range.
#[must_use]
pub fn month_name(month: u8) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| BS_MONTH_NAMES.get(usize::from(idx)))
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_epoch_maps_to_first_day() {
        let bs: BsDate = BsDate::from_gregorian(date!(1943 - 04 - 14)).unwrap();
        assert_eq!(bs, BsDate::new(2000, 1, 1).unwrap());
    }

    #[test]
    fn test_known_new_year_dates() {
        let cases: [(i32, Date); 6] = [
            (2070, date!(2013 - 04 - 14)),
            (2073, date!(2016 - 04 - 13)),
            (2077, date!(2020 - 04 - 13)),
            (2080, date!(2023 - 04 - 14)),
            (2081, date!(2024 - 04 - 13)),
            (2082, date!(2025 - 04 - 14)),
        ];
        for (year, gregorian) in cases {
            let bs: BsDate = BsDate::new(year, 1, 1).unwrap();
            assert_eq!(bs.to_gregorian().unwrap(), gregorian, "BS {year}");
            assert_eq!(BsDate::from_gregorian(gregorian).unwrap(), bs);
        }
    }

    #[test]
    fn test_mid_year_conversion() {
        // 2081 Kartik 1
        let bs: BsDate = BsDate::from_gregorian(date!(2024 - 10 - 17)).unwrap();
        assert_eq!(bs.year(), 2081);
        assert_eq!(bs.month(), 7);
        assert_eq!(bs.day(), 1);
        assert_eq!(bs.month_name(), "Kartik");
    }

    #[test]
    fn test_last_day_of_year_rolls_into_next() {
        let last: BsDate = BsDate::new(2080, 12, 30).unwrap();
        let next_day: Date = last.to_gregorian().unwrap().next_day().unwrap();
        assert_eq!(BsDate::from_gregorian(next_day).unwrap(), BsDate::new(2081, 1, 1).unwrap());
    }

    #[test]
    fn test_rejects_dates_before_epoch() {
        let result = BsDate::from_gregorian(date!(1943 - 04 - 13));
        assert!(matches!(result, Err(DomainError::GregorianDateOutOfRange { .. })));
    }

    #[test]
    fn test_rejects_invalid_components() {
        assert!(matches!(
            BsDate::new(2081, 13, 1),
            Err(DomainError::InvalidBsDate { month: 13, .. })
        ));
        assert!(matches!(
            BsDate::new(2081, 1, 32),
            Err(DomainError::InvalidBsDate { day: 32, .. })
        ));
        assert!(matches!(
            BsDate::new(1999, 1, 1),
            Err(DomainError::BsYearOutOfRange { year: 1999 })
        ));
    }

    #[test]
    fn test_days_in_month_and_year() {
        assert_eq!(days_in_bs_month(2081, 1).unwrap(), 31);
        assert_eq!(days_in_bs_month(2082, 1).unwrap(), 30);
        assert_eq!(days_in_bs_year(2080).unwrap(), 365);
        assert_eq!(days_in_bs_year(2081).unwrap(), 366);
    }
}
