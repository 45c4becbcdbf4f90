// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly roster CSV export.

use duty_roster::WeekView;
use duty_roster_domain::{Assignment, format_iso_date};
use std::collections::BTreeMap;
use thiserror::Error;
use time::Date;

use crate::error::ApiError;

/// Column headers of the weekly roster CSV.
pub const WEEKLY_ROSTER_HEADERS: [&str; 5] = ["Office", "Name", "Phone", "Effective Date", "End Date"];

/// Weekly roster CSV errors.
#[derive(Debug, Error)]
pub enum RosterCsvError {
    /// A record could not be written.
    #[error("Failed to write roster CSV: {0}")]
    Write(#[from] csv::Error),

    /// The writer could not be flushed into its buffer.
    #[error("Failed to finish roster CSV: {0}")]
    Finish(String),

    /// The output was not UTF-8.
    #[error("Roster CSV is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl From<RosterCsvError> for ApiError {
    fn from(err: RosterCsvError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// One person on duty during the week.
#[derive(Debug)]
struct RosterLine {
    phone: String,
    first: Date,
    last: Date,
}

/// Returns the download filename for the week starting at `week_start`.
#[must_use]
pub fn weekly_roster_filename(week_start: Date) -> String {
    format!("weekly-roster-{}.csv", format_iso_date(week_start))
}

fn office_label(assignment: &Assignment) -> String {
    assignment
        .office
        .clone()
        .unwrap_or_else(|| format!("Office {}", assignment.office_id))
}

/// Builds the weekly roster CSV.
///
/// One line per office and employee, with the first and last day that
/// employee is on duty in the week. Lines are ordered by office, then name.
///
/// # Errors
///
/// Returns an error if the CSV cannot be written.
pub fn weekly_roster_csv(view: &WeekView) -> Result<String, RosterCsvError> {
    let mut lines: BTreeMap<(String, String, i64), RosterLine> = BTreeMap::new();

    for assignment in view.grouped.values().flat_map(|cells| cells.values()).flatten() {
        let key: (String, String, i64) = (
            office_label(assignment),
            assignment.employee_name.clone(),
            assignment.user_id,
        );
        lines
            .entry(key)
            .and_modify(|line| {
                line.first = line.first.min(assignment.date);
                line.last = line.last.max(assignment.date);
            })
            .or_insert_with(|| RosterLine {
                phone: assignment.phone_number.clone().unwrap_or_default(),
                first: assignment.date,
                last: assignment.date,
            });
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(WEEKLY_ROSTER_HEADERS)?;
    for ((office, name, _), line) in &lines {
        writer.write_record([
            office.as_str(),
            name.as_str(),
            line.phone.as_str(),
            format_iso_date(line.first).as_str(),
            format_iso_date(line.last).as_str(),
        ])?;
    }

    let bytes: Vec<u8> = writer
        .into_inner()
        .map_err(|e| RosterCsvError::Finish(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
