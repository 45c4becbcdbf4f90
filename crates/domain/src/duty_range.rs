// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::DutyDraft;
use time::Date;

/// Expands a draft over an inclusive date range, one draft per day.
///
/// # Arguments
///
/// * `template` - The draft to copy; its date is ignored
/// * `start` - First day (inclusive)
/// * `end` - Last day (inclusive)
///
/// # Errors
///
/// Returns `DomainError::InvalidDateRange` if `end` is before `start`.
pub fn expand_duty_range(template: &DutyDraft, start: Date, end: Date) -> Result<Vec<DutyDraft>, DomainError> {
    if end < start {
        return Err(DomainError::InvalidDateRange { start, end });
    }

    let mut drafts: Vec<DutyDraft> = Vec::new();
    let mut current: Date = start;
    loop {
        drafts.push(template.on(current));
        if current == end {
            break;
        }
        current = current
            .next_day()
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: String::from("expanding duty range"),
            })?;
    }

    Ok(drafts)
}
