// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only backend calls.
//!
//! - `roster`: duties, charts and schedules
//! - `directory`: the signed-in user, employees and offices
//! - `reports`: audit and SMS logs, dashboard offices, chart export

mod directory;
mod reports;
mod roster;

pub use reports::{AuditLogQuery, ExportFormat, ExportQuery, ExportScope, SmsLogQuery};
pub use roster::DutyFilter;

/// Appends `key=value` when `value` is present.
fn push_opt<T: ToString>(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<T>) {
    if let Some(value) = value {
        query.push((key, value.to_string()));
    }
}
