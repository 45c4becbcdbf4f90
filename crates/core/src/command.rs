// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use duty_roster_domain::{DutyChartDraft, DutyDraft};
use time::Date;

/// A roster change requested by a user, as data only.
///
/// Employee and shift are optional so that an incomplete form is rejected
/// with the same message the roster UI shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Assign one employee to one shift on one day of the loaded chart.
    AssignDuty {
        /// The selected employee.
        user_id: Option<i64>,
        /// The selected schedule.
        schedule_id: Option<i64>,
        /// The duty day.
        date: Date,
    },
    /// Assign one employee to one shift on every day of an inclusive range.
    AssignDutyRange {
        /// The selected employee.
        user_id: Option<i64>,
        /// The selected schedule.
        schedule_id: Option<i64>,
        /// First day.
        start_date: Date,
        /// Last day.
        end_date: Date,
    },
    /// Remove a duty from the loaded chart.
    RemoveDuty {
        /// The duty to remove.
        duty_id: i64,
    },
    /// Create a new chart for an office.
    CreateDutyChart {
        /// Owning office.
        office_id: i64,
        /// Optional name.
        name: Option<String>,
        /// First effective day.
        effective_date: Date,
        /// Last effective day.
        end_date: Option<Date>,
        /// Schedules to attach.
        schedule_ids: Vec<i64>,
    },
    /// Rename the loaded chart, attach further schedules to it, or both.
    UpdateDutyChart {
        /// The new name.
        name: Option<String>,
        /// Every schedule id selected in the editor, old and new.
        selected: Option<Vec<i64>>,
    },
    /// Delete the loaded chart.
    DeleteDutyChart,
    /// Upsert duties read from an import file into the loaded chart.
    ImportDuties {
        /// One draft per imported row.
        drafts: Vec<DutyDraft>,
    },
}

impl Command {
    /// Returns the command name used in audit records.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AssignDuty { .. } => "AssignDuty",
            Self::AssignDutyRange { .. } => "AssignDutyRange",
            Self::RemoveDuty { .. } => "RemoveDuty",
            Self::CreateDutyChart { .. } => "CreateDutyChart",
            Self::UpdateDutyChart { .. } => "UpdateDutyChart",
            Self::DeleteDutyChart => "DeleteDutyChart",
            Self::ImportDuties { .. } => "ImportDuties",
        }
    }
}

/// The backend write a validated command turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// `POST duties/`.
    CreateDuty(DutyDraft),
    /// `POST duties/bulk-upsert/`.
    BulkUpsertDuties(Vec<DutyDraft>),
    /// `DELETE duties/{id}/`.
    DeleteDuty {
        /// The duty to delete.
        duty_id: i64,
    },
    /// `POST duty-charts/`.
    CreateDutyChart(DutyChartDraft),
    /// One `PATCH duty-charts/{id}/` carrying the changed fields.
    UpdateDutyChart {
        /// The chart.
        chart_id: i64,
        /// The new name.
        name: Option<String>,
        /// Every schedule the chart should carry.
        schedule_ids: Option<Vec<i64>>,
    },
    /// `DELETE duty-charts/{id}/`.
    DeleteDutyChart {
        /// The chart.
        chart_id: i64,
    },
}
