// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Mutation;
use duty_roster_audit::{AuditEvent, RosterScope, StateSnapshot};
use duty_roster_domain::{
    Assignment, CalendarMonth, DomainError, Duty, DutyChart, Employee, GroupedAssignments,
    MonthGrid, Office, Schedule, Shift, ShiftKey, ShiftTime, derive_shifts, enrich_duties,
    group_assignments, is_shift_active, month_grid, select_chart_schedules, shift_schedule_index,
    week_days,
};
use std::collections::{HashMap, HashSet};
use time::{Date, PrimitiveDateTime, Weekday};

/// The roster of one office, optionally narrowed to one duty chart.
///
/// Source lists (chart, schedules, duties, employee and office caches) can
/// only be changed through methods that rebuild the derived shift columns and
/// assignments, so views never see stale caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterState {
    office_id: i64,
    week_start: Weekday,
    chart: Option<DutyChart>,
    schedules: Vec<Schedule>,
    duties: Vec<Duty>,
    employees: HashMap<i64, Employee>,
    offices: HashMap<i64, Office>,
    shifts: Vec<Shift>,
    shift_index: HashMap<ShiftKey, i64>,
    assignments: Vec<Assignment>,
}

impl RosterState {
    /// Creates an empty roster for an office.
    ///
    /// # Arguments
    ///
    /// * `office_id` - The office whose roster is shown
    /// * `week_start` - First day of each week row
    #[must_use]
    pub fn new(office_id: i64, week_start: Weekday) -> Self {
        Self {
            office_id,
            week_start,
            chart: None,
            schedules: Vec::new(),
            duties: Vec::new(),
            employees: HashMap::new(),
            offices: HashMap::new(),
            shifts: Vec::new(),
            shift_index: HashMap::new(),
            assignments: Vec::new(),
        }
    }

    /// Loads a chart together with its schedules and duties.
    pub fn load_chart(&mut self, chart: DutyChart, schedules: Vec<Schedule>, duties: Vec<Duty>) {
        self.office_id = chart.office_id;
        self.chart = Some(chart);
        self.schedules = schedules;
        self.duties = duties;
        self.recompute();
    }

    /// Drops the loaded chart and everything scoped to it.
    pub fn clear_chart(&mut self) {
        self.chart = None;
        self.schedules.clear();
        self.duties.clear();
        self.recompute();
    }

    /// Replaces the duty list, e.g. after the backend confirmed a write.
    pub fn replace_duties(&mut self, duties: Vec<Duty>) {
        self.duties = duties;
        self.recompute();
    }

    /// Adds fetched employees to the cache.
    pub fn cache_employees(&mut self, employees: impl IntoIterator<Item = Employee>) {
        self.employees
            .extend(employees.into_iter().map(|e| (e.id, e)));
        self.recompute();
    }

    /// Adds fetched offices to the cache.
    pub fn cache_offices(&mut self, offices: impl IntoIterator<Item = Office>) {
        self.offices.extend(offices.into_iter().map(|o| (o.id, o)));
        self.recompute();
    }

    /// Rebuilds shift columns, the shift index and enriched assignments.
    pub fn recompute(&mut self) {
        self.shifts = derive_shifts(&self.schedules);
        self.shift_index = shift_schedule_index(&self.shifts);
        self.assignments = enrich_duties(&self.duties, &self.employees, &self.offices);
    }

    /// The office this roster belongs to.
    #[must_use]
    pub const fn office_id(&self) -> i64 {
        self.office_id
    }

    /// First day of each week row.
    #[must_use]
    pub const fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// The loaded chart, if any.
    #[must_use]
    pub const fn chart(&self) -> Option<&DutyChart> {
        self.chart.as_ref()
    }

    /// Schedules of the loaded chart.
    #[must_use]
    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Duties of the loaded chart.
    #[must_use]
    pub fn duties(&self) -> &[Duty] {
        &self.duties
    }

    /// Cached employees by id.
    #[must_use]
    pub const fn employees(&self) -> &HashMap<i64, Employee> {
        &self.employees
    }

    /// Cached offices by id.
    #[must_use]
    pub const fn offices(&self) -> &HashMap<i64, Office> {
        &self.offices
    }

    /// Deduplicated shift columns.
    #[must_use]
    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    /// Shift column to representative schedule id.
    #[must_use]
    pub const fn shift_index(&self) -> &HashMap<ShiftKey, i64> {
        &self.shift_index
    }

    /// Representative schedule of the shift column whose key renders as `key`.
    #[must_use]
    pub fn schedule_for_shift(&self, key: &str) -> Option<i64> {
        self.shift_index
            .iter()
            .find(|(shift, _)| shift.to_string() == key)
            .map(|(_, schedule_id)| *schedule_id)
    }

    /// Duties enriched for display.
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Looks up a schedule of the loaded chart.
    #[must_use]
    pub fn schedule(&self, schedule_id: i64) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.id == schedule_id)
    }

    /// Looks up a duty of the loaded chart.
    #[must_use]
    pub fn duty(&self, duty_id: i64) -> Option<&Duty> {
        self.duties.iter().find(|d| d.id == duty_id)
    }

    /// Employee ids referenced by duties but not yet cached, in first-seen order.
    #[must_use]
    pub fn missing_employee_ids(&self) -> Vec<i64> {
        let mut seen: HashSet<i64> = HashSet::new();
        self.duties
            .iter()
            .map(|d| d.user_id)
            .filter(|id| !self.employees.contains_key(id) && seen.insert(*id))
            .collect()
    }

    /// Office ids referenced by duties or cached employees but not yet cached.
    #[must_use]
    pub fn missing_office_ids(&self) -> Vec<i64> {
        let mut seen: HashSet<i64> = HashSet::new();
        self.duties
            .iter()
            .map(|d| d.office_id)
            .chain(self.employees.values().filter_map(|e| e.office_id))
            .filter(|id| !self.offices.contains_key(id) && seen.insert(*id))
            .collect()
    }

    /// Schedules to offer when editing the loaded chart.
    ///
    /// See [`select_chart_schedules`]; the chart's current schedules count as selected.
    #[must_use]
    pub fn edit_chart_schedules(&self, candidates: &[Schedule]) -> Vec<Schedule> {
        let selected: HashSet<i64> = self
            .chart
            .as_ref()
            .map(|c| c.schedule_ids.iter().copied().collect())
            .unwrap_or_default();
        select_chart_schedules(candidates, &selected)
    }

    /// Builds the week containing `anchor`.
    ///
    /// # Errors
    ///
    /// Returns an error if date arithmetic overflows.
    pub fn week_view(&self, anchor: Date) -> Result<WeekView, DomainError> {
        let days: Vec<Date> = week_days(anchor, self.week_start)?;
        let grouped: GroupedAssignments = group_assignments(&self.assignments, &days, &self.shifts);
        Ok(WeekView {
            days,
            shifts: self.shifts.clone(),
            grouped,
        })
    }

    /// Builds a month grid with assignments for every displayed day.
    ///
    /// # Errors
    ///
    /// Returns an error if the month falls outside the supported range.
    pub fn month_view(&self, month: CalendarMonth) -> Result<MonthView, DomainError> {
        let grid: MonthGrid = month_grid(month, self.week_start)?;
        let grouped: GroupedAssignments =
            group_assignments(&self.assignments, &grid.dates(), &self.shifts);
        Ok(MonthView {
            grid,
            shifts: self.shifts.clone(),
            grouped,
        })
    }

    /// Assignments whose shift is in progress at `now` (local wall clock).
    ///
    /// The interval comes from the duty itself, falling back to its schedule.
    #[must_use]
    pub fn active_assignments(&self, now: PrimitiveDateTime) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| {
                self.assignment_interval(a)
                    .is_some_and(|(start, end)| is_shift_active(a.date, start, end, now))
            })
            .collect()
    }

    fn assignment_interval(&self, assignment: &Assignment) -> Option<(ShiftTime, ShiftTime)> {
        if let (Some(start), Some(end)) = (assignment.start_time, assignment.end_time) {
            return Some((start, end));
        }
        self.schedule(assignment.schedule_id)
            .map(|s| (s.start_time, s.end_time))
    }

    /// Audit scope of this roster.
    #[must_use]
    pub fn scope(&self) -> RosterScope {
        self.chart.as_ref().map_or_else(
            || RosterScope::office(self.office_id),
            |chart| RosterScope::chart(self.office_id, chart.id),
        )
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        let chart: String = self
            .chart
            .as_ref()
            .map_or_else(|| String::from("none"), |c| c.id.to_string());
        StateSnapshot::new(format!(
            "office={},chart={},schedules={},duties={}",
            self.office_id,
            chart,
            self.schedules.len(),
            self.duties.len()
        ))
    }
}

/// One week of the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekView {
    /// The seven days, starting at the configured week start.
    pub days: Vec<Date>,
    /// Shift columns.
    pub shifts: Vec<Shift>,
    /// Assignments per day and shift.
    pub grouped: GroupedAssignments,
}

/// One month of the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    /// The padded month grid.
    pub grid: MonthGrid,
    /// Shift columns.
    pub shifts: Vec<Shift>,
    /// Assignments per displayed day and shift.
    pub grouped: GroupedAssignments,
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    ///
    /// Duties created by the backend are not in it yet; reload them with
    /// [`RosterState::replace_duties`] once the write succeeds.
    pub new_state: RosterState,
    /// The backend write to perform.
    pub mutation: Mutation,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
