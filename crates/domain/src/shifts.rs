// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift column derivation.
//!
//! Schedules fetched for different offices may describe the same shift.
//! Two schedules are the same shift when name, start and end (to the minute)
//! match; the roster shows one column per shift.

use crate::types::{Schedule, ShiftTime};
use std::collections::{HashMap, HashSet};

/// Identity of a shift column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShiftKey {
    /// Shift name ("Shift" when the schedule has none).
    pub name: String,
    /// Start `(hour, minute)`.
    pub start: (u8, u8),
    /// End `(hour, minute)`.
    pub end: (u8, u8),
}

impl ShiftKey {
    /// Builds the key for a schedule.
    ///
    /// Times are compared at minute precision: schedules whose times differ
    /// only in seconds (`"06:00:00"` and `"06:00:30"`) share one column.
    /// Shift times are entered as `HH:MM`, so seconds carry no meaning.
    #[must_use]
    pub fn of(schedule: &Schedule) -> Self {
        Self {
            name: schedule.display_name().to_string(),
            start: schedule.start_time.hour_minute(),
            end: schedule.end_time.hour_minute(),
        }
    }
}

impl std::fmt::Display for ShiftKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{:02}:{:02}|{:02}:{:02}",
            self.name, self.start.0, self.start.1, self.end.0, self.end.1
        )
    }
}

/// A deduplicated shift column and the schedule representing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    /// Column identity.
    pub key: ShiftKey,
    /// Representative schedule id, used when creating duties in this column.
    pub schedule_id: i64,
    /// Shift start.
    pub start_time: ShiftTime,
    /// Shift end.
    pub end_time: ShiftTime,
}

impl Shift {
    /// Returns the shift name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.key.name
    }
}

/// Collapses schedules into shift columns, keeping the first-seen schedule per key.
///
/// Column order follows first appearance.
#[must_use]
pub fn derive_shifts(schedules: &[Schedule]) -> Vec<Shift> {
    let mut seen: HashSet<ShiftKey> = HashSet::new();
    let mut shifts: Vec<Shift> = Vec::new();

    for schedule in schedules {
        let key: ShiftKey = ShiftKey::of(schedule);
        if seen.insert(key.clone()) {
            shifts.push(Shift {
                key,
                schedule_id: schedule.id,
                start_time: schedule.start_time,
                end_time: schedule.end_time,
            });
        }
    }

    shifts
}

/// Maps each shift column to its representative schedule id.
#[must_use]
pub fn shift_schedule_index(shifts: &[Shift]) -> HashMap<ShiftKey, i64> {
    shifts
        .iter()
        .map(|s| (s.key.clone(), s.schedule_id))
        .collect()
}

/// Lists the schedules offered when editing a chart.
///
/// Schedules are deduplicated by raw name, start and end. A later duplicate
/// replaces the kept one when it is selected, or when the kept one is not
/// selected and the duplicate belongs to an office. Templates are dropped
/// from the result.
///
/// # Arguments
///
/// * `schedules` - Candidate schedules, in fetch order
/// * `selected` - Schedule ids currently selected for the chart
#[must_use]
pub fn select_chart_schedules(schedules: &[Schedule], selected: &HashSet<i64>) -> Vec<Schedule> {
    type RawKey<'a> = (Option<&'a str>, (u8, u8), (u8, u8));

    let mut order: Vec<RawKey<'_>> = Vec::new();
    let mut kept: HashMap<RawKey<'_>, &Schedule> = HashMap::new();

    for schedule in schedules {
        let key: RawKey<'_> = (
            schedule.name.as_deref(),
            schedule.start_time.hour_minute(),
            schedule.end_time.hour_minute(),
        );
        match kept.get(&key) {
            None => {
                order.push(key);
                kept.insert(key, schedule);
            }
            Some(existing) => {
                let replace: bool = selected.contains(&schedule.id)
                    || (!selected.contains(&existing.id) && !schedule.is_template());
                if replace {
                    kept.insert(key, schedule);
                }
            }
        }
    }

    order
        .iter()
        .filter_map(|key| kept.get(key))
        .filter(|s| !s.is_template())
        .map(|s| (*s).clone())
        .collect()
}

/// Returns selected schedule ids the chart does not already carry, in selection order.
#[must_use]
pub fn new_schedule_ids(initial: &[i64], selected: &[i64]) -> Vec<i64> {
    let initial: HashSet<i64> = initial.iter().copied().collect();
    let mut seen: HashSet<i64> = HashSet::new();
    selected
        .iter()
        .copied()
        .filter(|id| !initial.contains(id) && seen.insert(*id))
        .collect()
}
