// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Command, Mutation};
use crate::error::CoreError;
use crate::state::{RosterState, TransitionResult};
use duty_roster_audit::{Action, Actor, AuditEvent, Cause, RosterScope, StateSnapshot};
use duty_roster_domain::{
    DomainError, Duty, DutyChart, DutyChartDraft, DutyDraft, Schedule, expand_duty_range,
    format_iso_date, new_schedule_ids, validate_chart_dates, validate_chart_name,
    validate_duty_in_chart, validate_no_overlap, validate_not_backdated,
    validate_single_duty_per_day,
};
use std::collections::HashSet;
use time::Date;

/// What a command arm produced before the audit event is attached.
struct Outcome {
    new_state: RosterState,
    mutation: Mutation,
    scope: RosterScope,
    details: String,
}

/// Applies a command to the roster, producing a new state, a backend mutation
/// and an audit event.
///
/// Nothing is sent anywhere: the caller performs the returned mutation and
/// refreshes the state from the backend afterwards.
///
/// # Arguments
///
/// * `state` - The current roster (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `today` - The current local date, used to reject backdated duties
///
/// # Errors
///
/// Returns an error if the command violates a roster rule.
pub fn apply(
    state: &RosterState,
    command: Command,
    actor: Actor,
    cause: Cause,
    today: Date,
) -> Result<TransitionResult, CoreError> {
    let name: &'static str = command.name();
    let before: StateSnapshot = state.to_snapshot();

    let outcome: Outcome = match command {
        Command::AssignDuty {
            user_id,
            schedule_id,
            date,
        } => assign_duty(state, user_id, schedule_id, date, today)?,
        Command::AssignDutyRange {
            user_id,
            schedule_id,
            start_date,
            end_date,
        } => assign_duty_range(state, user_id, schedule_id, start_date, end_date, today)?,
        Command::RemoveDuty { duty_id } => remove_duty(state, duty_id)?,
        Command::CreateDutyChart {
            office_id,
            name,
            effective_date,
            end_date,
            schedule_ids,
        } => create_duty_chart(
            state,
            DutyChartDraft {
                office_id,
                name,
                effective_date,
                end_date,
                schedule_ids,
            },
        )?,
        Command::UpdateDutyChart { name, selected } => update_duty_chart(state, name, selected)?,
        Command::DeleteDutyChart => delete_duty_chart(state)?,
        Command::ImportDuties { drafts } => import_duties(state, drafts, today)?,
    };

    let after: StateSnapshot = outcome.new_state.to_snapshot();
    let action: Action = Action::new(String::from(name), Some(outcome.details));
    let audit_event: AuditEvent =
        AuditEvent::new(actor, cause, action, outcome.scope, before, after);

    Ok(TransitionResult {
        new_state: outcome.new_state,
        mutation: outcome.mutation,
        audit_event,
    })
}

fn loaded_chart(state: &RosterState) -> Result<&DutyChart, DomainError> {
    state.chart().ok_or(DomainError::NoChartSelected)
}

fn required_selection(
    state: &RosterState,
    user_id: Option<i64>,
    schedule_id: Option<i64>,
) -> Result<(i64, Schedule), DomainError> {
    let user_id: i64 = user_id.ok_or(DomainError::MissingEmployee)?;
    let schedule_id: i64 = schedule_id.ok_or(DomainError::MissingShift)?;
    let schedule: Schedule = state
        .schedule(schedule_id)
        .cloned()
        .ok_or(DomainError::ScheduleNotFound(schedule_id))?;
    Ok((user_id, schedule))
}

fn assign_duty(
    state: &RosterState,
    user_id: Option<i64>,
    schedule_id: Option<i64>,
    date: Date,
    today: Date,
) -> Result<Outcome, CoreError> {
    let chart: &DutyChart = loaded_chart(state)?;
    let (user_id, schedule) = required_selection(state, user_id, schedule_id)?;

    validate_duty_in_chart(chart, date)?;
    validate_not_backdated(date, today)?;
    validate_no_overlap(
        user_id,
        date,
        (schedule.start_time, schedule.end_time),
        state.duties(),
        state.schedules(),
    )?;
    validate_single_duty_per_day(user_id, date, state.duties())?;

    let draft: DutyDraft = DutyDraft::new(date, user_id, chart.office_id, schedule.id, chart.id);

    Ok(Outcome {
        new_state: state.clone(),
        mutation: Mutation::CreateDuty(draft),
        scope: state.scope(),
        details: format!(
            "user={user_id} schedule={} date={}",
            schedule.id,
            format_iso_date(date)
        ),
    })
}

/// Range assignment is an upsert: a day where the employee already works the
/// same schedule is updated by the backend, so that duty is not a conflict.
fn assign_duty_range(
    state: &RosterState,
    user_id: Option<i64>,
    schedule_id: Option<i64>,
    start_date: Date,
    end_date: Date,
    today: Date,
) -> Result<Outcome, CoreError> {
    let chart: &DutyChart = loaded_chart(state)?;
    let (user_id, schedule) = required_selection(state, user_id, schedule_id)?;

    let template: DutyDraft =
        DutyDraft::new(start_date, user_id, chart.office_id, schedule.id, chart.id);
    let drafts: Vec<DutyDraft> = expand_duty_range(&template, start_date, end_date)?;

    let others: Vec<Duty> = state
        .duties()
        .iter()
        .filter(|d| !(d.user_id == user_id && d.schedule_id == schedule.id))
        .cloned()
        .collect();

    for draft in &drafts {
        validate_duty_in_chart(chart, draft.date)?;
        validate_not_backdated(draft.date, today)?;
        validate_no_overlap(
            user_id,
            draft.date,
            (schedule.start_time, schedule.end_time),
            &others,
            state.schedules(),
        )?;
        validate_single_duty_per_day(user_id, draft.date, &others)?;
    }

    let details: String = format!(
        "user={user_id} schedule={} from={} to={} days={}",
        schedule.id,
        format_iso_date(start_date),
        format_iso_date(end_date),
        drafts.len()
    );

    Ok(Outcome {
        new_state: state.clone(),
        mutation: Mutation::BulkUpsertDuties(drafts),
        scope: state.scope(),
        details,
    })
}

/// Imported rows are upserts like a range, and a file may not give one
/// employee two shifts on the same day.
fn import_duties(
    state: &RosterState,
    drafts: Vec<DutyDraft>,
    today: Date,
) -> Result<Outcome, CoreError> {
    let chart: &DutyChart = loaded_chart(state)?;
    let mut seen: HashSet<(i64, Date)> = HashSet::new();

    for draft in &drafts {
        let schedule: &Schedule = state
            .schedule(draft.schedule_id)
            .ok_or(DomainError::ScheduleNotFound(draft.schedule_id))?;
        validate_duty_in_chart(chart, draft.date)?;
        validate_not_backdated(draft.date, today)?;
        if !seen.insert((draft.user_id, draft.date)) {
            return Err(DomainError::DuplicateDutyForDay {
                user_id: draft.user_id,
                date: draft.date,
            }
            .into());
        }

        let others: Vec<Duty> = state
            .duties()
            .iter()
            .filter(|d| !(d.user_id == draft.user_id && d.schedule_id == draft.schedule_id))
            .cloned()
            .collect();
        validate_no_overlap(
            draft.user_id,
            draft.date,
            (schedule.start_time, schedule.end_time),
            &others,
            state.schedules(),
        )?;
        validate_single_duty_per_day(draft.user_id, draft.date, &others)?;
    }

    // Rows target the loaded chart whatever office or chart the file named.
    let drafts: Vec<DutyDraft> = drafts
        .into_iter()
        .map(|d| DutyDraft::new(d.date, d.user_id, chart.office_id, d.schedule_id, chart.id))
        .collect();

    Ok(Outcome {
        new_state: state.clone(),
        details: format!("chart={} rows={}", chart.id, drafts.len()),
        mutation: Mutation::BulkUpsertDuties(drafts),
        scope: state.scope(),
    })
}

fn remove_duty(state: &RosterState, duty_id: i64) -> Result<Outcome, CoreError> {
    let duty: &Duty = state
        .duty(duty_id)
        .ok_or(DomainError::DutyNotFound(duty_id))?;
    let details: String = format!(
        "duty={duty_id} user={} date={}",
        duty.user_id,
        format_iso_date(duty.date)
    );

    let remaining: Vec<Duty> = state
        .duties()
        .iter()
        .filter(|d| d.id != duty_id)
        .cloned()
        .collect();
    let mut new_state: RosterState = state.clone();
    new_state.replace_duties(remaining);

    Ok(Outcome {
        new_state,
        mutation: Mutation::DeleteDuty { duty_id },
        scope: state.scope(),
        details,
    })
}

fn create_duty_chart(state: &RosterState, draft: DutyChartDraft) -> Result<Outcome, CoreError> {
    validate_chart_name(draft.name.as_deref())?;
    validate_chart_dates(draft.effective_date, draft.end_date)?;

    let end: String = draft
        .end_date
        .map_or_else(|| String::from("open"), format_iso_date);
    let details: String = format!(
        "office={} effective={} end={end} schedules={}",
        draft.office_id,
        format_iso_date(draft.effective_date),
        draft.schedule_ids.len()
    );

    Ok(Outcome {
        new_state: state.clone(),
        scope: RosterScope::office(draft.office_id),
        mutation: Mutation::CreateDutyChart(draft),
        details,
    })
}

/// Validates every requested change before producing the single backend write.
fn update_duty_chart(
    state: &RosterState,
    name: Option<String>,
    selected: Option<Vec<i64>>,
) -> Result<Outcome, CoreError> {
    let chart: &DutyChart = loaded_chart(state)?;
    if name.is_none() && selected.is_none() {
        return Err(DomainError::EmptyChartUpdate.into());
    }

    let mut updated: DutyChart = chart.clone();
    let mut details: Vec<String> = Vec::new();

    let mut new_name: Option<String> = None;
    if let Some(name) = name {
        validate_chart_name(Some(name.as_str()))?;
        let name: String = name.trim().to_string();
        details.push(format!("name={name}"));
        updated.name = Some(name.clone());
        new_name = Some(name);
    }

    let mut schedule_ids: Option<Vec<i64>> = None;
    if let Some(selected) = selected {
        let added: Vec<i64> = new_schedule_ids(&chart.schedule_ids, &selected);
        if added.is_empty() {
            return Err(DomainError::NoNewSchedules.into());
        }
        details.push(format!("added schedules {added:?}"));
        updated.schedule_ids.extend(&added);
        schedule_ids = Some(updated.schedule_ids.clone());
    }

    let mut new_state: RosterState = state.clone();
    new_state.load_chart(updated, state.schedules().to_vec(), state.duties().to_vec());

    Ok(Outcome {
        new_state,
        mutation: Mutation::UpdateDutyChart {
            chart_id: chart.id,
            name: new_name,
            schedule_ids,
        },
        scope: state.scope(),
        details: details.join(" "),
    })
}

fn delete_duty_chart(state: &RosterState) -> Result<Outcome, CoreError> {
    let chart: &DutyChart = loaded_chart(state)?;
    let mut new_state: RosterState = state.clone();
    new_state.clear_chart();

    Ok(Outcome {
        new_state,
        mutation: Mutation::DeleteDutyChart { chart_id: chart.id },
        scope: state.scope(),
        details: format!("chart={} duties={}", chart.id, state.duties().len()),
    })
}
