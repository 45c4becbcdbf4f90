// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for roster reads and writes.
//!
//! Every write follows the same path: check the signed-in user's
//! permissions, validate the command against the loaded roster, send the
//! resulting mutation to the backend and reload what changed.

use duty_roster::{Command, MonthView, RosterState, TransitionResult, WeekView, apply};
use duty_roster_audit::{Actor, AuditEvent, Cause};
use duty_roster_backend::{
    AuditLogQuery, AuditLogRecord, DashboardOfficeRecord, DutyFilter, ExportFormat,
    ExportPreview, ExportQuery, ExportScope, MutationOutcome, Paginated, SmsLogQuery,
    SmsLogRecord, enrich_roster,
};
use duty_roster_domain::{
    BsDate, BsMonth, CalendarMonth, Duty, DutyChart, Employee, GroupedAssignments, Office,
    Schedule, Shift, bs_year_options, format_iso_date, shift_weeks, weekday_labels,
};
use std::collections::{HashMap, HashSet};
use time::{Date, Month, PrimitiveDateTime, Weekday};
use tracing::{debug, info, warn};

use crate::auth::{AuthUser, AuthorizationService, Session};
use crate::capabilities::{
    compute_chart_capabilities, compute_global_capabilities, manageable_offices,
};
use crate::csv_preview::{DutyCsvPreview, preview_duty_csv as preview_duty_csv_impl};
use crate::error::{ApiError, translate_backend_error, translate_core_error, translate_domain_error};
use crate::request_response::{
    AssignDutyRangeRequest, AssignDutyRequest, AssignDutyResponse, AssignmentInfo,
    BulkAssignResponse, CalendarKind, CapabilitiesResponse, CellInfo, ChartInfo, ChartResponse,
    ChartSchedulesResponse, CreateChartRequest, CsvImportRequest, CsvPreviewResponse, DayInfo, ExportFile, ExportRequest,
    MessageResponse, MonthRosterRequest, MonthRosterResponse, ReorderDashboardRequest, ScheduleOption,
    ShiftInfo, UpdateChartRequest, WeekRosterResponse, parse_date_field, parse_required_date,
};
use crate::roster_export::{weekly_roster_csv, weekly_roster_filename};

const CREATE_DUTY_FAILED: &str = "Failed to create duty.";
const ASSIGN_DUTIES_FAILED: &str = "Failed to assign duties.";
const DELETE_DUTY_FAILED: &str = "Failed to delete duty";
const CREATE_CHART_FAILED: &str = "Failed to create duty chart.";
const UPDATE_CHART_FAILED: &str = "Failed to update duty chart.";
const DELETE_CHART_FAILED: &str = "Failed to delete duty chart. Ensure no employees are assigned.";
const IMPORT_FAILED: &str = "Failed to import duties.";
const LOAD_FAILED: &str = "Failed to load the duty roster.";
/// Years either side of the shown month offered by the month picker.
const YEAR_OPTION_SPAN: i32 = 5;
const EXPORT_FAILED: &str = "Failed to export duty chart.";

/// The result of an API operation that includes both the response and the audit event.
///
/// This ensures that successful API operations always produce an audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// The audit event generated by this operation.
    pub audit_event: AuditEvent,
    /// The roster after the backend confirmed the write.
    pub new_state: RosterState,
}

// ========================================================================
// Loading
// ========================================================================

/// Loads an office roster, optionally narrowed to one chart.
///
/// Employees and offices already cached in `cached` are reused so that
/// repeated loads only fetch what is new.
///
/// # Arguments
///
/// * `session` - The signed-in user and their client
/// * `office_id` - The office whose roster is shown
/// * `chart_id` - The chart to load, if any
/// * `week_start` - First day of each week row
/// * `cached` - A previously loaded roster whose caches may be reused
///
/// # Errors
///
/// Returns an error if the chart belongs to another office or the backend
/// cannot be reached.
pub async fn load_roster(
    session: &Session,
    office_id: i64,
    chart_id: Option<i64>,
    week_start: Weekday,
    cached: Option<&RosterState>,
) -> Result<RosterState, ApiError> {
    let mut state: RosterState = seeded_state(office_id, week_start, cached);

    if let Some(chart_id) = chart_id {
        let chart: DutyChart = session
            .client
            .duty_chart(chart_id)
            .await
            .map_err(|e| translate_backend_error(e, LOAD_FAILED))?;
        if chart.office_id != office_id {
            return Err(ApiError::InvalidInput {
                field: String::from("chart_id"),
                message: format!("Duty chart {chart_id} does not belong to office {office_id}"),
            });
        }
        load_chart_into(session, &mut state, chart).await?;
    }

    enrich_roster(&session.client, &mut state).await;
    debug!(
        office_id,
        ?chart_id,
        duties = state.duties().len(),
        "Roster loaded"
    );
    Ok(state)
}

/// Loads the roster of a chart, taking the office from the chart itself.
///
/// # Errors
///
/// Returns an error if the chart cannot be fetched.
pub async fn load_chart_roster(
    session: &Session,
    chart_id: i64,
    week_start: Weekday,
    cached: Option<&RosterState>,
) -> Result<RosterState, ApiError> {
    let chart: DutyChart = session
        .client
        .duty_chart(chart_id)
        .await
        .map_err(|e| translate_backend_error(e, LOAD_FAILED))?;
    let mut state: RosterState = seeded_state(chart.office_id, week_start, cached);
    load_chart_into(session, &mut state, chart).await?;
    enrich_roster(&session.client, &mut state).await;
    Ok(state)
}

/// Loads the roster of the chart a duty belongs to.
///
/// # Errors
///
/// Returns an error if the duty cannot be fetched or belongs to no chart.
pub async fn load_duty_roster(
    session: &Session,
    duty_id: i64,
    week_start: Weekday,
    cached: Option<&RosterState>,
) -> Result<RosterState, ApiError> {
    let duty: Duty = session
        .client
        .duty(duty_id)
        .await
        .map_err(|e| translate_backend_error(e, LOAD_FAILED))?;
    let chart_id: i64 = duty.duty_chart_id.ok_or_else(|| ApiError::ResourceNotFound {
        resource_type: String::from("Duty chart"),
        message: format!("Duty {duty_id} is not part of a duty chart"),
    })?;
    load_chart_roster(session, chart_id, week_start, cached).await
}

fn seeded_state(office_id: i64, week_start: Weekday, cached: Option<&RosterState>) -> RosterState {
    let mut state: RosterState = RosterState::new(office_id, week_start);
    if let Some(previous) = cached {
        state.cache_employees(previous.employees().values().cloned());
        state.cache_offices(previous.offices().values().cloned());
    }
    state
}

async fn load_chart_into(
    session: &Session,
    state: &mut RosterState,
    chart: DutyChart,
) -> Result<(), ApiError> {
    let (schedules, duties): (Vec<Schedule>, Vec<Duty>) = futures::try_join!(
        session.client.schedules(None, Some(chart.id)),
        session.client.duties(DutyFilter::for_chart(chart.id)),
    )
    .map_err(|e| translate_backend_error(e, LOAD_FAILED))?;
    state.load_chart(chart, schedules, duties);
    Ok(())
}

/// Reloads the duties of the loaded chart after a write.
///
/// The write already succeeded, so a failed reload keeps the previous
/// duties instead of failing the request.
async fn refresh_duties(session: &Session, mut state: RosterState) -> RosterState {
    if let Some(chart_id) = state.chart().map(|c| c.id) {
        match session.client.duties(DutyFilter::for_chart(chart_id)).await {
            Ok(duties) => state.replace_duties(duties),
            Err(e) => warn!(chart_id, error = %e, "Failed to reload duties after write"),
        }
    }
    enrich_roster(&session.client, &mut state).await;
    state
}

/// Replaces the loaded chart with the backend's copy and reloads its schedules.
async fn refresh_chart(session: &Session, mut state: RosterState, chart: DutyChart) -> RosterState {
    let schedules: Vec<Schedule> = match session.client.schedules(None, Some(chart.id)).await {
        Ok(schedules) => schedules,
        Err(e) => {
            warn!(chart_id = chart.id, error = %e, "Failed to reload schedules after write");
            state.schedules().to_vec()
        }
    };
    let duties: Vec<Duty> = state.duties().to_vec();
    state.load_chart(chart, schedules, duties);
    state
}

/// An explicit schedule wins; otherwise a shift column key names the
/// column's representative schedule. Neither leaves the shift unselected.
fn resolve_schedule_id(
    state: &RosterState,
    schedule_id: Option<i64>,
    shift_key: Option<&str>,
) -> Result<Option<i64>, ApiError> {
    if schedule_id.is_some() {
        return Ok(schedule_id);
    }
    let Some(key) = shift_key.map(str::trim).filter(|key| !key.is_empty()) else {
        return Ok(None);
    };
    state
        .schedule_for_shift(key)
        .map(Some)
        .ok_or_else(|| ApiError::InvalidInput {
            field: String::from("shift_key"),
            message: format!("Unknown shift '{key}'"),
        })
}

fn require_loaded_chart(state: &RosterState, chart_id: i64) -> Result<&DutyChart, ApiError> {
    match state.chart() {
        Some(chart) if chart.id == chart_id => Ok(chart),
        _ => Err(ApiError::ResourceNotFound {
            resource_type: String::from("Duty chart"),
            message: String::from("Please select a Duty Chart first."),
        }),
    }
}

fn record_audit_event(event: &AuditEvent) {
    info!(
        actor = %event.actor.id,
        actor_type = %event.actor.actor_type,
        cause = %event.cause.id,
        action = %event.action.name,
        details = event.action.details.as_deref().unwrap_or(""),
        office_id = event.scope.office_id,
        chart_id = ?event.scope.chart_id,
        before = %event.before.data,
        after = %event.after.data,
        "Roster changed"
    );
}

// ========================================================================
// Views
// ========================================================================

fn active_duty_ids(state: &RosterState, now: PrimitiveDateTime) -> HashSet<i64> {
    state
        .active_assignments(now)
        .into_iter()
        .map(|a| a.duty_id)
        .collect()
}

fn build_cells(
    dates: &[Date],
    shifts: &[Shift],
    grouped: &GroupedAssignments,
    active: &HashSet<i64>,
) -> Vec<CellInfo> {
    let mut cells: Vec<CellInfo> = Vec::with_capacity(dates.len() * shifts.len());
    for date in dates {
        let columns = grouped.get(date);
        for shift in shifts {
            let assignments: Vec<AssignmentInfo> = columns
                .and_then(|c| c.get(&shift.key))
                .map(|list| {
                    list.iter()
                        .map(|a| AssignmentInfo::new(a, active.contains(&a.duty_id)))
                        .collect()
                })
                .unwrap_or_default();
            cells.push(CellInfo {
                date: format_iso_date(*date),
                shift_key: shift.key.to_string(),
                assignments,
            });
        }
    }
    cells
}

/// Builds the week view containing `anchor`.
///
/// # Arguments
///
/// * `state` - The loaded roster
/// * `anchor` - Any day of the wanted week
/// * `now` - The current local wall-clock time, used to flag active shifts
///
/// # Errors
///
/// Returns an error if date arithmetic overflows.
pub fn get_week_roster(
    state: &RosterState,
    anchor: Date,
    now: PrimitiveDateTime,
) -> Result<WeekRosterResponse, ApiError> {
    let view: WeekView = state.week_view(anchor).map_err(translate_domain_error)?;
    let active: HashSet<i64> = active_duty_ids(state, now);

    let days: Vec<DayInfo> = view
        .days
        .iter()
        .map(|date| DayInfo {
            date: format_iso_date(*date),
            bs_date: BsDate::from_gregorian(*date).ok().map(|d| d.to_string()),
            in_month: true,
        })
        .collect();

    let first_day: Date = view.days.first().copied().unwrap_or(anchor);
    let previous_week: Date = shift_weeks(first_day, -1).map_err(translate_domain_error)?;
    let next_week: Date = shift_weeks(first_day, 1).map_err(translate_domain_error)?;

    Ok(WeekRosterResponse {
        office_id: state.office_id(),
        chart: state.chart().map(ChartInfo::from),
        days,
        shifts: view.shifts.iter().map(ShiftInfo::from).collect(),
        cells: build_cells(&view.days, &view.shifts, &view.grouped, &active),
        previous_week: format_iso_date(previous_week),
        next_week: format_iso_date(next_week),
    })
}

/// Resolves the month a month-view request asks for.
///
/// Missing parts default to the month containing `today` in the requested
/// calendar.
///
/// # Errors
///
/// Returns an error if the month is outside the supported range.
pub fn resolve_month(request: &MonthRosterRequest, today: Date) -> Result<CalendarMonth, ApiError> {
    match request.calendar {
        CalendarKind::Bs => {
            let current: BsMonth = BsMonth::containing(today).map_err(translate_domain_error)?;
            let year: i32 = request.year.unwrap_or_else(|| current.year());
            let month: u8 = request.month.unwrap_or_else(|| current.month());
            BsMonth::new(year, month)
                .map(CalendarMonth::BikramSambat)
                .map_err(translate_domain_error)
        }
        CalendarKind::Gregorian => {
            let year: i32 = request.year.unwrap_or_else(|| today.year());
            let month: Month = match request.month {
                Some(number) => Month::try_from(number).map_err(|_| ApiError::InvalidInput {
                    field: String::from("month"),
                    message: format!("Month must be between 1 and 12, got {number}"),
                })?,
                None => today.month(),
            };
            Ok(CalendarMonth::Gregorian { year, month })
        }
    }
}

/// Builds the month view for a Gregorian or Bikram Sambat month.
///
/// # Errors
///
/// Returns an error if the month is outside the supported range.
pub fn get_month_roster(
    state: &RosterState,
    month: CalendarMonth,
    now: PrimitiveDateTime,
) -> Result<MonthRosterResponse, ApiError> {
    let view: MonthView = state.month_view(month).map_err(translate_domain_error)?;
    let active: HashSet<i64> = active_duty_ids(state, now);

    let year: i32 = month.year();
    let year_options: Vec<i32> = match month {
        CalendarMonth::BikramSambat(_) => bs_year_options(year, YEAR_OPTION_SPAN),
        CalendarMonth::Gregorian { .. } => {
            ((year - YEAR_OPTION_SPAN)..=(year + YEAR_OPTION_SPAN)).collect()
        }
    };

    Ok(MonthRosterResponse {
        office_id: state.office_id(),
        chart: state.chart().map(ChartInfo::from),
        label: view.grid.month.label(),
        month_start: format_iso_date(view.grid.month_start),
        month_end: format_iso_date(view.grid.month_end),
        weekday_labels: weekday_labels(&month, state.week_start())
            .into_iter()
            .map(String::from)
            .collect(),
        year_options,
        weeks: view
            .grid
            .weeks()
            .map(|week| week.iter().map(DayInfo::from).collect())
            .collect(),
        shifts: view.shifts.iter().map(ShiftInfo::from).collect(),
        cells: build_cells(&view.grid.dates(), &view.shifts, &view.grouped, &active),
    })
}

/// Returns what the signed-in user may do, globally and on the loaded chart.
#[must_use]
pub fn get_capabilities(user: &AuthUser, state: Option<&RosterState>) -> CapabilitiesResponse {
    CapabilitiesResponse {
        user_id: user.id,
        role: user.role.to_string(),
        global: compute_global_capabilities(user),
        chart: state
            .and_then(RosterState::chart)
            .map(|chart| compute_chart_capabilities(user, chart)),
    }
}

/// Lists the offices offered in office pickers.
///
/// # Errors
///
/// Returns an error if the offices cannot be fetched.
pub async fn list_manageable_offices(session: &Session) -> Result<Vec<Office>, ApiError> {
    let offices: Vec<Office> = session
        .client
        .offices()
        .await
        .map_err(|e| translate_backend_error(e, "Failed to load offices."))?;
    Ok(manageable_offices(&session.user, offices))
}

// ========================================================================
// Duties
// ========================================================================

/// Assigns one employee to one shift on one day.
///
/// This function:
/// - Verifies the user may create duties for the chart's office
/// - Validates the assignment against the loaded roster
/// - Creates the duty in the backend
/// - Reloads the chart's duties
///
/// # Errors
///
/// Returns an error if:
/// - The chart is not loaded
/// - The user lacks `duties.create_duty` or does not manage the office
/// - A roster rule is violated
/// - The backend rejects the duty
pub async fn assign_duty(
    session: &Session,
    state: &RosterState,
    request: AssignDutyRequest,
    cause: Cause,
    today: Date,
) -> Result<ApiResult<AssignDutyResponse>, ApiError> {
    let chart: &DutyChart = require_loaded_chart(state, request.chart_id)?;
    AuthorizationService::authorize_create_duty(&session.user, chart.office_id)?;

    let date: Date = parse_required_date("date", &request.date)?;
    let actor: Actor = session.user.to_audit_actor();
    let command: Command = Command::AssignDuty {
        user_id: request.user_id,
        schedule_id: resolve_schedule_id(state, request.schedule_id, request.shift_key.as_deref())?,
        date,
    };
    let transition: TransitionResult =
        apply(state, command, actor, cause, today).map_err(translate_core_error)?;

    let outcome: MutationOutcome = session
        .client
        .perform(&transition.mutation)
        .await
        .map_err(|e| translate_backend_error(e, CREATE_DUTY_FAILED))?;
    let duty: Duty = match outcome {
        MutationOutcome::DutyCreated(duty) => duty,
        other => {
            return Err(ApiError::Internal {
                message: format!("Unexpected backend outcome for a new duty: {other:?}"),
            });
        }
    };

    record_audit_event(&transition.audit_event);
    let new_state: RosterState = refresh_duties(session, transition.new_state).await;

    Ok(ApiResult {
        response: AssignDutyResponse {
            message: String::from("Duty created successfully"),
            duty_id: duty.id,
        },
        audit_event: transition.audit_event,
        new_state,
    })
}

/// Assigns one employee to one shift on every day of an inclusive range.
///
/// Days where the employee already works that shift are updated rather
/// than duplicated.
///
/// # Errors
///
/// Returns an error if the user may not create duties for the chart's
/// office, any day violates a roster rule, or the backend rejects the batch.
pub async fn assign_duty_range(
    session: &Session,
    state: &RosterState,
    request: AssignDutyRangeRequest,
    cause: Cause,
    today: Date,
) -> Result<ApiResult<BulkAssignResponse>, ApiError> {
    let chart: &DutyChart = require_loaded_chart(state, request.chart_id)?;
    AuthorizationService::authorize_create_duty(&session.user, chart.office_id)?;

    let start_date: Date = parse_required_date("start_date", &request.start_date)?;
    let end_date: Date = parse_required_date("end_date", &request.end_date)?;
    let command: Command = Command::AssignDutyRange {
        user_id: request.user_id,
        schedule_id: resolve_schedule_id(state, request.schedule_id, request.shift_key.as_deref())?,
        start_date,
        end_date,
    };
    let transition: TransitionResult = apply(
        state,
        command,
        session.user.to_audit_actor(),
        cause,
        today,
    )
    .map_err(translate_core_error)?;

    let (created, updated): (u64, u64) =
        bulk_upsert(session, &transition, ASSIGN_DUTIES_FAILED).await?;
    record_audit_event(&transition.audit_event);
    let new_state: RosterState = refresh_duties(session, transition.new_state).await;

    Ok(ApiResult {
        response: BulkAssignResponse {
            message: format!("Successfully assigned {} duties", created + updated),
            created,
            updated,
        },
        audit_event: transition.audit_event,
        new_state,
    })
}

/// Sends a bulk upsert and returns `(created, updated)`.
async fn bulk_upsert(
    session: &Session,
    transition: &TransitionResult,
    fallback: &str,
) -> Result<(u64, u64), ApiError> {
    let outcome: MutationOutcome = session
        .client
        .perform(&transition.mutation)
        .await
        .map_err(|e| translate_backend_error(e, fallback))?;
    match outcome {
        MutationOutcome::DutiesUpserted(result) => Ok((result.created, result.updated)),
        other => Err(ApiError::Internal {
            message: format!("Unexpected backend outcome for a bulk upsert: {other:?}"),
        }),
    }
}

/// Deletes a duty of the loaded chart.
///
/// # Errors
///
/// Returns an error if the user lacks `duties.delete`, the duty is not on
/// the loaded chart, or the backend refuses the deletion.
pub async fn remove_duty(
    session: &Session,
    state: &RosterState,
    duty_id: i64,
    cause: Cause,
    today: Date,
) -> Result<ApiResult<MessageResponse>, ApiError> {
    AuthorizationService::authorize_delete_duty(&session.user)?;

    let transition: TransitionResult = apply(
        state,
        Command::RemoveDuty { duty_id },
        session.user.to_audit_actor(),
        cause,
        today,
    )
    .map_err(translate_core_error)?;

    session
        .client
        .perform(&transition.mutation)
        .await
        .map_err(|e| translate_backend_error(e, DELETE_DUTY_FAILED))?;

    record_audit_event(&transition.audit_event);
    let new_state: RosterState = refresh_duties(session, transition.new_state).await;

    Ok(ApiResult {
        response: MessageResponse {
            message: String::from("Duty deleted"),
        },
        audit_event: transition.audit_event,
        new_state,
    })
}

// ========================================================================
// Charts
// ========================================================================

/// Creates a duty chart for an office.
///
/// The returned state has the new chart loaded.
///
/// # Errors
///
/// Returns an error if:
/// - The user lacks `duties.create_chart`
/// - The office is not managed and `duties.create_any_office_chart` is missing
/// - The dates or name are invalid
/// - The backend rejects the chart
pub async fn create_duty_chart(
    session: &Session,
    state: &RosterState,
    request: CreateChartRequest,
    cause: Cause,
    today: Date,
) -> Result<ApiResult<ChartResponse>, ApiError> {
    AuthorizationService::authorize_create_chart(&session.user, request.office_id)?;

    let effective_date: Date = parse_required_date("effective_date", &request.effective_date)?;
    let end_date: Option<Date> = match request.end_date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(parse_required_date("end_date", raw)?),
        _ => None,
    };
    let command: Command = Command::CreateDutyChart {
        office_id: request.office_id,
        name: request.name,
        effective_date,
        end_date,
        schedule_ids: request.schedule_ids,
    };
    let transition: TransitionResult = apply(
        state,
        command,
        session.user.to_audit_actor(),
        cause,
        today,
    )
    .map_err(translate_core_error)?;

    let chart: DutyChart = save_chart(session, &transition, CREATE_CHART_FAILED).await?;

    record_audit_event(&transition.audit_event);
    info!(chart_id = chart.id, office_id = chart.office_id, "Duty chart created");

    let mut new_state: RosterState = refresh_chart(
        session,
        seeded_state(chart.office_id, state.week_start(), Some(&transition.new_state)),
        chart.clone(),
    )
    .await;
    enrich_roster(&session.client, &mut new_state).await;

    Ok(ApiResult {
        response: ChartResponse {
            message: String::from("Duty Chart Created Successfully"),
            chart: ChartInfo::from(&chart),
        },
        audit_event: transition.audit_event,
        new_state,
    })
}

/// Renames the loaded chart, adds schedules to it, or both.
///
/// Every change is validated before anything is sent, and the backend gets a
/// single write, so a rejected part never leaves the other one applied.
/// `schedule_ids` is every schedule chosen in the editor; ids the chart
/// already carries are ignored.
///
/// # Errors
///
/// Returns an error if:
/// - The user may not edit the chart
/// - The request carries neither a name nor schedules
/// - The name is blank or nothing new was selected
/// - The backend rejects the change
pub async fn update_duty_chart(
    session: &Session,
    state: &RosterState,
    chart_id: i64,
    request: UpdateChartRequest,
    cause: Cause,
    today: Date,
) -> Result<ApiResult<ChartResponse>, ApiError> {
    let chart: &DutyChart = require_loaded_chart(state, chart_id)?;
    AuthorizationService::authorize_edit_chart(&session.user, chart.office_id)?;

    let schedules_changed: bool = request.schedule_ids.is_some();
    let transition: TransitionResult = apply(
        state,
        Command::UpdateDutyChart {
            name: request.name,
            selected: request.schedule_ids,
        },
        session.user.to_audit_actor(),
        cause,
        today,
    )
    .map_err(translate_core_error)?;

    let chart: DutyChart = save_chart(session, &transition, UPDATE_CHART_FAILED).await?;
    record_audit_event(&transition.audit_event);

    let (message, new_state): (&str, RosterState) = if schedules_changed {
        (
            "Duty Chart updated successfully",
            refresh_chart(session, transition.new_state, chart.clone()).await,
        )
    } else {
        let mut new_state: RosterState = transition.new_state;
        let schedules: Vec<Schedule> = new_state.schedules().to_vec();
        let duties: Vec<Duty> = new_state.duties().to_vec();
        new_state.load_chart(chart.clone(), schedules, duties);
        ("Duty Chart Name updated", new_state)
    };

    Ok(ApiResult {
        response: ChartResponse {
            message: String::from(message),
            chart: ChartInfo::from(&chart),
        },
        audit_event: transition.audit_event,
        new_state,
    })
}

/// Lists the schedules to offer when editing the loaded chart.
///
/// Candidates are the office's schedules and the shared templates. Of
/// several sharing a name and times, one already on the chart is kept,
/// otherwise an office schedule replaces a template. Templates themselves
/// are never offered.
///
/// # Errors
///
/// Returns an error if the user may not edit the chart or the schedules
/// cannot be loaded.
pub async fn list_chart_schedule_options(
    session: &Session,
    state: &RosterState,
    chart_id: i64,
) -> Result<ChartSchedulesResponse, ApiError> {
    let chart: &DutyChart = require_loaded_chart(state, chart_id)?;
    AuthorizationService::authorize_edit_chart(&session.user, chart.office_id)?;

    let candidates: Vec<Schedule> = session
        .client
        .schedules(Some(chart.office_id), None)
        .await
        .map_err(|e| translate_backend_error(e, LOAD_FAILED))?;
    let on_chart: HashSet<i64> = chart.schedule_ids.iter().copied().collect();
    let schedules: Vec<ScheduleOption> = state
        .edit_chart_schedules(&candidates)
        .iter()
        .map(|schedule| ScheduleOption::new(schedule, on_chart.contains(&schedule.id)))
        .collect();
    debug!(chart_id, offered = schedules.len(), "Chart schedule options");

    Ok(ChartSchedulesResponse { chart_id, schedules })
}

async fn save_chart(
    session: &Session,
    transition: &TransitionResult,
    fallback: &str,
) -> Result<DutyChart, ApiError> {
    let outcome: MutationOutcome = session
        .client
        .perform(&transition.mutation)
        .await
        .map_err(|e| translate_backend_error(e, fallback))?;
    match outcome {
        MutationOutcome::ChartSaved(chart) => Ok(chart),
        other => Err(ApiError::Internal {
            message: format!("Unexpected backend outcome for a chart update: {other:?}"),
        }),
    }
}

/// Deletes the loaded chart.
///
/// The backend refuses to delete a chart that still has duties.
///
/// # Errors
///
/// Returns an error if the user lacks `duties.delete_chart` or the backend
/// refuses the deletion.
pub async fn delete_duty_chart(
    session: &Session,
    state: &RosterState,
    chart_id: i64,
    cause: Cause,
    today: Date,
) -> Result<ApiResult<MessageResponse>, ApiError> {
    require_loaded_chart(state, chart_id)?;
    AuthorizationService::authorize_delete_chart(&session.user)?;

    let transition: TransitionResult = apply(
        state,
        Command::DeleteDutyChart,
        session.user.to_audit_actor(),
        cause,
        today,
    )
    .map_err(translate_core_error)?;

    session
        .client
        .perform(&transition.mutation)
        .await
        .map_err(|e| translate_backend_error(e, DELETE_CHART_FAILED))?;

    record_audit_event(&transition.audit_event);

    Ok(ApiResult {
        response: MessageResponse {
            message: String::from("Duty Chart deleted successfully"),
        },
        audit_event: transition.audit_event,
        new_state: transition.new_state,
    })
}

// ========================================================================
// CSV import
// ========================================================================

/// Employees a CSV row may name: the chart office's staff plus everyone
/// already cached for the roster.
async fn import_candidates(session: &Session, state: &RosterState, office_id: i64) -> Result<Vec<Employee>, ApiError> {
    let staff: Vec<Employee> = session
        .client
        .users(Some(office_id), None)
        .await
        .map_err(|e| translate_backend_error(e, "Failed to load employees."))?;

    let mut by_id: HashMap<i64, Employee> = state.employees().clone();
    by_id.extend(staff.into_iter().map(|e| (e.id, e)));
    let mut employees: Vec<Employee> = by_id.into_values().collect();
    employees.sort_by_key(|e| e.id);
    Ok(employees)
}

async fn preview_import(
    session: &Session,
    state: &RosterState,
    request: &CsvImportRequest,
    today: Date,
) -> Result<DutyCsvPreview, ApiError> {
    let chart: &DutyChart = require_loaded_chart(state, request.chart_id)?;
    AuthorizationService::authorize_create_duty(&session.user, chart.office_id)?;
    let employees: Vec<Employee> = import_candidates(session, state, chart.office_id).await?;
    preview_duty_csv_impl(&request.csv_content, state, &employees, today)
}

/// Validates CSV duty rows without importing them.
///
/// # Errors
///
/// Returns an error if the user may not create duties for the chart's
/// office or the CSV headers are invalid. Row problems are reported per row.
pub async fn preview_duty_csv(
    session: &Session,
    state: &RosterState,
    request: CsvImportRequest,
    today: Date,
) -> Result<CsvPreviewResponse, ApiError> {
    let preview: DutyCsvPreview = preview_import(session, state, &request, today).await?;
    debug!(
        total = preview.response.total_rows,
        valid = preview.response.valid_count,
        "CSV duties previewed"
    );
    Ok(preview.response)
}

/// Imports CSV duty rows into the loaded chart as one bulk upsert.
///
/// The file is imported only if every row is valid.
///
/// # Errors
///
/// Returns an error if any row is invalid, the file has no rows, or the
/// backend rejects the batch.
pub async fn import_duty_csv(
    session: &Session,
    state: &RosterState,
    request: CsvImportRequest,
    cause: Cause,
    today: Date,
) -> Result<ApiResult<BulkAssignResponse>, ApiError> {
    let preview: DutyCsvPreview = preview_import(session, state, &request, today).await?;

    if preview.response.invalid_count > 0 {
        return Err(ApiError::InvalidInput {
            field: String::from("csv_content"),
            message: format!(
                "{} of {} rows are invalid; fix them before importing",
                preview.response.invalid_count, preview.response.total_rows
            ),
        });
    }
    if preview.drafts.is_empty() {
        return Err(ApiError::InvalidCsvFormat {
            reason: String::from("No duty rows to import"),
        });
    }

    let transition: TransitionResult = apply(
        state,
        Command::ImportDuties {
            drafts: preview.drafts,
        },
        session.user.to_audit_actor(),
        cause,
        today,
    )
    .map_err(translate_core_error)?;

    let (created, updated): (u64, u64) = bulk_upsert(session, &transition, IMPORT_FAILED).await?;
    record_audit_event(&transition.audit_event);
    let new_state: RosterState = refresh_duties(session, transition.new_state).await;

    Ok(ApiResult {
        response: BulkAssignResponse {
            message: String::from("Duties Imported Successfully"),
            created,
            updated,
        },
        audit_event: transition.audit_event,
        new_state,
    })
}

// ========================================================================
// Exports
// ========================================================================

fn export_query(request: &ExportRequest) -> Result<ExportQuery, ApiError> {
    let start_date: Option<Date> = request
        .start_date
        .as_deref()
        .map(|raw| parse_required_date("start_date", raw))
        .transpose()?;
    let end_date: Option<Date> = request
        .end_date
        .as_deref()
        .map(|raw| parse_required_date("end_date", raw))
        .transpose()?;

    if request.scope == ExportScope::Range {
        let (Some(start), Some(end)) = (start_date, end_date) else {
            return Err(ApiError::InvalidInput {
                field: String::from("start_date"),
                message: String::from("A range export needs both a start and an end date"),
            });
        };
        if end < start {
            return Err(ApiError::InvalidInput {
                field: String::from("end_date"),
                message: String::from("End date must be on or after the start date"),
            });
        }
    }

    Ok(ExportQuery {
        chart_id: request.chart_id,
        scope: request.scope,
        start_date,
        end_date,
        page: request.page,
        page_size: request.page_size,
    })
}

/// Fetches one page of the tabular chart export.
///
/// # Errors
///
/// Returns an error if the user lacks `duties.export_chart`, the range is
/// invalid, or the backend fails.
pub async fn export_preview(
    session: &Session,
    request: &ExportRequest,
) -> Result<ExportPreview, ApiError> {
    AuthorizationService::authorize_export_chart(&session.user)?;
    let query: ExportQuery = export_query(request)?;
    session
        .client
        .export_preview(query)
        .await
        .map_err(|e| translate_backend_error(e, EXPORT_FAILED))
}

/// Downloads the chart export rendered by the backend.
///
/// # Errors
///
/// Returns an error if the user lacks `duties.export_chart`, no format was
/// given, the range is invalid, or the backend fails.
pub async fn export_download(
    session: &Session,
    request: &ExportRequest,
) -> Result<ExportFile, ApiError> {
    AuthorizationService::authorize_export_chart(&session.user)?;
    let format: ExportFormat = request.format.ok_or_else(|| ApiError::InvalidInput {
        field: String::from("format"),
        message: String::from("Choose an export format: excel, pdf or docx"),
    })?;
    let query: ExportQuery = export_query(request)?;

    let bytes: Vec<u8> = session
        .client
        .export_download(query, format)
        .await
        .map_err(|e| translate_backend_error(e, EXPORT_FAILED))?;
    info!(chart_id = request.chart_id, format = format.as_str(), size = bytes.len(), "Chart exported");

    Ok(ExportFile {
        filename: format!("duty-chart-{}.{}", request.chart_id, format.extension()),
        content_type: format.content_type(),
        bytes,
    })
}

/// Builds the weekly roster CSV for the week containing `anchor`.
///
/// # Errors
///
/// Returns an error if the week cannot be built or the CSV cannot be written.
pub fn export_weekly_roster_csv(state: &RosterState, anchor: Date) -> Result<ExportFile, ApiError> {
    let view: WeekView = state.week_view(anchor).map_err(translate_domain_error)?;
    let week_start: Date = view.days.first().copied().unwrap_or(anchor);
    let csv: String = weekly_roster_csv(&view)?;

    Ok(ExportFile {
        filename: weekly_roster_filename(week_start),
        content_type: "text/csv; charset=utf-8",
        bytes: csv.into_bytes(),
    })
}

// ========================================================================
// Logs and dashboard
// ========================================================================

/// Fetches a page of the backend audit log.
///
/// # Errors
///
/// Returns an error if the backend refuses or fails.
pub async fn list_audit_logs(
    session: &Session,
    query: &AuditLogQuery,
) -> Result<Paginated<AuditLogRecord>, ApiError> {
    session
        .client
        .audit_logs(query)
        .await
        .map_err(|e| translate_backend_error(e, "Failed to load audit logs."))
}

/// Fetches a page of outgoing SMS notifications.
///
/// # Errors
///
/// Returns an error if the backend refuses or fails.
pub async fn list_sms_logs(
    session: &Session,
    query: &SmsLogQuery,
) -> Result<Paginated<SmsLogRecord>, ApiError> {
    session
        .client
        .sms_logs(query)
        .await
        .map_err(|e| translate_backend_error(e, "Failed to load SMS logs."))
}

/// Lists the signed-in user's dashboard offices in display order.
///
/// # Errors
///
/// Returns an error if the backend refuses or fails.
pub async fn list_dashboard_offices(session: &Session) -> Result<Vec<DashboardOfficeRecord>, ApiError> {
    let mut offices: Vec<DashboardOfficeRecord> = session
        .client
        .dashboard_offices()
        .await
        .map_err(|e| translate_backend_error(e, "Failed to load dashboard offices."))?;
    offices.sort_by_key(|o| o.order);
    Ok(offices)
}

/// Saves a new order of the signed-in user's dashboard offices.
///
/// # Errors
///
/// Returns an error if an order repeats an entry or the backend refuses.
pub async fn reorder_dashboard_offices(
    session: &Session,
    request: &ReorderDashboardRequest,
) -> Result<MessageResponse, ApiError> {
    let mut seen: HashSet<i64> = HashSet::new();
    if let Some(repeated) = request.orders.iter().find(|o| !seen.insert(o.id)) {
        return Err(ApiError::InvalidInput {
            field: String::from("orders"),
            message: format!("Dashboard office {} appears more than once", repeated.id),
        });
    }

    session
        .client
        .reorder_dashboard_offices(&request.orders)
        .await
        .map_err(|e| translate_backend_error(e, "Failed to reorder dashboard offices."))?;
    info!(user_id = session.user.id, count = request.orders.len(), "Dashboard offices reordered");

    Ok(MessageResponse {
        message: String::from("Dashboard order saved"),
    })
}

/// Resolves the anchor day of a week request, defaulting to `today`.
///
/// # Errors
///
/// Returns an error if the value is not a date.
pub fn resolve_week_anchor(date: Option<&str>, today: Date) -> Result<Date, ApiError> {
    parse_date_field("date", date, today)
}
