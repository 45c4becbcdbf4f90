// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use serde::Serialize;

/// The signed-in user (or process) that initiated a roster change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    /// Backend user id, or a process name for system actors.
    pub id: String,
    /// The kind of actor, e.g. "user" or "import".
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Why a change was made, typically the gateway request that carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cause {
    /// Request or import identifier.
    pub id: String,
    /// Free-form description.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// What happened, e.g. "`AssignDuty`" with "user=7 date=2025-01-10".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    /// The command name.
    pub name: String,
    /// Optional human-readable details.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// Compact textual summary of roster state around a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    /// `key=value` pairs separated by commas.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// The office and chart a change applies to.
///
/// A chart that has not been created yet has no id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RosterScope {
    /// Office the change affects.
    pub office_id: i64,
    /// Chart the change affects, if any.
    pub chart_id: Option<i64>,
}

impl RosterScope {
    /// Scope for a change to an existing chart.
    #[must_use]
    pub const fn chart(office_id: i64, chart_id: i64) -> Self {
        Self {
            office_id,
            chart_id: Some(chart_id),
        }
    }

    /// Scope for a change not yet tied to a chart.
    #[must_use]
    pub const fn office(office_id: i64) -> Self {
        Self {
            office_id,
            chart_id: None,
        }
    }
}

impl std::fmt::Display for RosterScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.chart_id {
            Some(chart_id) => write!(f, "office={} chart={chart_id}", self.office_id),
            None => write!(f, "office={}", self.office_id),
        }
    }
}

/// An immutable record of one roster state transition.
///
/// Every successful command yields exactly one audit event. The backend keeps
/// its own audit log; these events describe the change as the gateway saw it
/// and are emitted through `tracing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    /// Who initiated the change.
    pub actor: Actor,
    /// Why it was initiated.
    pub cause: Cause,
    /// What was done.
    pub action: Action,
    /// Which office and chart it touched.
    pub scope: RosterScope,
    /// State before the transition.
    pub before: StateSnapshot,
    /// State after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `scope` - The office and chart affected
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        scope: RosterScope,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            scope,
            before,
            after,
        }
    }
}
