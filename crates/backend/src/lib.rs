// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Async client for the duty roster REST backend.
//!
//! The backend owns all persistent data: offices, users, schedules, charts
//! and duties. This crate speaks its JSON API under `api/v1/`, converts wire
//! records into domain types, and performs the writes produced by core
//! commands.
//!
//! ## Sessions
//!
//! Every request carries the caller's bearer token. A `401` triggers one
//! silent refresh and retry; if that fails the tokens are cleared and
//! [`BackendError::SessionExpired`] is returned.
//!
//! ## Testing
//!
//! Tests run the client against an in-process `axum` router bound to an
//! ephemeral port, so no external backend is needed.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod client;
pub mod data_models;
mod enrichment;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use client::{API_PREFIX, BackendClient, TokenStore, Tokens};
pub use data_models::{
    AuditLogRecord, AuthUserRecord, BulkUpsertResult, DashboardOfficeRecord, DashboardOrder,
    DutyChartRecord, ExportPreview, Paginated, SmsLogRecord,
};
pub use enrichment::{enrich_roster, fetch_employees, fetch_offices};
pub use error::BackendError;
pub use mutations::MutationOutcome;
pub use queries::{AuditLogQuery, DutyFilter, ExportFormat, ExportQuery, ExportScope, SmsLogQuery};
