// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fills the roster's employee and office caches.
//!
//! Duties carry only ids for the employee and office. Missing records are
//! fetched concurrently; a failed fetch is logged and skipped so one bad id
//! never blanks the roster.

use crate::client::BackendClient;
use crate::error::BackendError;
use duty_roster::RosterState;
use duty_roster_domain::{Employee, Office};
use futures::future::join_all;
use tracing::{debug, warn};

/// Fetches employees by id, skipping any that fail.
pub async fn fetch_employees(client: &BackendClient, ids: &[i64]) -> Vec<Employee> {
    let results: Vec<Result<Employee, BackendError>> =
        join_all(ids.iter().map(|id| client.user(*id))).await;

    ids.iter()
        .zip(results)
        .filter_map(|(id, result)| match result {
            Ok(employee) => Some(employee),
            Err(err) => {
                warn!(user_id = id, error = %err, "Failed to fetch employee");
                None
            }
        })
        .collect()
}

/// Fetches offices by id, skipping any that fail.
pub async fn fetch_offices(client: &BackendClient, ids: &[i64]) -> Vec<Office> {
    let results: Vec<Result<Office, BackendError>> =
        join_all(ids.iter().map(|id| client.office(*id))).await;

    ids.iter()
        .zip(results)
        .filter_map(|(id, result)| match result {
            Ok(office) => Some(office),
            Err(err) => {
                warn!(office_id = id, error = %err, "Failed to fetch office");
                None
            }
        })
        .collect()
}

/// Loads every employee and office the roster references but has not cached.
///
/// Employees are fetched first because their primary offices widen the set
/// of offices to load.
pub async fn enrich_roster(client: &BackendClient, state: &mut RosterState) {
    let employee_ids: Vec<i64> = state.missing_employee_ids();
    if !employee_ids.is_empty() {
        let employees: Vec<Employee> = fetch_employees(client, &employee_ids).await;
        debug!(requested = employee_ids.len(), fetched = employees.len(), "Employees cached");
        state.cache_employees(employees);
    }

    let office_ids: Vec<i64> = state.missing_office_ids();
    if !office_ids.is_empty() {
        let offices: Vec<Office> = fetch_offices(client, &office_ids).await;
        debug!(requested = office_ids.len(), fetched = offices.len(), "Offices cached");
        state.cache_offices(offices);
    }
}
