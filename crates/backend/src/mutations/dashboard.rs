// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::client::BackendClient;
use crate::data_models::{DashboardOfficeRecord, DashboardOrder};
use crate::error::BackendError;
use reqwest::Method;
use serde::Serialize;

#[derive(Serialize)]
struct AddOffice {
    office: i64,
}

#[derive(Serialize)]
struct Reorder<'a> {
    orders: &'a [DashboardOrder],
}

impl BackendClient {
    /// Pins an office to the signed-in user's dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn add_dashboard_office(&self, office_id: i64) -> Result<DashboardOfficeRecord, BackendError> {
        self.send_json(
            Method::POST,
            "user-dashboard-offices/",
            &AddOffice { office: office_id },
        )
        .await
    }

    /// Unpins a dashboard office entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn remove_dashboard_office(&self, entry_id: i64) -> Result<(), BackendError> {
        self.delete(&format!("user-dashboard-offices/{entry_id}/"))
            .await
    }

    /// Stores a new dashboard order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn reorder_dashboard_offices(&self, orders: &[DashboardOrder]) -> Result<(), BackendError> {
        let body: serde_json::Value = serde_json::to_value(Reorder { orders })?;
        self.execute(
            Method::POST,
            "user-dashboard-offices/reorder/",
            &[],
            Some(&body),
        )
        .await?;
        Ok(())
    }
}
