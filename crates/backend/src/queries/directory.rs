// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::push_opt;
use crate::client::BackendClient;
use crate::data_models::{AuthUserRecord, ListResponse, OfficeRecord, UserRecord};
use crate::error::BackendError;
use duty_roster_domain::{Employee, Office};

const USER_PAGE_SIZE: u32 = 100;

impl BackendClient {
    /// Fetches the signed-in user with role, offices and permission slugs.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. A rejected token is reported as
    /// `BackendError::Status` with status 401; no refresh is attempted.
    pub async fn current_user(&self) -> Result<AuthUserRecord, BackendError> {
        self.get_json("auth/me/", &[]).await
    }

    /// Fetches one employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn user(&self, user_id: i64) -> Result<Employee, BackendError> {
        let record: UserRecord = self.get_json(&format!("users/{user_id}/"), &[]).await?;
        Ok(record.into())
    }

    /// Lists employees, optionally for one office and activation state.
    ///
    /// Accepts both paginated and bare-array responses.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn users(
        &self,
        office_id: Option<i64>,
        is_activated: Option<bool>,
    ) -> Result<Vec<Employee>, BackendError> {
        let mut query: Vec<(&'static str, String)> =
            vec![("page_size", USER_PAGE_SIZE.to_string())];
        push_opt(&mut query, "office", office_id);
        push_opt(&mut query, "is_activated", is_activated);
        let records: ListResponse<UserRecord> = self.get_json("users/", &query).await?;
        Ok(records.into_vec().into_iter().map(Employee::from).collect())
    }

    /// Fetches one office.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn office(&self, office_id: i64) -> Result<Office, BackendError> {
        let record: OfficeRecord = self.get_json(&format!("offices/{office_id}/"), &[]).await?;
        Ok(record.into())
    }

    /// Lists every office.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn offices(&self) -> Result<Vec<Office>, BackendError> {
        let records: ListResponse<OfficeRecord> = self.get_json("offices/", &[]).await?;
        Ok(records.into_vec().into_iter().map(Office::from).collect())
    }
}
