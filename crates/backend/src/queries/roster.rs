// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::push_opt;
use crate::client::BackendClient;
use crate::data_models::{DutyChartRecord, DutyRecord, ListResponse, ScheduleRecord};
use crate::error::BackendError;
use duty_roster_domain::{Duty, DutyChart, Schedule, format_iso_date};
use time::Date;
use tracing::debug;

/// Filters accepted by `GET duties/`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DutyFilter {
    /// Only duties of this employee.
    pub user: Option<i64>,
    /// Only duties performed for this office.
    pub office: Option<i64>,
    /// Only duties of this chart.
    pub duty_chart: Option<i64>,
    /// Only duties of this schedule.
    pub schedule: Option<i64>,
    /// Only duties on this day.
    pub date: Option<Date>,
}

impl DutyFilter {
    /// Filter for every duty of one chart.
    #[must_use]
    pub fn for_chart(chart_id: i64) -> Self {
        Self {
            duty_chart: Some(chart_id),
            ..Self::default()
        }
    }

    fn to_query(self) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> = Vec::new();
        push_opt(&mut query, "user", self.user);
        push_opt(&mut query, "office", self.office);
        push_opt(&mut query, "duty_chart", self.duty_chart);
        push_opt(&mut query, "schedule", self.schedule);
        push_opt(&mut query, "date", self.date.map(format_iso_date));
        query
    }
}

impl BackendClient {
    /// Lists duties matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or a record cannot be converted.
    pub async fn duties(&self, filter: DutyFilter) -> Result<Vec<Duty>, BackendError> {
        let records: ListResponse<DutyRecord> = self.get_json("duties/", &filter.to_query()).await?;
        let duties: Vec<Duty> = records
            .into_vec()
            .into_iter()
            .map(Duty::try_from)
            .collect::<Result<_, _>>()?;
        debug!(count = duties.len(), ?filter, "Fetched duties");
        Ok(duties)
    }

    /// Fetches one duty.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the record cannot be converted.
    pub async fn duty(&self, duty_id: i64) -> Result<Duty, BackendError> {
        let record: DutyRecord = self.get_json(&format!("duties/{duty_id}/"), &[]).await?;
        Duty::try_from(record)
    }

    /// Lists chart records, optionally for one office.
    ///
    /// Records keep the denormalized office, department and directorate names
    /// used by chart pickers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn duty_charts(&self, office_id: Option<i64>) -> Result<Vec<DutyChartRecord>, BackendError> {
        let mut query: Vec<(&'static str, String)> = Vec::new();
        push_opt(&mut query, "office", office_id);
        let records: ListResponse<DutyChartRecord> = self.get_json("duty-charts/", &query).await?;
        Ok(records.into_vec())
    }

    /// Fetches one chart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the record cannot be converted.
    pub async fn duty_chart(&self, chart_id: i64) -> Result<DutyChart, BackendError> {
        let record: DutyChartRecord = self
            .get_json(&format!("duty-charts/{chart_id}/"), &[])
            .await?;
        DutyChart::try_from(record)
    }

    /// Lists schedules, optionally narrowed to an office and/or chart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or a record cannot be converted.
    pub async fn schedules(
        &self,
        office_id: Option<i64>,
        chart_id: Option<i64>,
    ) -> Result<Vec<Schedule>, BackendError> {
        let mut query: Vec<(&'static str, String)> = Vec::new();
        push_opt(&mut query, "office", office_id);
        push_opt(&mut query, "duty_chart", chart_id);
        let records: ListResponse<ScheduleRecord> = self.get_json("schedule/", &query).await?;
        records
            .into_vec()
            .into_iter()
            .map(Schedule::try_from)
            .collect()
    }
}
