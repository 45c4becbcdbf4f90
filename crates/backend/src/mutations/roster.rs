// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::client::BackendClient;
use crate::data_models::{
    BulkUpsertResult, DutyChartPatch, DutyChartRecord, DutyChartWrite, DutyRecord, DutyWrite,
};
use crate::error::BackendError;
use duty_roster::Mutation;
use duty_roster_domain::{Duty, DutyChart, DutyChartDraft, DutyDraft};
use reqwest::Method;
use tracing::info;

/// What the backend returned for a performed [`Mutation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// A single duty was created.
    DutyCreated(Duty),
    /// Duties were created or updated in bulk.
    DutiesUpserted(BulkUpsertResult),
    /// A duty was deleted.
    DutyDeleted(i64),
    /// A chart was created or patched.
    ChartSaved(DutyChart),
    /// A chart was deleted.
    ChartDeleted(i64),
}

impl BackendClient {
    /// Creates one duty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the duty.
    pub async fn create_duty(&self, draft: &DutyDraft) -> Result<Duty, BackendError> {
        let record: DutyRecord = self
            .send_json(Method::POST, "duties/", &DutyWrite::from(draft))
            .await?;
        Duty::try_from(record)
    }

    /// Creates or updates one duty per draft in a single request.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the batch.
    pub async fn bulk_upsert_duties(&self, drafts: &[DutyDraft]) -> Result<BulkUpsertResult, BackendError> {
        let body: Vec<DutyWrite> = drafts.iter().map(DutyWrite::from).collect();
        self.send_json(Method::POST, "duties/bulk-upsert/", &body)
            .await
    }

    /// Deletes one duty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    pub async fn delete_duty(&self, duty_id: i64) -> Result<(), BackendError> {
        self.delete(&format!("duties/{duty_id}/")).await
    }

    /// Creates a chart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the chart.
    pub async fn create_duty_chart(&self, draft: &DutyChartDraft) -> Result<DutyChart, BackendError> {
        let record: DutyChartRecord = self
            .send_json(Method::POST, "duty-charts/", &DutyChartWrite::from(draft))
            .await?;
        DutyChart::try_from(record)
    }

    /// Patches a chart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change.
    pub async fn patch_duty_chart(
        &self,
        chart_id: i64,
        patch: &DutyChartPatch,
    ) -> Result<DutyChart, BackendError> {
        let record: DutyChartRecord = self
            .send_json(Method::PATCH, &format!("duty-charts/{chart_id}/"), patch)
            .await?;
        DutyChart::try_from(record)
    }

    /// Deletes a chart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses, e.g. while duties still reference it.
    pub async fn delete_duty_chart(&self, chart_id: i64) -> Result<(), BackendError> {
        self.delete(&format!("duty-charts/{chart_id}/")).await
    }

    /// Performs the backend write a core command produced.
    ///
    /// # Errors
    ///
    /// Returns the backend's error unchanged.
    pub async fn perform(&self, mutation: &Mutation) -> Result<MutationOutcome, BackendError> {
        let outcome: MutationOutcome = match mutation {
            Mutation::CreateDuty(draft) => MutationOutcome::DutyCreated(self.create_duty(draft).await?),
            Mutation::BulkUpsertDuties(drafts) => {
                MutationOutcome::DutiesUpserted(self.bulk_upsert_duties(drafts).await?)
            }
            Mutation::DeleteDuty { duty_id } => {
                self.delete_duty(*duty_id).await?;
                MutationOutcome::DutyDeleted(*duty_id)
            }
            Mutation::CreateDutyChart(draft) => {
                MutationOutcome::ChartSaved(self.create_duty_chart(draft).await?)
            }
            Mutation::UpdateDutyChart {
                chart_id,
                name,
                schedule_ids,
            } => {
                let patch: DutyChartPatch = DutyChartPatch {
                    name: name.clone(),
                    schedules: schedule_ids.clone(),
                };
                MutationOutcome::ChartSaved(self.patch_duty_chart(*chart_id, &patch).await?)
            }
            Mutation::DeleteDutyChart { chart_id } => {
                self.delete_duty_chart(*chart_id).await?;
                MutationOutcome::ChartDeleted(*chart_id)
            }
        };
        info!(?outcome, "Backend mutation applied");
        Ok(outcome)
    }
}
