// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::push_opt;
use crate::client::BackendClient;
use crate::data_models::{
    AuditLogRecord, DashboardOfficeRecord, ExportPreview, ListResponse, Paginated, SmsLogRecord,
};
use crate::error::BackendError;
use duty_roster_domain::format_iso_date;
use reqwest::Method;
use serde::Deserialize;
use time::Date;

/// Filters for `GET auditlogs/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuditLogQuery {
    pub page: Option<u32>,
    pub search: Option<String>,
    /// One of `CREATE`, `UPDATE`, `DELETE`, `LOGIN`, `LOGOUT`.
    pub action: Option<String>,
    pub entity_type: Option<String>,
}

/// Filters for `GET notifications/sms-logs/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SmsLogQuery {
    pub page: Option<u32>,
    pub search: Option<String>,
}

/// Whether an export covers the whole chart or a date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    #[default]
    Full,
    Range,
}

impl ExportScope {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Range => "range",
        }
    }
}

/// File formats the backend renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Excel,
    Pdf,
    Docx,
}

impl ExportFormat {
    /// The `export_format` query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excel => "excel",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    /// File extension of the rendered file.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Excel => "xlsx",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    /// MIME type of the rendered file.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Parameters of the chart export preview and download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportQuery {
    pub chart_id: i64,
    pub scope: ExportScope,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ExportQuery {
    fn to_query(self) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> = vec![
            ("chart_id", self.chart_id.to_string()),
            ("scope", self.scope.as_str().to_string()),
        ];
        push_opt(&mut query, "start_date", self.start_date.map(format_iso_date));
        push_opt(&mut query, "end_date", self.end_date.map(format_iso_date));
        push_opt(&mut query, "page", self.page);
        push_opt(&mut query, "page_size", self.page_size);
        query
    }
}

impl BackendClient {
    /// Fetches a page of the backend audit log.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn audit_logs(&self, filter: &AuditLogQuery) -> Result<Paginated<AuditLogRecord>, BackendError> {
        let mut query: Vec<(&'static str, String)> = Vec::new();
        push_opt(&mut query, "page", filter.page);
        push_opt(&mut query, "search", filter.search.as_deref());
        push_opt(&mut query, "action", filter.action.as_deref());
        push_opt(&mut query, "entity_type", filter.entity_type.as_deref());
        self.get_json("auditlogs/", &query).await
    }

    /// Fetches a page of outgoing SMS notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn sms_logs(&self, filter: &SmsLogQuery) -> Result<Paginated<SmsLogRecord>, BackendError> {
        let mut query: Vec<(&'static str, String)> = Vec::new();
        push_opt(&mut query, "page", filter.page);
        push_opt(&mut query, "search", filter.search.as_deref());
        self.get_json("notifications/sms-logs/", &query).await
    }

    /// Lists the signed-in user's dashboard offices.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn dashboard_offices(&self) -> Result<Vec<DashboardOfficeRecord>, BackendError> {
        let records: ListResponse<DashboardOfficeRecord> =
            self.get_json("user-dashboard-offices/", &[]).await?;
        Ok(records.into_vec())
    }

    /// Fetches one page of the tabular chart export.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn export_preview(&self, export: ExportQuery) -> Result<ExportPreview, BackendError> {
        self.get_json("export/duty-chart/preview/", &export.to_query())
            .await
    }

    /// Downloads the chart export rendered by the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn export_download(
        &self,
        export: ExportQuery,
        format: ExportFormat,
    ) -> Result<Vec<u8>, BackendError> {
        let mut query: Vec<(&'static str, String)> = export.to_query();
        query.retain(|(key, _)| *key != "page" && *key != "page_size");
        query.push(("export_format", format.as_str().to_string()));
        self.execute(Method::GET, "export/duty-chart/download/", &query, None)
            .await
    }
}
