//! PostgREST-style feedback store.
//!
//! Talks to a `format_feedback` table exposed over a PostgREST endpoint
//! (Supabase convention: `apikey` + bearer headers, `/rest/v1/<table>`
//! routes, query-string filters).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use vasari_core::{Brief, Decision, FeedbackEntry, Format, FormatId, RunId};
use vasari_error::{StorageError, StorageErrorKind, VasariResult};
use vasari_interface::FeedbackStore;

const TABLE: &str = "format_feedback";

/// One row of the `format_feedback` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FeedbackRow {
    pipeline_run_id: String,
    format_id: String,
    decision: Decision,
    reason: String,
    brief_payload: Brief,
    format_payload: Format,
    created_at: DateTime<Utc>,
}

impl From<&FeedbackEntry> for FeedbackRow {
    fn from(entry: &FeedbackEntry) -> Self {
        Self {
            pipeline_run_id: entry.run_id().to_string(),
            format_id: entry.format_id().to_string(),
            decision: *entry.decision(),
            reason: entry.reason().clone(),
            brief_payload: entry.brief_snapshot().clone(),
            format_payload: entry.format_snapshot().clone(),
            created_at: *entry.created_at(),
        }
    }
}

impl From<FeedbackRow> for FeedbackEntry {
    fn from(row: FeedbackRow) -> Self {
        FeedbackEntry::from_parts(
            RunId::from(row.pipeline_run_id),
            FormatId::from(row.format_id),
            row.decision,
            row.reason,
            row.brief_payload,
            row.format_payload,
            row.created_at,
        )
    }
}

/// Feedback store backed by a PostgREST table endpoint.
#[derive(Debug, Clone)]
pub struct RestFeedbackStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl RestFeedbackStore {
    /// Creates a new store.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Project base URL (without `/rest/v1`)
    /// * `service_key` - Service-role key used for both auth headers
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        debug!(base_url = %base_url, "Creating REST feedback store");
        Self {
            client: reqwest::Client::new(),
            base_url,
            service_key: service_key.into(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TABLE)
    }
}

#[async_trait]
impl FeedbackStore for RestFeedbackStore {
    #[instrument(skip(self, entry), fields(run_id = %entry.run_id(), format_id = %entry.format_id()))]
    async fn append(&self, entry: &FeedbackEntry) -> VasariResult<()> {
        let row = FeedbackRow::from(entry);
        let response = self
            .client
            .post(self.table_url())
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&row)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Feedback append request failed");
                StorageError::new(StorageErrorKind::Unavailable(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Feedback append rejected");
            return Err(StorageError::new(StorageErrorKind::AppendFailed(format!(
                "{}: {}",
                status, body
            )))
            .into());
        }

        debug!("Appended feedback entry");
        Ok(())
    }

    #[instrument(skip(self), fields(run_id = %run_id, limit))]
    async fn query_recent(&self, run_id: &RunId, limit: usize) -> VasariResult<Vec<FeedbackEntry>> {
        let response = self
            .client
            .get(self.table_url())
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .query(&[
                ("pipeline_run_id", format!("eq.{}", run_id)),
                ("order", "created_at.desc".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Feedback query request failed");
                StorageError::new(StorageErrorKind::Unavailable(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Feedback query rejected");
            return Err(StorageError::new(StorageErrorKind::QueryFailed(format!(
                "{}: {}",
                status, body
            )))
            .into());
        }

        let rows: Vec<FeedbackRow> = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse feedback rows");
            StorageError::new(StorageErrorKind::InvalidRecord(e.to_string()))
        })?;

        debug!(count = rows.len(), "Fetched recent feedback");
        Ok(rows.into_iter().map(FeedbackEntry::from).collect())
    }
}
