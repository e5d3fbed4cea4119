//! In-memory feedback store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use vasari_core::{FeedbackEntry, RunId};
use vasari_error::VasariResult;
use vasari_interface::FeedbackStore;

/// In-memory, per-process feedback log.
///
/// Entries are kept in append order per run; `query_recent` returns the most
/// recent first. Cloning shares the underlying log.
#[derive(Debug, Clone, Default)]
pub struct MemoryFeedbackStore {
    entries: Arc<RwLock<HashMap<RunId, Vec<FeedbackEntry>>>>,
}

impl MemoryFeedbackStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries for a run.
    pub async fn len(&self, run_id: &RunId) -> usize {
        self.entries
            .read()
            .await
            .get(run_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Whether the run has no entries.
    pub async fn is_empty(&self, run_id: &RunId) -> bool {
        self.len(run_id).await == 0
    }
}

#[async_trait]
impl FeedbackStore for MemoryFeedbackStore {
    async fn append(&self, entry: &FeedbackEntry) -> VasariResult<()> {
        let mut entries = self.entries.write().await;
        let log = entries.entry(entry.run_id().clone()).or_default();
        log.push(entry.clone());
        debug!(
            run_id = %entry.run_id(),
            format_id = %entry.format_id(),
            total = log.len(),
            "Appended feedback entry"
        );
        Ok(())
    }

    async fn query_recent(&self, run_id: &RunId, limit: usize) -> VasariResult<Vec<FeedbackEntry>> {
        let entries = self.entries.read().await;
        let recent = entries
            .get(run_id)
            .map(|log| log.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default();
        Ok(recent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vasari_core::{
        Brief, CampaignObjective, ContentGoal, CreatorType, Deliverable, Format, Platform,
    };

    fn test_brief() -> Brief {
        Brief::builder()
            .topic("test")
            .industry("beauty")
            .platform(Platform::Instagram)
            .content_goal(ContentGoal::Organic)
            .campaign_objective(CampaignObjective::Engagement)
            .target_audience("everyone")
            .tone_of_voice(vec!["diretto".to_string()])
            .creator_type(CreatorType::UgcCreator)
            .deliverables([Deliverable::Reel])
            .call_to_action("Salva")
            .build()
            .unwrap()
    }

    fn test_format(id: &str) -> Format {
        Format {
            id: id.into(),
            title: format!("title {id}"),
            description: "desc".to_string(),
            goal: "engagement".to_string(),
            trends: vec![],
            why_this_works: vec![],
        }
    }

    #[tokio::test]
    async fn query_recent_is_most_recent_first_and_bounded() {
        let store = MemoryFeedbackStore::new();
        let run_id = RunId::generate();

        for i in 1..=15 {
            let entry = FeedbackEntry::reject(
                run_id.clone(),
                format!("reason {i}"),
                test_brief(),
                test_format(&format!("fmt-{:03}", i)),
            );
            store.append(&entry).await.unwrap();
        }

        let recent = store.query_recent(&run_id, 12).await.unwrap();
        assert_eq!(recent.len(), 12);
        assert_eq!(recent[0].reason(), "reason 15");
        assert_eq!(recent[11].reason(), "reason 4");
    }

    #[tokio::test]
    async fn unknown_run_yields_empty() {
        let store = MemoryFeedbackStore::new();
        let recent = store.query_recent(&RunId::generate(), 12).await.unwrap();
        assert!(recent.is_empty());
    }
}
