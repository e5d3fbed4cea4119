//! The pipeline orchestrator: per-run state plus the caller-facing surface,
//! one operation per stage.
//!
//! Backend and feedback store are injected at construction; no stage call
//! commits run state until it resolves, so an abandoned call can at worst
//! duplicate backend cost, never corrupt a working set.

use crate::{
    FormatStage, PipelineConfig, PipelineRun, ReworkOutcome, ReworkStage, ScriptStage,
    StructuredGenerator, WorkingSet,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument};
use vasari_core::{Brief, Disposition, Format, FormatId, RunId, ScriptBatch, TrendItem};
use vasari_error::{PipelineError, PipelineErrorKind, VasariResult};
use vasari_interface::{FeedbackStore, TextGenerator};

/// What brief submission hands back to the caller.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct RunSummary {
    /// The freshly created run
    run_id: RunId,
    /// The initial candidate batch, in caller-visible order
    formats: Vec<Format>,
}

/// Sequences the stages and owns per-run state.
///
/// Runs stay mutable indefinitely; there is no terminal state. Stage calls
/// for different formats may be in flight concurrently — the orchestrator
/// snapshots inputs, awaits the stage without holding the state lock, and
/// commits last-write-wins.
#[derive(Clone)]
pub struct Orchestrator {
    formats: FormatStage,
    rework: ReworkStage,
    scripts: ScriptStage,
    runs: Arc<RwLock<HashMap<RunId, PipelineRun>>>,
}

impl Orchestrator {
    /// Creates an orchestrator over injected collaborators.
    pub fn new(
        backend: Arc<dyn TextGenerator>,
        store: Arc<dyn FeedbackStore>,
        config: PipelineConfig,
    ) -> Self {
        let generator = StructuredGenerator::new(backend);
        Self {
            formats: FormatStage::new(generator.clone(), config.clone()),
            rework: ReworkStage::new(generator.clone(), store, config.clone()),
            scripts: ScriptStage::new(generator, config),
            runs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Starts a new run: generates the initial six formats for the brief.
    ///
    /// The run is created only once generation succeeds; a failed submission
    /// leaves no trace.
    #[instrument(skip_all, fields(topic = %brief.topic()))]
    pub async fn submit_brief(
        &self,
        brief: Brief,
        trends: Vec<TrendItem>,
    ) -> VasariResult<RunSummary> {
        let run_id = RunId::generate();
        let formats = self.formats.generate_formats(&brief, &trends).await?;
        let working_set = WorkingSet::from_batch(formats.clone())?;

        let run = PipelineRun::new(run_id.clone(), brief, working_set);
        self.runs.write().await.insert(run_id.clone(), run);

        info!(run_id = %run_id, count = formats.len(), "Run created");
        Ok(RunSummary { run_id, formats })
    }

    /// Rejects a format: records feedback, generates two replacements, and
    /// splices them into the rejected format's position.
    ///
    /// Rejection is valid from either disposition. An approved format does
    /// not need to be unlocked first; rejecting it removes the record and
    /// leaves any generated scripts behind as orphans.
    #[instrument(skip(self, reason), fields(run_id = %run_id, format_id = %format_id))]
    pub async fn reject_format(
        &self,
        run_id: &RunId,
        format_id: &FormatId,
        reason: &str,
    ) -> VasariResult<ReworkOutcome> {
        // Snapshot inputs without holding the lock across the backend call.
        let (brief, rejected) = {
            let runs = self.runs.read().await;
            let run = Self::require_run(&runs, run_id)?;
            let slot = run.working_set().get(format_id).ok_or_else(|| {
                PipelineError::new(PipelineErrorKind::UnknownFormat(format_id.to_string()))
            })?;
            (run.brief().clone(), slot.format().clone())
        };

        let outcome = self.rework.rework(run_id, &brief, &rejected, reason).await?;

        let mut runs = self.runs.write().await;
        let run = Self::require_run_mut(&mut runs, run_id)?;
        run.working_set_mut()
            .replace(format_id, outcome.replacements().clone())?;
        Ok(outcome)
    }

    /// Approves a pending format for script generation.
    pub async fn approve_format(&self, run_id: &RunId, format_id: &FormatId) -> VasariResult<()> {
        let mut runs = self.runs.write().await;
        let run = Self::require_run_mut(&mut runs, run_id)?;
        run.working_set_mut().approve(format_id)
    }

    /// Unlocks an approved format back to pending. Previously generated
    /// scripts are kept.
    pub async fn unlock_format(&self, run_id: &RunId, format_id: &FormatId) -> VasariResult<()> {
        let mut runs = self.runs.write().await;
        let run = Self::require_run_mut(&mut runs, run_id)?;
        run.working_set_mut().unlock(format_id)
    }

    /// Generates scripts for an approved format, replacing any prior set.
    #[instrument(skip(self), fields(run_id = %run_id, format_id = %format_id))]
    pub async fn generate_scripts(
        &self,
        run_id: &RunId,
        format_id: &FormatId,
    ) -> VasariResult<ScriptBatch> {
        let (brief, format) = {
            let runs = self.runs.read().await;
            let run = Self::require_run(&runs, run_id)?;
            let slot = run.working_set().get(format_id).ok_or_else(|| {
                PipelineError::new(PipelineErrorKind::UnknownFormat(format_id.to_string()))
            })?;
            if *slot.disposition() != Disposition::Approved {
                return Err(PipelineError::new(PipelineErrorKind::NotApproved(
                    format_id.to_string(),
                ))
                .into());
            }
            (run.brief().clone(), slot.format().clone())
        };

        let batch = self.scripts.generate_scripts(&brief, &format).await?;

        let mut runs = self.runs.write().await;
        let run = Self::require_run_mut(&mut runs, run_id)?;
        run.put_scripts(format_id.clone(), batch.scripts.clone());
        Ok(batch)
    }

    /// The working set of a run, in caller-visible order.
    pub async fn working_set(
        &self,
        run_id: &RunId,
    ) -> VasariResult<Vec<(Format, Disposition)>> {
        let runs = self.runs.read().await;
        let run = Self::require_run(&runs, run_id)?;
        Ok(run
            .working_set()
            .iter()
            .map(|slot| (slot.format().clone(), *slot.disposition()))
            .collect())
    }

    /// The stored script set for a format id, orphaned or not.
    pub async fn scripts_for(
        &self,
        run_id: &RunId,
        format_id: &FormatId,
    ) -> VasariResult<Vec<vasari_core::Script>> {
        let runs = self.runs.read().await;
        let run = Self::require_run(&runs, run_id)?;
        Ok(run.scripts_for(format_id).to_vec())
    }

    /// Script sets no longer reachable through the working set.
    pub async fn orphaned_scripts(
        &self,
        run_id: &RunId,
    ) -> VasariResult<Vec<(FormatId, Vec<vasari_core::Script>)>> {
        let runs = self.runs.read().await;
        let run = Self::require_run(&runs, run_id)?;
        Ok(run
            .orphaned_scripts()
            .map(|(id, scripts)| (id.clone(), scripts.to_vec()))
            .collect())
    }

    fn require_run<'a>(
        runs: &'a HashMap<RunId, PipelineRun>,
        run_id: &RunId,
    ) -> VasariResult<&'a PipelineRun> {
        runs.get(run_id).ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::UnknownRun(run_id.to_string())).into()
        })
    }

    fn require_run_mut<'a>(
        runs: &'a mut HashMap<RunId, PipelineRun>,
        run_id: &RunId,
    ) -> VasariResult<&'a mut PipelineRun> {
        runs.get_mut(run_id).ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::UnknownRun(run_id.to_string())).into()
        })
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator").finish_non_exhaustive()
    }
}
