//! Per-run pipeline state: the format working set and script sets.

use std::collections::HashMap;
use tracing::debug;
use vasari_core::{Brief, Disposition, Format, FormatId, RunId, Script};
use vasari_error::{PipelineError, PipelineErrorKind, VasariResult};

/// One slot of the working set: a format plus its caller-assigned
/// disposition.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct FormatSlot {
    /// The candidate format
    format: Format,
    /// Pending or approved; rejected records are removed, never flagged
    disposition: Disposition,
}

impl FormatSlot {
    fn pending(format: Format) -> Self {
        Self {
            format,
            disposition: Disposition::Pending,
        }
    }
}

/// Insertion-order-preserving association from format id to format.
///
/// [`WorkingSet::replace`] is the only mutator that changes membership after
/// the initial batch: rejection splices replacements into the rejected
/// format's position, keeping surrounding order intact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingSet {
    slots: Vec<FormatSlot>,
}

impl WorkingSet {
    /// Builds the working set from an initial batch.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateFormat` if two formats share an id.
    pub fn from_batch(formats: Vec<Format>) -> VasariResult<Self> {
        let mut set = Self::default();
        for format in formats {
            set.ensure_absent(&format.id)?;
            set.slots.push(FormatSlot::pending(format));
        }
        Ok(set)
    }

    fn ensure_absent(&self, id: &FormatId) -> VasariResult<()> {
        if self.position(id).is_some() {
            return Err(
                PipelineError::new(PipelineErrorKind::DuplicateFormat(id.to_string())).into(),
            );
        }
        Ok(())
    }

    fn position(&self, id: &FormatId) -> Option<usize> {
        self.slots.iter().position(|slot| &slot.format.id == id)
    }

    fn require(&self, id: &FormatId) -> VasariResult<usize> {
        self.position(id).ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::UnknownFormat(id.to_string())).into()
        })
    }

    /// The slot for `id`, if present.
    pub fn get(&self, id: &FormatId) -> Option<&FormatSlot> {
        self.position(id).map(|i| &self.slots[i])
    }

    /// Number of formats in the set.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in caller-visible order.
    pub fn iter(&self) -> impl Iterator<Item = &FormatSlot> {
        self.slots.iter()
    }

    /// Removes `old_id` and splices `replacements` into its position,
    /// preserving surrounding order. The replacements enter as pending.
    ///
    /// # Errors
    ///
    /// `UnknownFormat` if `old_id` is not in the set; `DuplicateFormat` if a
    /// replacement id collides with a remaining id or another replacement.
    pub fn replace(&mut self, old_id: &FormatId, replacements: Vec<Format>) -> VasariResult<()> {
        let index = self.require(old_id)?;

        // Validate before touching the set so a failed replace is a no-op.
        for (i, format) in replacements.iter().enumerate() {
            let collides_with_remaining =
                self.position(&format.id).is_some_and(|pos| pos != index);
            let collides_with_sibling = replacements[..i].iter().any(|f| f.id == format.id);
            if collides_with_remaining || collides_with_sibling {
                return Err(PipelineError::new(PipelineErrorKind::DuplicateFormat(
                    format.id.to_string(),
                ))
                .into());
            }
        }

        self.slots.remove(index);
        for (offset, format) in replacements.into_iter().enumerate() {
            self.slots
                .insert(index + offset, FormatSlot::pending(format));
        }

        debug!(
            old_id = %old_id,
            index,
            total = self.slots.len(),
            "Replaced format in working set"
        );
        Ok(())
    }

    /// Marks a pending format approved.
    ///
    /// # Errors
    ///
    /// `UnknownFormat` if `id` is not in the set.
    pub fn approve(&mut self, id: &FormatId) -> VasariResult<()> {
        let index = self.require(id)?;
        self.slots[index].disposition = Disposition::Approved;
        Ok(())
    }

    /// Unlocks an approved format back to pending for re-review.
    ///
    /// # Errors
    ///
    /// `UnknownFormat` if `id` is not in the set.
    pub fn unlock(&mut self, id: &FormatId) -> VasariResult<()> {
        let index = self.require(id)?;
        self.slots[index].disposition = Disposition::Pending;
        Ok(())
    }
}

/// All state owned by one pipeline run.
///
/// Script sets are keyed by format id and survive replacement of their
/// format: scripts of a replaced id become orphaned artifacts, retained for
/// display but no longer reachable through the working set.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct PipelineRun {
    /// Opaque run identifier
    run_id: RunId,
    /// The originating brief, immutable for the life of the run
    brief: Brief,
    /// Ordered working set of candidate formats
    working_set: WorkingSet,
    /// Script sets per format id, orphans included
    scripts: HashMap<FormatId, Vec<Script>>,
}

impl PipelineRun {
    /// Creates a run from a brief and its initial format batch.
    pub fn new(run_id: RunId, brief: Brief, working_set: WorkingSet) -> Self {
        Self {
            run_id,
            brief,
            working_set,
            scripts: HashMap::new(),
        }
    }

    /// Mutable access to the working set.
    pub fn working_set_mut(&mut self) -> &mut WorkingSet {
        &mut self.working_set
    }

    /// Replaces the script set for a format; regeneration never merges.
    pub fn put_scripts(&mut self, format_id: FormatId, scripts: Vec<Script>) {
        debug!(format_id = %format_id, count = scripts.len(), "Storing script set");
        self.scripts.insert(format_id, scripts);
    }

    /// Scripts generated for a format id, orphaned or not.
    pub fn scripts_for(&self, format_id: &FormatId) -> &[Script] {
        self.scripts
            .get(format_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Script sets whose format id is no longer in the working set.
    pub fn orphaned_scripts(&self) -> impl Iterator<Item = (&FormatId, &[Script])> {
        self.scripts
            .iter()
            .filter(|(id, _)| self.working_set.get(id).is_none())
            .map(|(id, scripts)| (id, scripts.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(id: &str) -> Format {
        Format {
            id: id.into(),
            title: format!("title {id}"),
            description: "desc".to_string(),
            goal: "engagement".to_string(),
            trends: vec![],
            why_this_works: vec![],
        }
    }

    fn batch() -> WorkingSet {
        WorkingSet::from_batch((1..=6).map(|i| fmt(&format!("fmt-{i:03}"))).collect()).unwrap()
    }

    #[test]
    fn duplicate_batch_id_is_rejected() {
        let result = WorkingSet::from_batch(vec![fmt("fmt-001"), fmt("fmt-001")]);
        assert!(result.is_err());
    }

    #[test]
    fn replace_splices_at_former_position() {
        let mut set = batch();
        set.replace(&"fmt-003".into(), vec![fmt("fmt-003a"), fmt("fmt-003b")])
            .unwrap();

        assert_eq!(set.len(), 7);
        let ids: Vec<&str> = set.iter().map(|s| s.format().id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["fmt-001", "fmt-002", "fmt-003a", "fmt-003b", "fmt-004", "fmt-005", "fmt-006"]
        );
        assert!(set.get(&"fmt-003".into()).is_none());
    }

    #[test]
    fn replacements_enter_pending() {
        let mut set = batch();
        set.approve(&"fmt-003".into()).unwrap();
        set.replace(&"fmt-003".into(), vec![fmt("fmt-003a"), fmt("fmt-003b")])
            .unwrap();
        let slot = set.get(&"fmt-003a".into()).unwrap();
        assert_eq!(*slot.disposition(), Disposition::Pending);
    }

    #[test]
    fn replace_unknown_id_fails() {
        let mut set = batch();
        let result = set.replace(&"fmt-009".into(), vec![fmt("fmt-009a")]);
        assert!(result.is_err());
        assert_eq!(set.len(), 6);
    }

    #[test]
    fn colliding_replacement_rolls_back() {
        let mut set = batch();
        let result = set.replace(&"fmt-003".into(), vec![fmt("fmt-004")]);
        assert!(result.is_err());
        // Original membership and order restored
        assert_eq!(set.len(), 6);
        assert!(set.get(&"fmt-003".into()).is_some());
        let ids: Vec<&str> = set.iter().map(|s| s.format().id.as_str()).collect();
        assert_eq!(ids[2], "fmt-003");
    }

    #[test]
    fn approve_then_unlock_round_trips() {
        let mut set = batch();
        let id: FormatId = "fmt-001".into();
        set.approve(&id).unwrap();
        assert_eq!(*set.get(&id).unwrap().disposition(), Disposition::Approved);
        set.unlock(&id).unwrap();
        assert_eq!(*set.get(&id).unwrap().disposition(), Disposition::Pending);
    }

    #[test]
    fn orphaned_scripts_are_retained() {
        let brief_scripts: Vec<Script> = vec![];
        let mut run = PipelineRun::new(RunId::generate(), test_brief(), batch());
        run.put_scripts("fmt-003".into(), brief_scripts);
        run.working_set_mut()
            .replace(&"fmt-003".into(), vec![fmt("fmt-003a"), fmt("fmt-003b")])
            .unwrap();

        let orphans: Vec<_> = run.orphaned_scripts().collect();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].0.as_str(), "fmt-003");
    }

    fn test_brief() -> Brief {
        use vasari_core::{CampaignObjective, ContentGoal, CreatorType, Deliverable, Platform};
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
}
