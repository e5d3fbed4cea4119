//! End-to-end pipeline tests over a scripted backend and an in-memory
//! feedback store.

use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use vasari_core::{
    Brief, CampaignObjective, ContentGoal, CreatorType, Deliverable, Disposition, FormatId,
    GenerateRequest, GenerateResponse, Platform,
};
use vasari_error::{
    GenerationError, GenerationErrorKind, PipelineErrorKind, StorageError, StorageErrorKind,
    VasariErrorKind, VasariResult,
};
use vasari_interface::{FeedbackStore, TextGenerator};
use vasari_pipeline::{DEFAULT_REWORK_REASON, Orchestrator, PipelineConfig};
use vasari_storage::MemoryFeedbackStore;

/// Replays queued responses in order and records every request it saw.
#[derive(Default)]
struct ScriptedBackend {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedBackend {
    fn push(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(text.into());
    }

    fn request(&self, index: usize) -> GenerateRequest {
        self.requests.lock().unwrap()[index].clone()
    }

    fn request_text(&self, index: usize) -> String {
        self.request(index)
            .messages
            .iter()
            .map(|m| m.content.clone())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl TextGenerator for ScriptedBackend {
    async fn generate(&self, req: &GenerateRequest) -> VasariResult<GenerateResponse> {
        self.requests.lock().unwrap().push(req.clone());
        let text = self.responses.lock().unwrap().pop_front().ok_or_else(|| {
            GenerationError::new(GenerationErrorKind::BackendUnavailable {
                status: None,
                message: "no scripted response left".to_string(),
            })
        })?;
        Ok(GenerateResponse { text })
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-test"
    }
}

/// Feedback store where every operation faults.
#[derive(Debug, Default)]
struct FailingStore;

#[async_trait]
impl FeedbackStore for FailingStore {
    async fn append(&self, _entry: &vasari_core::FeedbackEntry) -> VasariResult<()> {
        Err(StorageError::new(StorageErrorKind::AppendFailed("down".to_string())).into())
    }

    async fn query_recent(
        &self,
        _run_id: &vasari_core::RunId,
        _limit: usize,
    ) -> VasariResult<Vec<vasari_core::FeedbackEntry>> {
        Err(StorageError::new(StorageErrorKind::QueryFailed("down".to_string())).into())
    }
}

fn brief(topic: &str) -> Brief {
    Brief::builder()
        .topic(topic)
        .industry("beauty")
        .platform(Platform::Instagram)
        .content_goal(ContentGoal::Organic)
        .campaign_objective(CampaignObjective::Engagement)
        .target_audience("donne 25-40 attente alla pelle")
        .tone_of_voice(vec!["diretto".to_string(), "caldo".to_string()])
        .creator_type(CreatorType::UgcCreator)
        .deliverables([Deliverable::Reel])
        .call_to_action("Salva il post")
        .build()
        .unwrap()
}

fn formats_json() -> String {
    let formats: Vec<_> = (1..=6)
        .map(|i| {
            json!({
                "id": format!("fmt-{i:03}"),
                "title": format!("Concept {i}"),
                "description": "Una scena quotidiana con twist finale.",
                "goal": "engagement",
                "trends": ["POV confession"],
            })
        })
        .collect();
    json!({ "formats": formats }).to_string()
}

fn rework_json(rejected: &str) -> String {
    let replacement = |suffix: &str| {
        json!({
            "id": format!("{rejected}{suffix}"),
            "title": format!("Alternativa {suffix}"),
            "description": "Hook più diretto nei primi due secondi.",
            "goal": "engagement",
            "trends": ["3-step tutorial"],
            "why_this_works": ["hook più forte", "CTA più chiara"],
        })
    };
    json!({
        "assistant_message": "Ecco due alternative più in target.",
        "replacements": [replacement("a"), replacement("b")],
    })
    .to_string()
}

fn scripts_json(format_id: &str, title: &str) -> String {
    json!({
        "scripts": [{
            "format_id": format_id,
            "script_title": title,
            "duration_seconds": 30,
            "scene_by_scene": [{
                "t": "0-3s",
                "visual": "primo piano in bagno",
                "on_screen_text": "lo sapevi?",
                "spoken_line": "Lo sapevi che la tua routine ti sta rovinando la pelle?",
                "camera_notes": "handheld, luce naturale"
            }],
            "caption": {
                "text": "La verità sulla skincare sostenibile.",
                "hashtags": ["#skincare", "#sostenibile"]
            },
            "cta": {"type": "save", "line": "Salva il post per dopo"},
            "creator_playbook": {
                "delivery_style": "parlato diretto in camera",
                "energy": "medium",
                "dos": ["sorridi all'inizio"],
                "donts": ["non leggere dallo schermo"],
                "editing_notes": "cut rapidi tra le scene"
            }
        }],
        "export_notes": {
            "how_to_use": "Copia scene-by-scene in un documento per il creator.",
            "assumptions": []
        }
    })
    .to_string()
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init()
        .ok();
}

fn fixture(config: PipelineConfig) -> (Arc<ScriptedBackend>, MemoryFeedbackStore, Orchestrator) {
    init_tracing();
    let backend = Arc::new(ScriptedBackend::default());
    let store = MemoryFeedbackStore::new();
    let orchestrator = Orchestrator::new(backend.clone(), Arc::new(store.clone()), config);
    (backend, store, orchestrator)
}

#[tokio::test]
async fn submitting_a_brief_yields_six_pending_formats() {
    let (backend, _store, orchestrator) = fixture(PipelineConfig::default());
    backend.push(formats_json());

    let summary = orchestrator
        .submit_brief(brief("skincare sostenibile"), vec![])
        .await
        .unwrap();

    assert_eq!(summary.formats().len(), 6);
    let working = orchestrator.working_set(summary.run_id()).await.unwrap();
    let ids: Vec<&str> = working.iter().map(|(f, _)| f.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["fmt-001", "fmt-002", "fmt-003", "fmt-004", "fmt-005", "fmt-006"]
    );
    assert!(working.iter().all(|(_, d)| *d == Disposition::Pending));
}

#[tokio::test]
async fn rejection_splices_two_replacements_at_the_former_position() {
    let (backend, store, orchestrator) = fixture(PipelineConfig::default());
    backend.push(formats_json());
    backend.push(rework_json("fmt-003"));

    let summary = orchestrator
        .submit_brief(brief("skincare sostenibile"), vec![])
        .await
        .unwrap();
    let outcome = orchestrator
        .reject_format(summary.run_id(), &"fmt-003".into(), "hook troppo debole")
        .await
        .unwrap();

    assert_eq!(outcome.replacements().len(), 2);
    assert_eq!(
        outcome.assistant_message().as_deref(),
        Some("Ecco due alternative più in target.")
    );

    let working = orchestrator.working_set(summary.run_id()).await.unwrap();
    let ids: Vec<&str> = working.iter().map(|(f, _)| f.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["fmt-001", "fmt-002", "fmt-003a", "fmt-003b", "fmt-004", "fmt-005", "fmt-006"]
    );
    assert_eq!(store.len(summary.run_id()).await, 1);
}

#[tokio::test]
async fn blank_rejection_reason_falls_back_to_the_default() {
    let (backend, store, orchestrator) = fixture(PipelineConfig::default());
    backend.push(formats_json());
    backend.push(rework_json("fmt-001"));

    let summary = orchestrator
        .submit_brief(brief("skincare sostenibile"), vec![])
        .await
        .unwrap();
    orchestrator
        .reject_format(summary.run_id(), &"fmt-001".into(), "   ")
        .await
        .unwrap();

    let entries = store.query_recent(summary.run_id(), 1).await.unwrap();
    assert_eq!(entries[0].reason(), DEFAULT_REWORK_REASON);
}

#[tokio::test]
async fn scripts_are_refused_for_unapproved_formats() {
    let (backend, _store, orchestrator) = fixture(PipelineConfig::default());
    backend.push(formats_json());

    let summary = orchestrator
        .submit_brief(brief("skincare sostenibile"), vec![])
        .await
        .unwrap();
    let err = orchestrator
        .generate_scripts(summary.run_id(), &"fmt-002".into())
        .await
        .unwrap_err();

    match err.kind() {
        VasariErrorKind::Pipeline(p) => {
            assert!(matches!(p.kind, PipelineErrorKind::NotApproved(_)))
        }
        other => panic!("expected pipeline error, got {other}"),
    }
}

#[tokio::test]
async fn approved_format_yields_scripts_with_the_requested_id() {
    let (backend, _store, orchestrator) = fixture(PipelineConfig::default());
    backend.push(formats_json());
    // Echoes a wrong id on purpose; the stage must pin it back.
    backend.push(scripts_json("fmt-999", "Hook forte"));

    let summary = orchestrator
        .submit_brief(brief("skincare sostenibile"), vec![])
        .await
        .unwrap();
    let id: FormatId = "fmt-002".into();
    orchestrator
        .approve_format(summary.run_id(), &id)
        .await
        .unwrap();
    let batch = orchestrator
        .generate_scripts(summary.run_id(), &id)
        .await
        .unwrap();

    assert_eq!(batch.scripts.len(), 1);
    assert_eq!(batch.scripts[0].format_id, id);
    let stored = orchestrator
        .scripts_for(summary.run_id(), &id)
        .await
        .unwrap();
    assert_eq!(stored, batch.scripts);
}

#[tokio::test]
async fn regeneration_replaces_the_prior_script_set() {
    let (backend, _store, orchestrator) = fixture(PipelineConfig::default());
    backend.push(formats_json());
    backend.push(scripts_json("fmt-001", "Prima versione"));
    backend.push(scripts_json("fmt-001", "Seconda versione"));

    let summary = orchestrator
        .submit_brief(brief("skincare sostenibile"), vec![])
        .await
        .unwrap();
    let id: FormatId = "fmt-001".into();
    orchestrator
        .approve_format(summary.run_id(), &id)
        .await
        .unwrap();
    orchestrator
        .generate_scripts(summary.run_id(), &id)
        .await
        .unwrap();
    orchestrator
        .generate_scripts(summary.run_id(), &id)
        .await
        .unwrap();

    let stored = orchestrator
        .scripts_for(summary.run_id(), &id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].script_title, "Seconda versione");
}

#[tokio::test]
async fn unlocking_blocks_further_script_generation() {
    let (backend, _store, orchestrator) = fixture(PipelineConfig::default());
    backend.push(formats_json());
    backend.push(scripts_json("fmt-001", "Hook forte"));

    let summary = orchestrator
        .submit_brief(brief("skincare sostenibile"), vec![])
        .await
        .unwrap();
    let id: FormatId = "fmt-001".into();
    orchestrator
        .approve_format(summary.run_id(), &id)
        .await
        .unwrap();
    orchestrator
        .generate_scripts(summary.run_id(), &id)
        .await
        .unwrap();
    orchestrator
        .unlock_format(summary.run_id(), &id)
        .await
        .unwrap();

    let err = orchestrator
        .generate_scripts(summary.run_id(), &id)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), VasariErrorKind::Pipeline(_)));
    // The earlier scripts survive the unlock.
    let stored = orchestrator
        .scripts_for(summary.run_id(), &id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn scripts_of_a_replaced_format_become_orphans() {
    let (backend, _store, orchestrator) = fixture(PipelineConfig::default());
    backend.push(formats_json());
    backend.push(scripts_json("fmt-003", "Hook forte"));
    backend.push(rework_json("fmt-003"));

    let summary = orchestrator
        .submit_brief(brief("skincare sostenibile"), vec![])
        .await
        .unwrap();
    let id: FormatId = "fmt-003".into();
    orchestrator
        .approve_format(summary.run_id(), &id)
        .await
        .unwrap();
    orchestrator
        .generate_scripts(summary.run_id(), &id)
        .await
        .unwrap();
    orchestrator
        .reject_format(summary.run_id(), &id, "cambiamo direzione")
        .await
        .unwrap();

    let orphans = orchestrator
        .orphaned_scripts(summary.run_id())
        .await
        .unwrap();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].0.as_str(), "fmt-003");
    assert_eq!(orphans[0].1.len(), 1);
}

#[tokio::test]
async fn approved_formats_can_be_rejected_without_unlocking() {
    let (backend, _store, orchestrator) = fixture(PipelineConfig::default());
    backend.push(formats_json());
    backend.push(rework_json("fmt-002"));

    let summary = orchestrator
        .submit_brief(brief("skincare sostenibile"), vec![])
        .await
        .unwrap();
    let id: FormatId = "fmt-002".into();
    orchestrator
        .approve_format(summary.run_id(), &id)
        .await
        .unwrap();
    orchestrator
        .reject_format(summary.run_id(), &id, "cambio di rotta")
        .await
        .unwrap();

    let working = orchestrator.working_set(summary.run_id()).await.unwrap();
    assert!(working.iter().all(|(f, _)| f.id != id));
    assert!(
        working
            .iter()
            .any(|(f, d)| f.id.as_str() == "fmt-002a" && *d == Disposition::Pending)
    );
}

#[tokio::test]
async fn rework_prompts_carry_a_bounded_feedback_window() {
    let config = PipelineConfig::builder()
        .feedback_window(2usize)
        .build()
        .unwrap();
    let (backend, _store, orchestrator) = fixture(config);
    backend.push(formats_json());
    backend.push(rework_json("fmt-001"));
    backend.push(rework_json("fmt-002"));
    backend.push(rework_json("fmt-003"));

    let summary = orchestrator
        .submit_brief(brief("skincare sostenibile"), vec![])
        .await
        .unwrap();
    orchestrator
        .reject_format(summary.run_id(), &"fmt-001".into(), "motivo uno")
        .await
        .unwrap();
    orchestrator
        .reject_format(summary.run_id(), &"fmt-002".into(), "motivo due")
        .await
        .unwrap();
    orchestrator
        .reject_format(summary.run_id(), &"fmt-003".into(), "motivo tre")
        .await
        .unwrap();

    // Request 0 is the format batch; 1..=3 are the reworks.
    let third = backend.request_text(3);
    assert!(third.contains("motivo tre"));
    assert!(third.contains("motivo due"));
    assert!(!third.contains("motivo uno"));
}

#[tokio::test]
async fn rework_survives_a_failing_feedback_store() {
    init_tracing();
    let backend = Arc::new(ScriptedBackend::default());
    let orchestrator = Orchestrator::new(
        backend.clone(),
        Arc::new(FailingStore),
        PipelineConfig::default(),
    );
    backend.push(formats_json());
    backend.push(rework_json("fmt-004"));

    let summary = orchestrator
        .submit_brief(brief("skincare sostenibile"), vec![])
        .await
        .unwrap();
    let outcome = orchestrator
        .reject_format(summary.run_id(), &"fmt-004".into(), "troppo generico")
        .await
        .unwrap();

    assert_eq!(outcome.replacements().len(), 2);
    // Degraded memory: the fresh rejection still reaches the prompt.
    let rework_request = backend.request_text(1);
    assert!(rework_request.contains("troppo generico"));
}

#[tokio::test]
async fn full_review_cycle() {
    let (backend, _store, orchestrator) = fixture(PipelineConfig::default());
    backend.push(formats_json());
    backend.push(rework_json("fmt-003"));
    backend.push(scripts_json("fmt-003a", "Routine minimal in 3 step"));

    let summary = orchestrator
        .submit_brief(brief("skincare sostenibile"), vec![])
        .await
        .unwrap();
    orchestrator
        .reject_format(summary.run_id(), &"fmt-003".into(), "hook troppo debole")
        .await
        .unwrap();

    let replacement: FormatId = "fmt-003a".into();
    orchestrator
        .approve_format(summary.run_id(), &replacement)
        .await
        .unwrap();
    let batch = orchestrator
        .generate_scripts(summary.run_id(), &replacement)
        .await
        .unwrap();

    assert!(!batch.scripts.is_empty());
    assert!(batch.scripts.iter().all(|s| s.format_id == replacement));
    let working = orchestrator.working_set(summary.run_id()).await.unwrap();
    assert_eq!(working.len(), 7);
}

#[tokio::test]
async fn bare_script_array_is_wrapped_with_a_note() {
    let (backend, _store, orchestrator) = fixture(PipelineConfig::default());
    backend.push(formats_json());

    // A bare array instead of the canonical object.
    let bare = {
        let canonical: serde_json::Value =
            serde_json::from_str(&scripts_json("fmt-001", "Hook forte")).unwrap();
        canonical["scripts"].to_string()
    };
    backend.push(bare);

    let summary = orchestrator
        .submit_brief(brief("skincare sostenibile"), vec![])
        .await
        .unwrap();
    let id: FormatId = "fmt-001".into();
    orchestrator
        .approve_format(summary.run_id(), &id)
        .await
        .unwrap();
    let batch = orchestrator
        .generate_scripts(summary.run_id(), &id)
        .await
        .unwrap();

    assert_eq!(batch.scripts.len(), 1);
    let notes = batch.export_notes.expect("synthesized notes");
    assert!(notes.assumptions[0].contains("array"));
}
