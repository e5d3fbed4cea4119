//! The creative brief and its enumerations.
//!
//! Wire values follow the briefing form of the reference product, which is
//! Italian-first: enumeration variants carry English names but serialize to
//! the Italian tokens the generation prompts were tuned against.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sentinel constraint substituted when the caller supplies none.
///
/// The prompt templates assume `constraints` is never empty, so an empty
/// list is replaced with this single entry at build time.
pub const NO_CONSTRAINTS: &str = "none";

/// Target publishing platform.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter,
    derive_more::Display,
)]
pub enum Platform {
    /// Instagram Reels
    Instagram,
    /// TikTok
    TikTok,
    /// Cross-posted to both platforms
    #[serde(rename = "Instagram+TikTok")]
    #[display("Instagram+TikTok")]
    InstagramTikTok,
}

/// Whether the content runs organically or as paid advertising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentGoal {
    /// Organic distribution
    #[serde(rename = "organico")]
    Organic,
    /// Paid advertising
    #[serde(rename = "adv")]
    Adv,
}

/// Campaign objective driving format and CTA selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignObjective {
    /// Brand awareness
    Awareness,
    /// Audience engagement
    Engagement,
    /// Direct conversion
    Conversion,
    /// Lead capture
    Lead,
}

/// Who fronts the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatorType {
    /// A consumer-style creator
    CreatorConsumer,
    /// A subject-matter-expert creator
    CreatorExpert,
    /// The face of the brand
    BrandFace,
    /// A UGC creator producing for the brand account
    UgcCreator,
}

/// Deliverable kinds requested by the brief.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    strum::EnumIter,
)]
pub enum Deliverable {
    /// A single Reel
    #[serde(rename = "reel")]
    Reel,
    /// A carousel post
    #[serde(rename = "carosello")]
    Carousel,
    /// A standalone video script
    #[serde(rename = "script_video")]
    VideoScript,
    /// Multiple formats from one concept
    #[serde(rename = "piu_formati")]
    MultiFormat,
}

/// Why the video exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoPurpose {
    /// Teach the audience something
    #[serde(rename = "educare")]
    Educate,
    /// Entertain first
    #[serde(rename = "intrattenere")]
    Entertain,
    /// Drive a purchase decision
    #[serde(rename = "convertire")]
    Convert,
    /// Build authority positioning
    #[serde(rename = "posizionamento_authority")]
    AuthorityPositioning,
    /// Grow and bond the community
    #[serde(rename = "community_building")]
    CommunityBuilding,
}

/// Structural archetype of the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentArchetype {
    /// Short tutorial with numbered steps
    #[serde(rename = "mini_tutorial")]
    MiniTutorial,
    /// Narrative arc
    #[serde(rename = "storytelling")]
    Storytelling,
    /// Debunking a common belief
    #[serde(rename = "myth_busting")]
    MythBusting,
    /// Get-ready-with-me
    #[serde(rename = "grwm")]
    Grwm,
    /// Top-3 list
    #[serde(rename = "lista_top3")]
    TopThreeList,
    /// First-person opinion piece
    #[serde(rename = "pov_opinione")]
    PovOpinion,
    /// Before/after reveal
    #[serde(rename = "before_after")]
    BeforeAfter,
    /// Product review or demo
    #[serde(rename = "review_demo")]
    ReviewDemo,
}

/// Opening-hook style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookType {
    /// "Did you know..."
    #[serde(rename = "did_you_know")]
    DidYouKnow,
    /// Calling out a common mistake
    #[serde(rename = "errore_comune")]
    CommonMistake,
    /// A confession
    #[serde(rename = "confessione")]
    Confession,
    /// An open question
    #[serde(rename = "domanda")]
    Question,
    /// A striking statistic
    #[serde(rename = "statistica")]
    Statistic,
    /// Pattern-interrupting shock
    #[serde(rename = "shock")]
    Shock,
    /// Point-of-view framing
    #[serde(rename = "pov")]
    Pov,
}

/// Emotional register of the delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmotionalTone {
    /// Calm and measured
    #[serde(rename = "calmo")]
    Calm,
    /// High energy
    #[serde(rename = "energico")]
    Energetic,
    /// Empathetic
    #[serde(rename = "empatico")]
    Empathetic,
    /// Ironic
    #[serde(rename = "ironico")]
    Ironic,
    /// Minimal, understated
    #[serde(rename = "minimal")]
    Minimal,
    /// Inspirational
    #[serde(rename = "ispirazionale")]
    Inspirational,
    /// Deliberately polemic
    #[serde(rename = "polemico")]
    Polemic,
}

/// How aware the audience is of the problem/solution space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwarenessLevel {
    /// Unaware of the problem
    Unaware,
    /// Aware of the problem only
    ProblemAware,
    /// Aware solutions exist
    SolutionAware,
    /// Aware of this product
    ProductAware,
}

/// The single reaction the content is optimized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesiredReaction {
    /// A comment
    #[serde(rename = "commento")]
    Comment,
    /// A save
    #[serde(rename = "salvataggio")]
    Save,
    /// A share
    #[serde(rename = "condivisione")]
    Share,
    /// A profile visit
    #[serde(rename = "visita_profilo")]
    ProfileVisit,
    /// A purchase
    #[serde(rename = "acquisto")]
    Purchase,
}

/// Optional creative-intent block of the brief.
///
/// Carries the intent, psychology, and structured constraints the format
/// designer should honor when present.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct CreativeIntent {
    /// Why the video exists
    video_purpose: VideoPurpose,
    /// Structural archetype
    content_archetype: ContentArchetype,
    /// Opening-hook style
    hook_type: HookType,
    /// Emotional register
    emotional_tone: EmotionalTone,
    /// Maximum duration in seconds (15/30/45/60...)
    max_duration_seconds: u32,
    /// Forbidden words ("miracoloso", ...)
    #[builder(default)]
    words_to_avoid: Vec<String>,
    /// Elements that must appear (overlay text, show product, ...)
    #[builder(default)]
    mandatory_elements: Vec<String>,
    /// Audience awareness level
    awareness_level: AwarenessLevel,
    /// The single reaction the content is optimized for
    desired_reaction: DesiredReaction,
}

impl CreativeIntent {
    /// Creates a new creative-intent builder.
    pub fn builder() -> CreativeIntentBuilder {
        CreativeIntentBuilder::default()
    }
}

/// The structured creative input that starts a pipeline run.
///
/// Immutable once submitted: a new `Brief` always starts a new run.
///
/// # Examples
///
/// ```
/// use vasari_core::{Brief, Platform, ContentGoal, CampaignObjective, CreatorType, Deliverable};
///
/// let brief = Brief::builder()
///     .topic("skincare sostenibile")
///     .industry("beauty")
///     .platform(Platform::Instagram)
///     .content_goal(ContentGoal::Organic)
///     .campaign_objective(CampaignObjective::Engagement)
///     .target_audience("donne 25-34 attente all'ambiente")
///     .tone_of_voice(vec!["fresco".to_string(), "diretto".to_string()])
///     .creator_type(CreatorType::UgcCreator)
///     .deliverables([Deliverable::Reel])
///     .call_to_action("Salva il post")
///     .build()
///     .unwrap();
///
/// // An empty constraint list is replaced with the sentinel.
/// assert_eq!(brief.constraints(), &vec!["none".to_string()]);
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters, derive_builder::Builder,
)]
#[builder(setter(into), build_fn(name = "build_inner", private))]
pub struct Brief {
    /// What the content is about
    topic: String,
    /// Industry vertical
    industry: String,
    /// Target publishing platform
    platform: Platform,
    /// Organic vs paid
    content_goal: ContentGoal,
    /// Campaign objective
    campaign_objective: CampaignObjective,
    /// Target audience description
    target_audience: String,
    /// Ordered tone-of-voice tags
    tone_of_voice: Vec<String>,
    /// Who fronts the content
    creator_type: CreatorType,
    /// Requested deliverable kinds
    #[builder(setter(custom))]
    deliverables: BTreeSet<Deliverable>,
    /// Free-text constraints; never empty (see [`NO_CONSTRAINTS`])
    #[builder(default)]
    constraints: Vec<String>,
    /// Call-to-action line
    call_to_action: String,
    /// Optional creative-intent block
    #[builder(default, setter(strip_option))]
    creative_intent: Option<CreativeIntent>,
    /// Optional reference script used for rhythm/structure, never copied
    #[builder(default, setter(strip_option))]
    reference_script: Option<String>,
}

impl Brief {
    /// Creates a new brief builder.
    pub fn builder() -> BriefBuilder {
        BriefBuilder::default()
    }
}

impl BriefBuilder {
    /// Sets the requested deliverable kinds.
    pub fn deliverables(&mut self, kinds: impl IntoIterator<Item = Deliverable>) -> &mut Self {
        self.deliverables = Some(kinds.into_iter().collect());
        self
    }

    /// Builds the brief, substituting the constraint sentinel when the
    /// caller supplied no constraints.
    pub fn build(&self) -> Result<Brief, BriefBuilderError> {
        let mut brief = self.build_inner()?;
        if brief.constraints.is_empty() {
            brief.constraints.push(NO_CONSTRAINTS.to_string());
        }
        Ok(brief)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_builder() -> BriefBuilder {
        Brief::builder()
            .topic("skincare sostenibile")
            .industry("beauty")
            .platform(Platform::Instagram)
            .content_goal(ContentGoal::Organic)
            .campaign_objective(CampaignObjective::Engagement)
            .target_audience("donne 25-34")
            .tone_of_voice(vec!["fresco".to_string()])
            .creator_type(CreatorType::UgcCreator)
            .deliverables([Deliverable::Reel])
            .call_to_action("Salva il post")
            .clone()
    }

    #[test]
    fn empty_constraints_get_sentinel() {
        let brief = minimal_builder().build().unwrap();
        assert_eq!(brief.constraints(), &vec![NO_CONSTRAINTS.to_string()]);
    }

    #[test]
    fn supplied_constraints_are_kept() {
        let brief = minimal_builder()
            .constraints(vec!["no medical claims".to_string()])
            .build()
            .unwrap();
        assert_eq!(brief.constraints(), &vec!["no medical claims".to_string()]);
    }

    #[test]
    fn missing_required_field_fails() {
        let result = Brief::builder().topic("x").build();
        assert!(result.is_err());
    }

    #[test]
    fn platform_wire_values() {
        let json = serde_json::to_string(&Platform::InstagramTikTok).unwrap();
        assert_eq!(json, "\"Instagram+TikTok\"");
        let json = serde_json::to_string(&ContentGoal::Organic).unwrap();
        assert_eq!(json, "\"organico\"");
        let json = serde_json::to_string(&Deliverable::MultiFormat).unwrap();
        assert_eq!(json, "\"piu_formati\"");
    }
}
