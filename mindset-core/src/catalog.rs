//! Scenario catalog: authored content and its instantiation.
//!
//! Content is authored as templates ([`CatalogTemplate`]) because some
//! phases come in several pre-built variants (the kit audit can hide a
//! misplaced battery, a duplicate folder, or an extra note). Building a
//! catalog picks one variant per phase from a seeded RNG, validates the
//! result and freezes it: from then on every phase's target set is fixed.
//!
//! Templates deserialize from TOML:
//!
//! ```toml
//! [[scenario]]
//! id = 1
//! title = "Mission Control Kits"
//! setting = "operations-room"
//!
//! [[scenario.phase]]
//! id = "kit-audit"
//! narrative = "..."
//! prompt = "What looks wrong with the kits?"
//! success_message = "Nice catch, {name}!"
//! hints = { subtle = "...", stronger = "...", explicit = "..." }
//!
//! [[scenario.phase.element]]
//! id = "phone"
//! label = "Mobile Phone"
//! hint = "The phone belongs in the Tech Kit."
//!
//! [[scenario.phase.variant]]
//! kind = "duplicate"
//! [[scenario.phase.variant.element]]
//! id = "folder-duplicate"
//! label = "Case Folder (in Tech Kit)"
//! is_target = true
//! hint = "There's a duplicate folder!"
//! ```

use std::collections::{BTreeSet, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MindsetError, Result};
use crate::types::{ElementId, PhaseId, ScenarioId};

// ---------------------------------------------------------------------------
// Instantiated content
// ---------------------------------------------------------------------------

/// A tappable item in a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Identifier, unique within its phase.
    pub id: ElementId,
    /// Text shown on the element.
    pub label: String,
    /// `true` when this element is one of the mistakes to find.
    #[serde(default)]
    pub is_target: bool,
    /// Companion remark about this particular element.
    pub hint: String,
    /// Optional secondary line (e.g. `"#4712 · Martinez · ORIGINAL"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Element {
    /// A non-target element.
    #[must_use]
    pub fn new(id: &str, label: &str, hint: &str) -> Self {
        Self {
            id: ElementId::new(id),
            label: label.to_string(),
            is_target: false,
            hint: hint.to_string(),
            detail: None,
        }
    }

    /// A target element (one of the mistakes).
    #[must_use]
    pub fn target(id: &str, label: &str, hint: &str) -> Self {
        Self {
            is_target: true,
            ..Self::new(id, label, hint)
        }
    }

    /// Attach a detail line.
    #[must_use]
    pub fn with_detail(mut self, detail: &str) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

/// Three hint texts of increasing specificity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintLadder {
    /// Tier 1: a gentle nudge.
    pub subtle: String,
    /// Tier 2: narrows the search.
    pub stronger: String,
    /// Tier 3: all but points at the answer.
    pub explicit: String,
}

impl HintLadder {
    /// Build a ladder from its three tiers.
    #[must_use]
    pub fn new(subtle: &str, stronger: &str, explicit: &str) -> Self {
        Self {
            subtle: subtle.to_string(),
            stronger: stronger.to_string(),
            explicit: explicit.to_string(),
        }
    }

    /// The three texts in tier order.
    #[must_use]
    pub fn tiers(&self) -> [&str; 3] {
        [self.subtle.as_str(), self.stronger.as_str(), self.explicit.as_str()]
    }
}

/// One screen of a scenario: a scene with a fixed set of mistakes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Identifier, unique within its scenario.
    pub id: PhaseId,
    /// Read aloud when the phase starts.
    pub narrative: String,
    /// Question posed to the player in the speak phase.
    pub prompt: String,
    /// Elements in display order.
    pub elements: Vec<Element>,
    /// Shown on success; may contain `{name}`.
    pub success_message: String,
    /// Hint texts by tier.
    pub hints: HintLadder,
    /// Variant this phase was instantiated from, if it had any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl Phase {
    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    /// Target elements in display order.
    pub fn targets(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.is_target)
    }

    /// Number of target elements.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets().count()
    }

    /// Whether `found` covers every target of this phase.
    #[must_use]
    pub fn is_solved_by(&self, found: &BTreeSet<ElementId>) -> bool {
        self.targets().all(|t| found.contains(&t.id))
    }

    /// First target in display order that is not yet in `found`.
    #[must_use]
    pub fn first_unfound_target(&self, found: &BTreeSet<ElementId>) -> Option<&Element> {
        self.targets().find(|t| !found.contains(&t.id))
    }

    fn validate(&self, scenario: &str) -> Result<()> {
        let phase = self.id.0.as_str();
        if self.elements.is_empty() {
            return Err(MindsetError::catalog(scenario, phase, "phase has no elements"));
        }
        if self.target_count() == 0 {
            return Err(MindsetError::catalog(scenario, phase, "phase has no target element"));
        }
        let mut seen = HashSet::new();
        for element in &self.elements {
            if element.id.as_str().is_empty() {
                return Err(MindsetError::catalog(scenario, phase, "element with empty id"));
            }
            if !seen.insert(&element.id) {
                return Err(MindsetError::catalog(
                    scenario,
                    phase,
                    format!("duplicate element id '{}'", element.id),
                ));
            }
        }
        for (tier, text) in self.hints.tiers().iter().enumerate() {
            if text.trim().is_empty() {
                return Err(MindsetError::catalog(
                    scenario,
                    phase,
                    format!("hint tier {} is empty", tier + 1),
                ));
            }
        }
        Ok(())
    }
}

/// A themed mini-mystery made of ordered phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Stable identifier.
    pub id: ScenarioId,
    /// Display title.
    pub title: String,
    /// Scene background tag (e.g. `"safehouse-kitchen"`).
    pub setting: String,
    /// One-line teaser for the scenario picker.
    #[serde(default)]
    pub description: String,
    /// Emoji shown in the picker.
    #[serde(default)]
    pub icon: String,
    /// 1 (easy) to 3 (hard).
    pub difficulty: u8,
    /// Phases in play order.
    pub phases: Vec<Phase>,
}

impl Scenario {
    /// Phase with the given id.
    #[must_use]
    pub fn phase(&self, id: &PhaseId) -> Option<&Phase> {
        self.phases.iter().find(|p| &p.id == id)
    }

    fn validate(&self) -> Result<()> {
        let label = format!("scenario {}", self.id);
        if self.phases.is_empty() {
            return Err(MindsetError::catalog(label, "", "scenario has no phases"));
        }
        if !(1..=3).contains(&self.difficulty) {
            return Err(MindsetError::catalog(
                label,
                "",
                format!("difficulty {} outside 1..=3", self.difficulty),
            ));
        }
        let mut seen = HashSet::new();
        for phase in &self.phases {
            if !seen.insert(&phase.id) {
                return Err(MindsetError::catalog(
                    &label,
                    phase.id.0.as_str(),
                    "duplicate phase id",
                ));
            }
            phase.validate(&label)?;
        }
        Ok(())
    }
}

/// Immutable, validated list of scenarios shared by every session.
///
/// Deserializing goes through [`ScenarioCatalog::new`], so a catalog read
/// from disk is held to the same invariants as one built from templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogRecord")]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

#[derive(Deserialize)]
struct CatalogRecord {
    scenarios: Vec<Scenario>,
}

impl TryFrom<CatalogRecord> for ScenarioCatalog {
    type Error = MindsetError;

    fn try_from(record: CatalogRecord) -> Result<Self> {
        Self::new(record.scenarios)
    }
}

impl ScenarioCatalog {
    /// Validate and wrap already-instantiated scenarios.
    ///
    /// # Errors
    /// Returns `MindsetError::Catalog` on the first invariant violation.
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self> {
        let mut ids = HashSet::new();
        for scenario in &scenarios {
            if !ids.insert(scenario.id) {
                return Err(MindsetError::catalog(
                    format!("scenario {}", scenario.id),
                    "",
                    "duplicate scenario id",
                ));
            }
            scenario.validate()?;
        }
        Ok(Self { scenarios })
    }

    /// The built-in scenarios, with variants chosen from `seed`.
    ///
    /// # Errors
    /// Only fails if the built-in content itself is invalid.
    pub fn builtin(seed: u64) -> Result<Self> {
        crate::content::builtin_templates().build(seed)
    }

    /// Number of scenarios.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether the catalog has no scenarios.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Scenario at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    /// Scenario with the given id.
    #[must_use]
    pub fn by_id(&self, id: ScenarioId) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// All scenarios in order.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// An alternative set of extra elements for a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Kind of mistake this variant plants (e.g. `"wrong-placement"`).
    pub kind: String,
    /// Elements appended after the phase's base elements.
    #[serde(rename = "element", default)]
    pub elements: Vec<Element>,
}

/// Authoring form of a [`Phase`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTemplate {
    /// Phase identifier.
    pub id: PhaseId,
    /// Narrative text.
    pub narrative: String,
    /// Speak-phase prompt.
    pub prompt: String,
    /// Elements present in every variant.
    #[serde(rename = "element", default)]
    pub elements: Vec<Element>,
    /// Alternative extra-element sets; one is chosen per instantiation.
    #[serde(rename = "variant", default)]
    pub variants: Vec<Variant>,
    /// Success message template.
    pub success_message: String,
    /// Hint ladder.
    pub hints: HintLadder,
}

impl PhaseTemplate {
    /// Instantiate with a uniformly chosen variant.
    pub fn instantiate<R: Rng>(&self, rng: &mut R) -> Phase {
        if self.variants.is_empty() {
            return self.assemble(None);
        }
        let index = rng.gen_range(0..self.variants.len());
        self.assemble(self.variants.get(index))
    }

    /// Instantiate with a specific variant.
    ///
    /// Returns `None` when `index` is out of range. A template without
    /// variants accepts only index 0.
    #[must_use]
    pub fn instantiate_variant(&self, index: usize) -> Option<Phase> {
        if self.variants.is_empty() {
            return (index == 0).then(|| self.assemble(None));
        }
        self.variants.get(index).map(|v| self.assemble(Some(v)))
    }

    fn assemble(&self, variant: Option<&Variant>) -> Phase {
        let mut elements = self.elements.clone();
        if let Some(v) = variant {
            elements.extend(v.elements.iter().cloned());
        }
        Phase {
            id: self.id.clone(),
            narrative: self.narrative.clone(),
            prompt: self.prompt.clone(),
            elements,
            success_message: self.success_message.clone(),
            hints: self.hints.clone(),
            variant: variant.map(|v| v.kind.clone()),
        }
    }
}

/// Authoring form of a [`Scenario`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioTemplate {
    /// Scenario identifier.
    pub id: ScenarioId,
    /// Display title.
    pub title: String,
    /// Scene background tag.
    pub setting: String,
    /// Picker teaser.
    #[serde(default)]
    pub description: String,
    /// Picker emoji.
    #[serde(default)]
    pub icon: String,
    /// 1 to 3.
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    /// Phase templates in play order.
    #[serde(rename = "phase", default)]
    pub phases: Vec<PhaseTemplate>,
}

fn default_difficulty() -> u8 {
    1
}

/// A whole catalog in authoring form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTemplate {
    /// Scenario templates in catalog order.
    #[serde(rename = "scenario", default)]
    pub scenarios: Vec<ScenarioTemplate>,
}

impl CatalogTemplate {
    /// Parse a catalog template from TOML.
    ///
    /// # Errors
    /// Returns `MindsetError::Serialization` if the TOML does not match the model.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| MindsetError::Serialization(e.to_string()))
    }

    /// Read and parse a catalog template file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Instantiate every phase with a `StdRng` seeded from `seed`.
    ///
    /// The same template and seed always yield the same catalog.
    ///
    /// # Errors
    /// Returns `MindsetError::Catalog` if the instantiated content is invalid.
    pub fn build(&self, seed: u64) -> Result<ScenarioCatalog> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.build_with(&mut rng)
    }

    /// Instantiate every phase with a caller-supplied RNG.
    ///
    /// # Errors
    /// Returns `MindsetError::Catalog` if the instantiated content is invalid.
    pub fn build_with<R: Rng>(&self, rng: &mut R) -> Result<ScenarioCatalog> {
        let scenarios = self
            .scenarios
            .iter()
            .map(|t| Scenario {
                id: t.id,
                title: t.title.clone(),
                setting: t.setting.clone(),
                description: t.description.clone(),
                icon: t.icon.clone(),
                difficulty: t.difficulty,
                phases: t.phases.iter().map(|p| p.instantiate(rng)).collect(),
            })
            .collect::<Vec<_>>();

        for scenario in &scenarios {
            for phase in &scenario.phases {
                if let Some(kind) = &phase.variant {
                    debug!(scenario = %scenario.id, phase = %phase.id, variant = %kind, "Phase variant chosen");
                }
            }
        }

        ScenarioCatalog::new(scenarios)
    }
}
