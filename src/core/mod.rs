use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a candidate component.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ComponentId(pub u64);

/// Stable identity of a decision criterion.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CriterionId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A weighted decision criterion. Immutable once scoring begins.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Relative weight, must be > 0. The scoring denominator is the sum of
    /// all weights.
    pub weight: f64,
    /// Unit for raw values ("mA", "MHz"), displayed next to them.
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default = "default_higher_is_better")]
    pub higher_is_better: bool,
    #[serde(default)]
    pub min_requirement: Option<f64>,
    #[serde(default)]
    pub max_requirement: Option<f64>,
}

fn default_higher_is_better() -> bool {
    true
}

impl Criterion {
    pub fn new(id: u64, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id: CriterionId(id),
            name: name.into(),
            description: String::new(),
            weight,
            unit: None,
            higher_is_better: true,
            min_requirement: None,
            max_requirement: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A candidate item under evaluation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Component {
    pub id: ComponentId,
    pub manufacturer: String,
    pub part_number: String,
    #[serde(default)]
    pub description: String,
}

impl Component {
    pub fn new(id: u64, manufacturer: impl Into<String>, part_number: impl Into<String>) -> Self {
        Self {
            id: ComponentId(id),
            manufacturer: manufacturer.into(),
            part_number: part_number.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Display label used in tables, charts and citations.
    pub fn label(&self) -> String {
        format!("{} {}", self.manufacturer, self.part_number)
    }
}

/// One scored (component, criterion) pair as delivered by the scoring
/// collaborator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScoreEntry {
    pub component_id: ComponentId,
    pub criterion_id: CriterionId,
    /// Integer score in [1, 10].
    pub score: u8,
    /// Measured value backing the score, in the criterion's unit.
    #[serde(default)]
    pub raw_value: Option<f64>,
    /// Free-text justification from the scoring collaborator.
    #[serde(default)]
    pub rationale: Option<String>,
    /// Collaborator confidence in [0, 1].
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl ScoreEntry {
    pub fn new(component_id: ComponentId, criterion_id: CriterionId, score: u8) -> Self {
        Self {
            component_id,
            criterion_id,
            score,
            raw_value: None,
            rationale: None,
            confidence: None,
        }
    }

    pub fn with_raw_value(mut self, raw_value: f64) -> Self {
        self.raw_value = Some(raw_value);
        self
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }
}

/// Lookup of score entries keyed by (component, criterion).
#[derive(Clone, Debug, Default)]
pub struct ScoreSet {
    entries: std::collections::HashMap<(ComponentId, CriterionId), ScoreEntry>,
}

impl ScoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: ScoreEntry) {
        self.entries
            .insert((entry.component_id, entry.criterion_id), entry);
    }

    pub fn get(&self, component: ComponentId, criterion: CriterionId) -> Option<&ScoreEntry> {
        self.entries.get(&(component, criterion))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ScoreEntry> for ScoreSet {
    fn from_iter<I: IntoIterator<Item = ScoreEntry>>(iter: I) -> Self {
        let mut set = Self::new();
        for entry in iter {
            set.insert(entry);
        }
        set
    }
}

impl From<Vec<ScoreEntry>> for ScoreSet {
    fn from(entries: Vec<ScoreEntry>) -> Self {
        entries.into_iter().collect()
    }
}

/// One component's outcome for a single scoring run. Produced fresh by each
/// engine invocation and never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RankedComponent {
    pub component: Component,
    /// Entries for criteria this component was actually scored on, kept in
    /// criteria input order. Missing pairs are absent rather than zeroed.
    pub entries: Vec<ScoreEntry>,
    /// Weighted total, rounded to two decimals.
    pub total_score: f64,
    /// 1-based position after the stable descending sort.
    pub rank: usize,
}

impl RankedComponent {
    pub fn entry(&self, criterion: CriterionId) -> Option<&ScoreEntry> {
        self.entries.iter().find(|e| e.criterion_id == criterion)
    }

    /// Entries sorted by score descending. The sort is stable, so equal
    /// scores keep criteria input order - citation numbering depends on this.
    pub fn entries_by_score_desc(&self) -> Vec<&ScoreEntry> {
        let mut sorted: Vec<&ScoreEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted
    }

    pub fn label(&self) -> String {
        self.component.label()
    }
}

/// Whether a citation records a high or a low score.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CitationCategory {
    Strength,
    Weakness,
}

impl fmt::Display for CitationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strength => write!(f, "strength"),
            Self::Weakness => write!(f, "weakness"),
        }
    }
}

/// A numbered reference linking a strength/weakness claim to its originating
/// score and rationale. Numbers are 1-based and monotonic within one build.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Citation {
    pub number: usize,
    pub component_id: ComponentId,
    pub component_label: String,
    pub criterion_id: CriterionId,
    pub criterion_name: String,
    pub category: CitationCategory,
    pub score: u8,
    pub raw_value: Option<f64>,
    pub excerpt: String,
}

/// One classified unit of narrative text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    Bullets(Vec<String>),
}

impl Block {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph(text.into())
    }
}

/// Bucketed score range used purely for presentation color-coding.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            8..=10 => Self::Excellent,
            6..=7 => Self::Good,
            4..=5 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }

    pub fn range_label(&self) -> &'static str {
        match self {
            Self::Excellent => "8-10",
            Self::Good => "6-7",
            Self::Fair => "4-5",
            Self::Poor => "1-3",
        }
    }

    /// Legend text shown in the methodology section.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "exceeds requirements with comfortable margin",
            Self::Good => "meets requirements",
            Self::Fair => "marginal, needs design attention",
            Self::Poor => "fails to meet requirements",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Project metadata supplied by the caller alongside the study inputs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub name: String,
    /// What kind of component is being compared ("voltage regulator").
    #[serde(default)]
    pub component_type: String,
    #[serde(default)]
    pub description: String,
}

impl ProjectMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            component_type: String::new(),
            description: String::new(),
        }
    }
}
