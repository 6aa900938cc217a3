use serde::{Deserialize, Serialize};

/// Report build configuration.
///
/// Defaults reproduce the documented report behavior; callers can override
/// individual knobs through the study request or the CLI. The struct is
/// passed into each build rather than read from global state, so concurrent
/// builds with different configurations never interfere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Scores at or above this are cited as strengths.
    #[serde(default = "default_strength_threshold")]
    pub strength_threshold: u8,

    /// Scores at or below this are cited as weaknesses.
    #[serde(default = "default_weakness_threshold")]
    pub weakness_threshold: u8,

    /// At most this many citations per category per component.
    #[serde(default = "default_max_citations_per_category")]
    pub max_citations_per_category: usize,

    /// Entries with rationale at or below this length are never cited.
    #[serde(default = "default_min_rationale_len")]
    pub min_rationale_len: usize,

    /// Bar chart truncates to this many components.
    #[serde(default = "default_max_bar_items")]
    pub max_bar_items: usize,

    /// Radar chart compares this many top components.
    #[serde(default = "default_max_radar_items")]
    pub max_radar_items: usize,

    /// Trade-off table compares this many top components.
    #[serde(default = "default_tradeoff_top_n")]
    pub tradeoff_top_n: usize,

    /// Narrative shorter than this falls back to the templated summary.
    #[serde(default = "default_min_narrative_summary_len")]
    pub min_narrative_summary_len: usize,

    /// Citation rationale excerpts are truncated to this length.
    #[serde(default = "default_excerpt_len")]
    pub excerpt_len: usize,
}

fn default_strength_threshold() -> u8 {
    7
}

fn default_weakness_threshold() -> u8 {
    4
}

fn default_max_citations_per_category() -> usize {
    4
}

fn default_min_rationale_len() -> usize {
    10
}

fn default_max_bar_items() -> usize {
    8
}

fn default_max_radar_items() -> usize {
    3
}

fn default_tradeoff_top_n() -> usize {
    3
}

fn default_min_narrative_summary_len() -> usize {
    50
}

fn default_excerpt_len() -> usize {
    140
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            strength_threshold: default_strength_threshold(),
            weakness_threshold: default_weakness_threshold(),
            max_citations_per_category: default_max_citations_per_category(),
            min_rationale_len: default_min_rationale_len(),
            max_bar_items: default_max_bar_items(),
            max_radar_items: default_max_radar_items(),
            tradeoff_top_n: default_tradeoff_top_n(),
            min_narrative_summary_len: default_min_narrative_summary_len(),
            excerpt_len: default_excerpt_len(),
        }
    }
}

impl ReportConfig {
    // Pure function: collect every configuration issue instead of failing at
    // the first one.
    fn collect_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.weakness_threshold >= self.strength_threshold {
            issues.push(format!(
                "weakness threshold ({}) must be below strength threshold ({})",
                self.weakness_threshold, self.strength_threshold
            ));
        }
        if self.strength_threshold > 10 {
            issues.push(format!(
                "strength threshold ({}) must be within the 1-10 score scale",
                self.strength_threshold
            ));
        }
        if self.max_citations_per_category == 0 {
            issues.push("max citations per category must be at least 1".to_string());
        }
        if self.max_bar_items == 0 {
            issues.push("max bar items must be at least 1".to_string());
        }
        if self.max_radar_items == 0 {
            issues.push("max radar items must be at least 1".to_string());
        }
        if self.tradeoff_top_n == 0 {
            issues.push("trade-off comparison size must be at least 1".to_string());
        }
        if self.excerpt_len == 0 {
            issues.push("excerpt length must be at least 1".to_string());
        }

        issues
    }

    /// Validate the configuration, reporting every issue at once.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let issues = self.collect_issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}
