//! Citation numbering for report builds.
//!
//! Citations link a strength/weakness claim in the component analysis to the
//! score and rationale backing it. Numbers are assigned exactly once per
//! build, in a fixed traversal order, and every consumer (inline markers in
//! the detail cards, the references section) reads the same list, so the
//! numbering cannot drift between independently rendered sections.

use crate::config::ReportConfig;
use crate::core::{
    Citation, CitationCategory, ComponentId, Criterion, CriterionId, RankedComponent, ScoreEntry,
};

/// Per-build citation counter and extractor.
///
/// Instantiated fresh for every report build; the counter is never shared
/// between builds, so concurrent builds cannot interleave their numbering.
#[derive(Debug, Default)]
pub struct CitationIndexer {
    counter: usize,
}

impl CitationIndexer {
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    /// Zero the counter before reusing one indexer for another build.
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Walk ranked results and extract numbered citations.
    ///
    /// Traversal order is fixed: results ascending by rank; within each
    /// component its entries sorted by score descending (ties keep criteria
    /// input order); strengths before weaknesses. Each category keeps at most
    /// the first `max_citations_per_category` entries whose rationale passes
    /// the length gate. Scores between the two thresholds are never cited.
    pub fn build(
        &mut self,
        results: &[RankedComponent],
        criteria: &[Criterion],
        config: &ReportConfig,
    ) -> Vec<Citation> {
        let mut ordered: Vec<&RankedComponent> = results.iter().collect();
        ordered.sort_by_key(|r| r.rank);

        let mut citations = Vec::new();
        for result in ordered {
            let by_score = result.entries_by_score_desc();
            for category in [CitationCategory::Strength, CitationCategory::Weakness] {
                let retained = by_score
                    .iter()
                    .filter(|entry| qualifies(entry, category, config))
                    .filter(|entry| has_substantive_rationale(entry, config.min_rationale_len))
                    .take(config.max_citations_per_category);
                for entry in retained {
                    self.counter += 1;
                    citations.push(Citation {
                        number: self.counter,
                        component_id: result.component.id,
                        component_label: result.label(),
                        criterion_id: entry.criterion_id,
                        criterion_name: criterion_name(criteria, entry.criterion_id),
                        category,
                        score: entry.score,
                        raw_value: entry.raw_value,
                        excerpt: excerpt(entry.rationale.as_deref().unwrap_or(""), config.excerpt_len),
                    });
                }
            }
        }
        citations
    }
}

/// Citation number for an inline marker, if the entry was cited.
///
/// Matches on criterion id, not name: criterion names are not required to be
/// unique, and two same-named criteria must keep their own numbers.
pub fn citation_number(
    citations: &[Citation],
    component: ComponentId,
    criterion: CriterionId,
    category: CitationCategory,
) -> Option<usize> {
    citations
        .iter()
        .find(|c| {
            c.component_id == component && c.criterion_id == criterion && c.category == category
        })
        .map(|c| c.number)
}

fn qualifies(entry: &ScoreEntry, category: CitationCategory, config: &ReportConfig) -> bool {
    match category {
        CitationCategory::Strength => entry.score >= config.strength_threshold,
        CitationCategory::Weakness => entry.score <= config.weakness_threshold,
    }
}

// Entries with a rationale at or below the minimum length carry too little
// text to quote; they are skipped, not truncated.
fn has_substantive_rationale(entry: &ScoreEntry, min_len: usize) -> bool {
    entry
        .rationale
        .as_ref()
        .is_some_and(|r| r.chars().count() > min_len)
}

fn criterion_name(criteria: &[Criterion], id: CriterionId) -> String {
    criteria
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| format!("criterion {id}"))
}

/// Rationale excerpt truncated to `max` characters on a char boundary.
fn excerpt(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}
