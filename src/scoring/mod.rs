//! Deterministic weighted-ranking engine.
//!
//! `rank` is a pure function over its inputs: no side effects, no error
//! conditions, and the output length always equals the component count.

use crate::core::{Component, Criterion, RankedComponent, ScoreSet};

/// Round to two decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// Pure function: the scoring denominator. Empty criteria keep it at 1 so
// every total is 0.0 rather than NaN.
fn denominator(criteria: &[Criterion]) -> f64 {
    let sum: f64 = criteria.iter().map(|c| c.weight).sum();
    if sum > 0.0 {
        sum
    } else {
        1.0
    }
}

// Pure function: weighted total for one component over the criteria it was
// actually scored on. Missing (component, criterion) pairs contribute
// nothing - they are not a zero-score penalty.
fn weighted_total(component: &Component, criteria: &[Criterion], scores: &ScoreSet) -> f64 {
    criteria
        .iter()
        .filter_map(|criterion| {
            scores
                .get(component.id, criterion.id)
                .map(|entry| f64::from(entry.score) * criterion.weight)
        })
        .sum()
}

/// Compute weighted totals and ranks for every component.
///
/// Components are sorted descending by total score with a stable sort, so
/// equal totals keep their original input order; ranks are the 1-based
/// positions after sorting and always form a permutation of `1..=N`.
pub fn rank(
    components: &[Component],
    criteria: &[Criterion],
    scores: &ScoreSet,
) -> Vec<RankedComponent> {
    let denom = denominator(criteria);

    let mut results: Vec<RankedComponent> = components
        .iter()
        .map(|component| {
            let entries = criteria
                .iter()
                .filter_map(|criterion| scores.get(component.id, criterion.id).cloned())
                .collect();
            RankedComponent {
                component: component.clone(),
                entries,
                total_score: round2(weighted_total(component, criteria, scores) / denom),
                rank: 0,
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (position, result) in results.iter_mut().enumerate() {
        result.rank = position + 1;
    }

    results
}
