//! Tabular layouts derived from ranked results.
//!
//! Deterministic data descriptions: each builder returns a [`Table`] the
//! rendering backends can draw however they like. Builders fail with
//! `ReportError::Render` on malformed intermediate data (non-finite totals
//! or weights); the assembler degrades those failures into notes instead of
//! aborting the document.

use crate::core::{Criterion, RankedComponent, ScoreBand, ScoreEntry};
use crate::errors::ReportError;
use serde::{Deserialize, Serialize};

/// Character count of a full-width bar in the weight-distribution table.
const WEIGHT_BAR_WIDTH: f64 = 30.0;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub title: String,
    pub header: Vec<String>,
    /// Secondary header row (criterion weights), when the layout carries one.
    pub sub_header: Option<Vec<String>>,
    pub rows: Vec<TableRow>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TableCell {
    pub text: String,
    /// Presentation color band, set on score cells.
    pub band: Option<ScoreBand>,
    /// Set on the best entry of a trade-off row and on totals.
    pub emphasis: bool,
}

impl TableCell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            band: None,
            emphasis: false,
        }
    }

    pub fn banded(text: impl Into<String>, band: ScoreBand) -> Self {
        Self {
            text: text.into(),
            band: Some(band),
            emphasis: false,
        }
    }

    pub fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            band: None,
            emphasis: true,
        }
    }

    fn with_emphasis(mut self, emphasis: bool) -> Self {
        self.emphasis = emphasis;
        self
    }
}

/// Full score matrix: one row per component in rank order, one column per
/// criterion plus a trailing total. Score cells carry their color band.
pub fn scoring_matrix(
    results: &[RankedComponent],
    criteria: &[Criterion],
) -> Result<Table, ReportError> {
    ensure_finite_weights(criteria, "scoring matrix")?;
    ensure_finite_totals(results, "scoring matrix")?;

    let mut header = vec!["Component".to_string()];
    header.extend(criteria.iter().map(|c| c.name.clone()));
    header.push("Total".to_string());

    let mut sub_header = vec![String::new()];
    sub_header.extend(
        criteria
            .iter()
            .map(|c| format!("weight {}", trim_number(c.weight))),
    );
    sub_header.push(String::new());

    let rows = by_rank(results)
        .into_iter()
        .map(|result| {
            let mut cells = vec![TableCell::plain(result.label())];
            for criterion in criteria {
                cells.push(match result.entry(criterion.id) {
                    Some(entry) => TableCell::banded(score_cell_text(entry, criterion), entry.band()),
                    None => TableCell::plain("-"),
                });
            }
            cells.push(TableCell::emphasized(format!("{:.2}", result.total_score)));
            TableRow::new(cells)
        })
        .collect();

    Ok(Table {
        title: "Scoring Matrix".to_string(),
        header,
        sub_header: Some(sub_header),
        rows,
    })
}

/// Head-to-head comparison of the top `top_n` components: one row per
/// criterion, best score per row marked, trailing totals row.
pub fn tradeoff_table(
    results: &[RankedComponent],
    criteria: &[Criterion],
    top_n: usize,
) -> Result<Table, ReportError> {
    if criteria.is_empty() {
        return Err(ReportError::render("trade-off table", "no criteria to compare"));
    }
    ensure_finite_weights(criteria, "trade-off table")?;
    ensure_finite_totals(results, "trade-off table")?;

    let compared: Vec<&RankedComponent> = by_rank(results).into_iter().take(top_n).collect();
    if compared.is_empty() {
        return Err(ReportError::render("trade-off table", "no ranked components"));
    }

    let mut header = vec!["Criterion".to_string(), "Weight".to_string()];
    header.extend(compared.iter().map(|r| r.label()));

    let mut rows: Vec<TableRow> = criteria
        .iter()
        .map(|criterion| {
            let best = best_scoring_index(&compared, criterion);
            let mut cells = vec![
                TableCell::plain(criterion.name.clone()),
                TableCell::plain(trim_number(criterion.weight)),
            ];
            for (index, result) in compared.iter().enumerate() {
                cells.push(match result.entry(criterion.id) {
                    Some(entry) => TableCell::banded(format!("{}/10", entry.score), entry.band())
                        .with_emphasis(best == Some(index)),
                    None => TableCell::plain("-"),
                });
            }
            TableRow::new(cells)
        })
        .collect();

    let mut totals = vec![
        TableCell::emphasized("Weighted Total"),
        TableCell::plain(String::new()),
    ];
    totals.extend(
        compared
            .iter()
            .map(|r| TableCell::emphasized(format!("{:.2}", r.total_score))),
    );
    rows.push(TableRow::new(totals));

    Ok(Table {
        title: format!("Trade-Off Comparison (Top {})", compared.len()),
        header,
        sub_header: None,
        rows,
    })
}

/// Relative criterion weights, heaviest first, with a proportional text bar.
pub fn weight_distribution(criteria: &[Criterion]) -> Result<Table, ReportError> {
    if criteria.is_empty() {
        return Err(ReportError::render("weight distribution", "no criteria to visualize"));
    }
    ensure_finite_weights(criteria, "weight distribution")?;

    let total: f64 = criteria.iter().map(|c| c.weight).sum();
    if total <= 0.0 {
        return Err(ReportError::render(
            "weight distribution",
            "criterion weights sum to zero",
        ));
    }

    let mut ordered: Vec<&Criterion> = criteria.iter().collect();
    // Stable sort: equal weights keep input order.
    ordered.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let rows = ordered
        .into_iter()
        .map(|criterion| {
            let fraction = criterion.weight / total;
            TableRow::new(vec![
                TableCell::plain(criterion.name.clone()),
                TableCell::plain(trim_number(criterion.weight)),
                TableCell::plain(format!("{:.1}%", fraction * 100.0)),
                TableCell::plain("#".repeat((fraction * WEIGHT_BAR_WIDTH).round().max(1.0) as usize)),
            ])
        })
        .collect();

    Ok(Table {
        title: "Weight Distribution".to_string(),
        header: vec![
            "Criterion".to_string(),
            "Weight".to_string(),
            "Share".to_string(),
            "Distribution".to_string(),
        ],
        sub_header: None,
        rows,
    })
}

/// Criteria definitions for the methodology section.
pub fn criteria_table(criteria: &[Criterion]) -> Result<Table, ReportError> {
    if criteria.is_empty() {
        return Err(ReportError::render("criteria table", "no criteria defined"));
    }
    ensure_finite_weights(criteria, "criteria table")?;

    let rows = criteria
        .iter()
        .map(|criterion| {
            TableRow::new(vec![
                TableCell::plain(criterion.name.clone()),
                TableCell::plain(trim_number(criterion.weight)),
                TableCell::plain(criterion.unit.clone().unwrap_or_else(|| "-".to_string())),
                TableCell::plain(if criterion.higher_is_better {
                    "higher is better"
                } else {
                    "lower is better"
                }),
                TableCell::plain(requirement_text(criterion)),
                TableCell::plain(criterion.description.clone()),
            ])
        })
        .collect();

    Ok(Table {
        title: "Evaluation Criteria".to_string(),
        header: vec![
            "Criterion".to_string(),
            "Weight".to_string(),
            "Unit".to_string(),
            "Direction".to_string(),
            "Requirement".to_string(),
            "Description".to_string(),
        ],
        sub_header: None,
        rows,
    })
}

/// Plain score numbers for the appendix, without presentation formatting.
pub fn raw_score_matrix(
    results: &[RankedComponent],
    criteria: &[Criterion],
) -> Result<Table, ReportError> {
    ensure_finite_weights(criteria, "raw score matrix")?;
    ensure_finite_totals(results, "raw score matrix")?;

    let mut header = vec!["Component".to_string()];
    header.extend(criteria.iter().map(|c| c.name.clone()));
    header.push("Total".to_string());

    let rows = by_rank(results)
        .into_iter()
        .map(|result| {
            let mut cells = vec![TableCell::plain(result.label())];
            for criterion in criteria {
                cells.push(match result.entry(criterion.id) {
                    Some(entry) => TableCell::plain(entry.score.to_string()),
                    None => TableCell::plain("-"),
                });
            }
            cells.push(TableCell::plain(format!("{:.2}", result.total_score)));
            TableRow::new(cells)
        })
        .collect();

    Ok(Table {
        title: "Raw Scores".to_string(),
        header,
        sub_header: None,
        rows,
    })
}

// Results in ascending rank order, without mutating the input.
fn by_rank(results: &[RankedComponent]) -> Vec<&RankedComponent> {
    let mut ordered: Vec<&RankedComponent> = results.iter().collect();
    ordered.sort_by_key(|r| r.rank);
    ordered
}

// Index of the highest-scoring compared component for one criterion; the
// first encountered wins ties. None when no compared component has a score.
fn best_scoring_index(compared: &[&RankedComponent], criterion: &Criterion) -> Option<usize> {
    let mut best: Option<(usize, u8)> = None;
    for (index, result) in compared.iter().enumerate() {
        if let Some(entry) = result.entry(criterion.id) {
            let replace = best.is_none_or(|(_, score)| entry.score > score);
            if replace {
                best = Some((index, entry.score));
            }
        }
    }
    best.map(|(index, _)| index)
}

fn score_cell_text(entry: &ScoreEntry, criterion: &Criterion) -> String {
    match (entry.raw_value, &criterion.unit) {
        (Some(raw), Some(unit)) => format!("{}/10 ({} {})", entry.score, trim_number(raw), unit),
        (Some(raw), None) => format!("{}/10 ({})", entry.score, trim_number(raw)),
        (None, _) => format!("{}/10", entry.score),
    }
}

fn requirement_text(criterion: &Criterion) -> String {
    match (criterion.min_requirement, criterion.max_requirement) {
        (Some(min), Some(max)) => format!("{} to {}", trim_number(min), trim_number(max)),
        (Some(min), None) => format!(">= {}", trim_number(min)),
        (None, Some(max)) => format!("<= {}", trim_number(max)),
        (None, None) => "-".to_string(),
    }
}

// Drop a trailing ".0" from whole numbers so weights read "50", not "50.0".
pub(crate) fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

fn ensure_finite_totals(results: &[RankedComponent], section: &str) -> Result<(), ReportError> {
    match results.iter().find(|r| !r.total_score.is_finite()) {
        Some(bad) => Err(ReportError::render(
            section,
            format!("non-finite total score for {}", bad.label()),
        )),
        None => Ok(()),
    }
}

fn ensure_finite_weights(criteria: &[Criterion], section: &str) -> Result<(), ReportError> {
    match criteria.iter().find(|c| !c.weight.is_finite()) {
        Some(bad) => Err(ReportError::render(
            section,
            format!("non-finite weight for criterion {}", bad.name),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Component, ComponentId, CriterionId};

    fn entry(component: u64, criterion: u64, score: u8) -> ScoreEntry {
        ScoreEntry::new(ComponentId(component), CriterionId(criterion), score)
    }

    fn ranked(id: u64, rank: usize, total: f64, entries: Vec<ScoreEntry>) -> RankedComponent {
        RankedComponent {
            component: Component::new(id, "Mfr", format!("P-{id}")),
            entries,
            total_score: total,
            rank,
        }
    }

    fn sample_criteria() -> Vec<Criterion> {
        vec![
            Criterion::new(1, "Efficiency", 60.0).with_unit("%"),
            Criterion::new(2, "Cost", 40.0),
        ]
    }

    #[test]
    fn scoring_matrix_layout() {
        let criteria = sample_criteria();
        let results = vec![
            ranked(1, 1, 7.2, vec![entry(1, 1, 8).with_raw_value(92.0), entry(1, 2, 6)]),
            ranked(2, 2, 5.0, vec![entry(2, 1, 5)]),
        ];
        let table = scoring_matrix(&results, &criteria).unwrap();

        assert_eq!(table.header, vec!["Component", "Efficiency", "Cost", "Total"]);
        let sub = table.sub_header.as_ref().unwrap();
        assert_eq!(sub[1], "weight 60");

        let first = &table.rows[0];
        assert_eq!(first.cells[0].text, "Mfr P-1");
        assert_eq!(first.cells[1].text, "8/10 (92 %)");
        assert_eq!(first.cells[1].band, Some(ScoreBand::Excellent));
        assert_eq!(first.cells[3].text, "7.20");
        assert!(first.cells[3].emphasis);

        // Missing pair renders as a dash, not a zero.
        assert_eq!(table.rows[1].cells[2].text, "-");
        assert_eq!(table.rows[1].cells[2].band, None);
    }

    #[test]
    fn scoring_matrix_rejects_non_finite_totals() {
        let criteria = sample_criteria();
        let results = vec![ranked(1, 1, f64::NAN, vec![])];
        let err = scoring_matrix(&results, &criteria).unwrap_err();
        assert!(matches!(err, ReportError::Render { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn tradeoff_marks_first_best_on_ties() {
        let criteria = vec![Criterion::new(1, "Efficiency", 50.0)];
        let results = vec![
            ranked(1, 1, 8.0, vec![entry(1, 1, 8)]),
            ranked(2, 2, 8.0, vec![entry(2, 1, 8)]),
            ranked(3, 3, 4.0, vec![entry(3, 1, 4)]),
        ];
        let table = tradeoff_table(&results, &criteria, 3).unwrap();

        let row = &table.rows[0];
        // Columns: criterion, weight, then one per compared component.
        assert!(row.cells[2].emphasis);
        assert!(!row.cells[3].emphasis);
        assert!(!row.cells[4].emphasis);
    }

    #[test]
    fn tradeoff_compares_top_three_only() {
        let criteria = vec![Criterion::new(1, "Efficiency", 50.0)];
        let results: Vec<RankedComponent> = (1..=5)
            .map(|i| ranked(i, i as usize, 10.0 - i as f64, vec![entry(i, 1, 5)]))
            .collect();
        let table = tradeoff_table(&results, &criteria, 3).unwrap();
        assert_eq!(table.header.len(), 5);
        assert_eq!(table.header[2], "Mfr P-1");
        assert_eq!(table.header[4], "Mfr P-3");

        let totals = table.rows.last().unwrap();
        assert_eq!(totals.cells[0].text, "Weighted Total");
        assert_eq!(totals.cells[2].text, "9.00");
    }

    #[test]
    fn weight_distribution_sorts_descending_with_proportional_bars() {
        let criteria = vec![
            Criterion::new(1, "Cost", 25.0),
            Criterion::new(2, "Efficiency", 75.0),
        ];
        let table = weight_distribution(&criteria).unwrap();

        assert_eq!(table.rows[0].cells[0].text, "Efficiency");
        assert_eq!(table.rows[0].cells[2].text, "75.0%");
        assert_eq!(table.rows[0].cells[3].text.len(), 23);
        assert_eq!(table.rows[1].cells[0].text, "Cost");
        assert_eq!(table.rows[1].cells[3].text.len(), 8);
    }

    #[test]
    fn weight_distribution_requires_criteria() {
        assert!(weight_distribution(&[]).is_err());
    }

    #[test]
    fn criteria_table_formats_requirements() {
        let criteria = vec![
            Criterion::new(1, "Efficiency", 50.0).with_unit("%"),
            Criterion {
                min_requirement: Some(3.0),
                max_requirement: Some(5.5),
                ..Criterion::new(2, "Voltage", 50.0)
            },
        ];
        let table = criteria_table(&criteria).unwrap();
        assert_eq!(table.rows[0].cells[4].text, "-");
        assert_eq!(table.rows[1].cells[4].text, "3 to 5.5");
        assert_eq!(table.rows[0].cells[3].text, "higher is better");
    }

    #[test]
    fn raw_matrix_shows_plain_scores() {
        let criteria = sample_criteria();
        let results = vec![ranked(1, 1, 7.2, vec![entry(1, 1, 8).with_raw_value(92.0)])];
        let table = raw_score_matrix(&results, &criteria).unwrap();
        assert_eq!(table.rows[0].cells[1].text, "8");
        assert_eq!(table.rows[0].cells[2].text, "-");
    }

    #[test]
    fn trim_number_drops_trailing_zero() {
        assert_eq!(trim_number(50.0), "50");
        assert_eq!(trim_number(12.5), "12.5");
        assert_eq!(trim_number(0.25), "0.25");
    }
}
