//! Chart-ready data derived from ranked results.
//!
//! Pure data transforms: the builders return plot-ready structures and leave
//! pixels and vectors to the rendering backends. Both builders answer `None`
//! when there is not enough data to plot, which the assembler treats as
//! "skip this chart", not as a failure.

use crate::core::{Criterion, RankedComponent};
use serde::{Deserialize, Serialize};

/// Neutral axis value for (component, criterion) pairs without a score.
const NEUTRAL_AXIS_VALUE: f64 = 0.5;

/// Weighted-total comparison, best rank first.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub bars: Vec<Bar>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub label: String,
    /// Weighted total on the 0-10 scale.
    pub total_score: f64,
}

/// Per-criterion score profile of the top components.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RadarChart {
    pub title: String,
    /// One axis per criterion, in criteria input order.
    pub axes: Vec<String>,
    pub series: Vec<RadarSeries>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RadarSeries {
    pub label: String,
    /// One value per axis, normalized to [0, 1].
    pub values: Vec<f64>,
}

/// Bar-chart data for the ranked components, truncated to `max_items`.
pub fn bar_data(results: &[RankedComponent], max_items: usize) -> Option<BarChart> {
    if results.is_empty() {
        return None;
    }
    let mut ordered: Vec<&RankedComponent> = results.iter().collect();
    ordered.sort_by_key(|r| r.rank);

    let bars = ordered
        .into_iter()
        .take(max_items)
        .map(|r| Bar {
            label: r.label(),
            total_score: r.total_score,
        })
        .collect();
    Some(BarChart {
        title: "Weighted Total Comparison".to_string(),
        bars,
    })
}

/// Radar-chart data for the top `max_items` components.
///
/// Every criterion contributes an axis; pairs the component was not scored
/// on plot at the neutral mid-value instead of dropping the axis.
pub fn radar_data(
    results: &[RankedComponent],
    criteria: &[Criterion],
    max_items: usize,
) -> Option<RadarChart> {
    if results.is_empty() || criteria.is_empty() {
        return None;
    }
    let mut ordered: Vec<&RankedComponent> = results.iter().collect();
    ordered.sort_by_key(|r| r.rank);

    let axes = criteria.iter().map(|c| c.name.clone()).collect();
    let series = ordered
        .into_iter()
        .take(max_items)
        .map(|r| RadarSeries {
            label: r.label(),
            values: criteria
                .iter()
                .map(|criterion| {
                    r.entry(criterion.id)
                        .map_or(NEUTRAL_AXIS_VALUE, |e| f64::from(e.score) / 10.0)
                })
                .collect(),
        })
        .collect();
    Some(RadarChart {
        title: "Criterion Profile of Top Components".to_string(),
        axes,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Component, ComponentId, CriterionId, ScoreEntry};

    fn ranked(id: u64, rank: usize, total: f64, entries: Vec<ScoreEntry>) -> RankedComponent {
        RankedComponent {
            component: Component::new(id, "Mfr", format!("P-{id}")),
            entries,
            total_score: total,
            rank,
        }
    }

    #[test]
    fn bar_data_orders_by_rank_and_truncates() {
        let results = vec![
            ranked(2, 2, 6.0, vec![]),
            ranked(1, 1, 8.0, vec![]),
            ranked(3, 3, 4.0, vec![]),
        ];
        let chart = bar_data(&results, 2).unwrap();
        assert_eq!(chart.bars.len(), 2);
        assert_eq!(chart.bars[0].label, "Mfr P-1");
        assert_eq!(chart.bars[0].total_score, 8.0);
        assert_eq!(chart.bars[1].label, "Mfr P-2");
    }

    #[test]
    fn bar_data_is_none_for_empty_results() {
        assert!(bar_data(&[], 8).is_none());
    }

    #[test]
    fn radar_values_normalize_to_unit_range() {
        let criteria = vec![Criterion::new(1, "Efficiency", 50.0)];
        let results = vec![ranked(
            1,
            1,
            8.0,
            vec![ScoreEntry::new(ComponentId(1), CriterionId(1), 8)],
        )];
        let chart = radar_data(&results, &criteria, 3).unwrap();
        assert_eq!(chart.axes, vec!["Efficiency".to_string()]);
        assert_eq!(chart.series[0].values, vec![0.8]);
    }

    #[test]
    fn radar_missing_pairs_use_neutral_mid_value() {
        let criteria = vec![
            Criterion::new(1, "Efficiency", 50.0),
            Criterion::new(2, "Cost", 50.0),
        ];
        let results = vec![ranked(
            1,
            1,
            4.5,
            vec![ScoreEntry::new(ComponentId(1), CriterionId(1), 9)],
        )];
        let chart = radar_data(&results, &criteria, 3).unwrap();
        assert_eq!(chart.series[0].values, vec![0.9, 0.5]);
    }

    #[test]
    fn radar_is_none_when_either_input_empty() {
        let criteria = vec![Criterion::new(1, "Efficiency", 50.0)];
        assert!(radar_data(&[], &criteria, 3).is_none());
        assert!(radar_data(&[ranked(1, 1, 5.0, vec![])], &[], 3).is_none());
    }

    #[test]
    fn radar_takes_top_components_only() {
        let criteria = vec![Criterion::new(1, "Efficiency", 50.0)];
        let results: Vec<RankedComponent> = (1..=5)
            .map(|i| ranked(i, i as usize, 10.0 - i as f64, vec![]))
            .collect();
        let chart = radar_data(&results, &criteria, 3).unwrap();
        assert_eq!(chart.series.len(), 3);
        assert_eq!(chart.series[0].label, "Mfr P-1");
        assert_eq!(chart.series[2].label, "Mfr P-3");
    }
}
