//! Citation numbering invariants checked end to end: inline markers in the
//! component analysis must agree with the references section, numbering must
//! be reproducible across builds, and the mid-band dead zone stays uncited.

use chrono::{TimeZone, Utc};
use regex::Regex;
use tradestudy::report::sections::{Section, SectionElement, SectionKind};
use tradestudy::*;

fn request_with_scores(scores: Vec<ScoreEntry>, criteria: Vec<Criterion>) -> StudyRequest {
    let mut ids: Vec<u64> = scores.iter().map(|s| s.component_id.0).collect();
    ids.sort_unstable();
    ids.dedup();
    StudyRequest {
        project: ProjectMeta::new("Sensor Interface Study"),
        criteria,
        components: ids
            .into_iter()
            .map(|id| Component::new(id, "Vendor", format!("PART-{id}")))
            .collect(),
        scores,
        narrative: String::new(),
    }
}

fn rich_request() -> StudyRequest {
    let criteria = vec![
        Criterion::new(1, "Accuracy", 40.0),
        Criterion::new(2, "Power", 30.0),
        Criterion::new(3, "Interface", 30.0),
    ];
    let rationale = "Measured on the bench against the reference design.";
    let scores = vec![
        ScoreEntry::new(ComponentId(1), CriterionId(1), 9).with_rationale(rationale),
        ScoreEntry::new(ComponentId(1), CriterionId(2), 3).with_rationale(rationale),
        ScoreEntry::new(ComponentId(1), CriterionId(3), 8).with_rationale(rationale),
        ScoreEntry::new(ComponentId(2), CriterionId(1), 7).with_rationale(rationale),
        ScoreEntry::new(ComponentId(2), CriterionId(2), 8).with_rationale(rationale),
        ScoreEntry::new(ComponentId(2), CriterionId(3), 2).with_rationale(rationale),
        ScoreEntry::new(ComponentId(3), CriterionId(1), 4).with_rationale(rationale),
        ScoreEntry::new(ComponentId(3), CriterionId(2), 7).with_rationale(rationale),
        ScoreEntry::new(ComponentId(3), CriterionId(3), 6).with_rationale(rationale),
    ];
    request_with_scores(scores, criteria)
}

fn build(request: &StudyRequest) -> ReportDocument {
    let at = Utc.with_ymd_and_hms(2024, 7, 2, 15, 0, 0).unwrap();
    build_report_at(request, &ReportConfig::default(), at).unwrap()
}

fn section(document: &ReportDocument, kind: SectionKind) -> &Section {
    document.sections.iter().find(|s| s.kind == kind).unwrap()
}

fn bullet_items(section: &Section) -> Vec<String> {
    section
        .elements
        .iter()
        .filter_map(|e| match e {
            SectionElement::Bullets(items) => Some(items.clone()),
            _ => None,
        })
        .flatten()
        .collect()
}

fn marker_numbers(items: &[String], pattern: &str) -> Vec<usize> {
    let re = Regex::new(pattern).unwrap();
    items
        .iter()
        .flat_map(|item| {
            re.captures_iter(item)
                .map(|c| c[1].parse::<usize>().unwrap())
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn reference_numbers_are_sequential_from_one() {
    let document = build(&rich_request());
    let lines = bullet_items(section(&document, SectionKind::References));
    let numbers = marker_numbers(&lines, r"^\[(\d+)\]");
    let expected: Vec<usize> = (1..=document.citations.len()).collect();
    assert_eq!(numbers, expected);
    assert!(!document.citations.is_empty());
}

#[test]
fn inline_markers_match_the_references_section() {
    let document = build(&rich_request());
    let analysis = bullet_items(section(&document, SectionKind::ComponentAnalysis));
    let mut inline = marker_numbers(&analysis, r"\[(\d+)\]");
    inline.sort_unstable();

    let expected: Vec<usize> = document.citations.iter().map(|c| c.number).collect();
    assert_eq!(inline, expected);
}

#[test]
fn criteria_sharing_a_name_keep_distinct_markers() {
    // Criterion names are not unique; markers must resolve by id.
    let criteria = vec![
        Criterion::new(1, "Cost", 50.0),
        Criterion::new(2, "Cost", 50.0),
    ];
    let rationale = "Quoted at volume pricing from two distributors.";
    let scores = vec![
        ScoreEntry::new(ComponentId(1), CriterionId(1), 9).with_rationale(rationale),
        ScoreEntry::new(ComponentId(1), CriterionId(2), 8).with_rationale(rationale),
    ];
    let document = build(&request_with_scores(scores, criteria));
    assert_eq!(document.citations.len(), 2);

    let analysis = bullet_items(section(&document, SectionKind::ComponentAnalysis));
    let mut inline = marker_numbers(&analysis, r"\[(\d+)\]");
    inline.sort_unstable();

    let expected: Vec<usize> = document.citations.iter().map(|c| c.number).collect();
    assert_eq!(inline, expected);
}

#[test]
fn inline_markers_sit_on_the_cited_component_card() {
    let document = build(&rich_request());
    let analysis = section(&document, SectionKind::ComponentAnalysis);

    // Walk the card headings; every marker after a card heading must cite
    // that card's component.
    let mut current_card = String::new();
    let re = Regex::new(r"\[(\d+)\]").unwrap();
    for element in &analysis.elements {
        match element {
            SectionElement::Heading { text, .. } => {
                if let Some((_, label)) = text.split_once(". ") {
                    current_card = label.to_string();
                }
            }
            SectionElement::Bullets(items) => {
                for item in items {
                    for capture in re.captures_iter(item) {
                        let number: usize = capture[1].parse().unwrap();
                        let citation = document
                            .citations
                            .iter()
                            .find(|c| c.number == number)
                            .unwrap();
                        assert_eq!(
                            citation.component_label, current_card,
                            "marker [{number}] on card {current_card}"
                        );
                    }
                }
            }
            _ => {}
        }
    }
}

#[test]
fn numbering_is_reproducible_across_builds() {
    let request = rich_request();
    let first = build_report(&request, &ReportConfig::default()).unwrap();
    let second = build_report(&request, &ReportConfig::default()).unwrap();
    // Timestamps differ between the builds; the citation list must not.
    assert_eq!(first.citations, second.citations);
}

#[test]
fn traversal_is_rank_major_then_score_descending() {
    let document = build(&rich_request());
    // Weighted totals: PART-1 6.9, PART-2 5.8, PART-3 5.5, so PART-1 leads
    // the traversal and its best-scoring strength takes number 1.
    let first = &document.citations[0];
    assert_eq!(first.number, 1);
    assert_eq!(first.component_label, "Vendor PART-1");
    assert_eq!(first.criterion_name, "Accuracy");
    assert_eq!(first.category, CitationCategory::Strength);

    // Strengths precede weaknesses within one component.
    let labels: Vec<(&str, CitationCategory)> = document
        .citations
        .iter()
        .map(|c| (c.component_label.as_str(), c.category))
        .collect();
    let part1: Vec<_> = labels.iter().filter(|(l, _)| *l == "Vendor PART-1").collect();
    assert_eq!(part1.len(), 3);
    assert_eq!(part1[0].1, CitationCategory::Strength);
    assert_eq!(part1[2].1, CitationCategory::Weakness);
}

#[test]
fn mid_band_scores_are_never_cited() {
    let criteria = vec![Criterion::new(1, "Fit", 50.0), Criterion::new(2, "Cost", 50.0)];
    let rationale = "Detailed justification well past the length gate.";
    let scores = vec![
        ScoreEntry::new(ComponentId(1), CriterionId(1), 5).with_rationale(rationale),
        ScoreEntry::new(ComponentId(1), CriterionId(2), 6).with_rationale(rationale),
    ];
    let document = build(&request_with_scores(scores, criteria));
    assert!(document.citations.is_empty());

    let references = section(&document, SectionKind::References);
    let text: Vec<&String> = references
        .elements
        .iter()
        .filter_map(|e| match e {
            SectionElement::Paragraph(text) => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(text[0], "No scored entry met the citation thresholds.");
}

#[test]
fn short_rationales_fail_the_substance_gate() {
    let criteria = vec![Criterion::new(1, "Fit", 100.0)];
    let scores = vec![
        ScoreEntry::new(ComponentId(1), CriterionId(1), 9).with_rationale("Great fit."),
    ];
    let document = build(&request_with_scores(scores, criteria));
    // "Great fit." is 10 chars; the gate requires more than min_rationale_len.
    assert!(document.citations.is_empty());
}

#[test]
fn citation_volume_caps_per_category() {
    let criteria: Vec<Criterion> = (1..=6)
        .map(|i| Criterion::new(i, format!("Criterion {i}"), 10.0))
        .collect();
    let rationale = "Long enough rationale for the citation substance gate.";
    let scores: Vec<ScoreEntry> = (1..=6)
        .map(|i| ScoreEntry::new(ComponentId(1), CriterionId(i), 8).with_rationale(rationale))
        .collect();
    let document = build(&request_with_scores(scores, criteria));
    assert_eq!(document.citations.len(), 4);
    assert!(document
        .citations
        .iter()
        .all(|c| c.category == CitationCategory::Strength));
}

#[test]
fn thresholds_are_configurable() {
    let config = ReportConfig {
        strength_threshold: 9,
        ..ReportConfig::default()
    };
    let at = Utc.with_ymd_and_hms(2024, 7, 2, 15, 0, 0).unwrap();
    let document = build_report_at(&rich_request(), &config, at).unwrap();
    assert!(document
        .citations
        .iter()
        .filter(|c| c.category == CitationCategory::Strength)
        .all(|c| c.score >= 9));
}
