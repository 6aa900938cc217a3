//! Report pipeline orchestration.
//!
//! `build_report` is the single entry point collaborators call: it validates
//! the study request, runs scoring, narrative parsing and citation indexing,
//! and assembles the section model that every rendering backend consumes.
//! Each call builds its own state, so concurrent builds never interfere.

pub mod charts;
pub mod sections;
pub mod tables;

use crate::citations::CitationIndexer;
use crate::config::ReportConfig;
use crate::core::{
    Citation, Component, Criterion, ProjectMeta, RankedComponent, ScoreEntry, ScoreSet,
};
use crate::errors::ReportError;
use crate::narrative;
use crate::scoring;
use chrono::{DateTime, Utc};
use sections::{Section, SectionAssembler};
use serde::{Deserialize, Serialize};

/// One study as delivered by the scoring collaborator. Scores arrive as a
/// flat list; the build converts them to a keyed lookup internally.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StudyRequest {
    pub project: ProjectMeta,
    pub criteria: Vec<Criterion>,
    pub components: Vec<Component>,
    pub scores: Vec<ScoreEntry>,
    /// Narrative report text, may be empty.
    #[serde(default)]
    pub narrative: String,
}

/// Build provenance carried on the finished document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportMeta {
    pub project: ProjectMeta,
    pub generated_at: DateTime<Utc>,
    pub engine_version: String,
}

/// The renderer-independent document model: ordered sections plus the raw
/// study outcome for backends that need more than the section stream (the
/// spreadsheet writer reads results and criteria directly).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportDocument {
    pub meta: ReportMeta,
    pub sections: Vec<Section>,
    pub results: Vec<RankedComponent>,
    pub citations: Vec<Citation>,
    pub criteria: Vec<Criterion>,
}

/// Build a report document stamped with the current time.
pub fn build_report(
    request: &StudyRequest,
    config: &ReportConfig,
) -> Result<ReportDocument, ReportError> {
    build_report_at(request, config, Utc::now())
}

/// Build a report document with an injected timestamp.
pub fn build_report_at(
    request: &StudyRequest,
    config: &ReportConfig,
    generated_at: DateTime<Utc>,
) -> Result<ReportDocument, ReportError> {
    ensure_complete(request)?;

    let scores: ScoreSet = request.scores.clone().into();
    let results = scoring::rank(&request.components, &request.criteria, &scores);
    let blocks = narrative::parse(&request.narrative);

    // Fresh indexer per build; citation numbers restart at 1 every time.
    let mut indexer = CitationIndexer::new();
    let citations = indexer.build(&results, &request.criteria, config);

    let sections = SectionAssembler::new(
        &request.project,
        &request.criteria,
        &results,
        &blocks,
        &citations,
        config,
        generated_at,
    )
    .assemble();

    log::debug!(
        "built report for {}: {} components, {} citations",
        request.project.name,
        results.len(),
        citations.len()
    );

    Ok(ReportDocument {
        meta: ReportMeta {
            project: request.project.clone(),
            generated_at,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        sections,
        results,
        citations,
        criteria: request.criteria.clone(),
    })
}

fn ensure_complete(request: &StudyRequest) -> Result<(), ReportError> {
    if request.components.is_empty() {
        return Err(ReportError::incomplete("no components to evaluate"));
    }
    if request.criteria.is_empty() {
        return Err(ReportError::incomplete("no criteria defined"));
    }
    if request.scores.is_empty() {
        return Err(ReportError::incomplete("score set is empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ComponentId, CriterionId};
    use chrono::TimeZone;

    fn sample_request() -> StudyRequest {
        StudyRequest {
            project: ProjectMeta::new("LDO Selection"),
            criteria: vec![
                Criterion::new(1, "Dropout", 50.0).with_unit("mV"),
                Criterion::new(2, "Quiescent Current", 50.0),
            ],
            components: vec![
                Component::new(1, "TI", "TPS7A02"),
                Component::new(2, "onsemi", "NCP171"),
            ],
            scores: vec![
                ScoreEntry::new(ComponentId(1), CriterionId(1), 9)
                    .with_rationale("Lowest dropout of the candidates by a clear margin."),
                ScoreEntry::new(ComponentId(1), CriterionId(2), 8),
                ScoreEntry::new(ComponentId(2), CriterionId(1), 6),
                ScoreEntry::new(ComponentId(2), CriterionId(2), 7),
            ],
            narrative: String::new(),
        }
    }

    #[test]
    fn rejects_empty_components() {
        let mut request = sample_request();
        request.components.clear();
        let err = build_report(&request, &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, ReportError::DataIncomplete(_)));
    }

    #[test]
    fn rejects_empty_criteria() {
        let mut request = sample_request();
        request.criteria.clear();
        assert!(build_report(&request, &ReportConfig::default()).is_err());
    }

    #[test]
    fn rejects_empty_scores() {
        let mut request = sample_request();
        request.scores.clear();
        let err = build_report(&request, &ReportConfig::default()).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn builds_fixed_section_sequence() {
        let document = build_report(&sample_request(), &ReportConfig::default()).unwrap();
        let kinds: Vec<_> = document.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, sections::SectionKind::ORDERED.to_vec());
        assert_eq!(document.results.len(), 2);
    }

    #[test]
    fn repeated_builds_are_identical() {
        let request = sample_request();
        let config = ReportConfig::default();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let first = build_report_at(&request, &config, at).unwrap();
        let second = build_report_at(&request, &config, at).unwrap();
        assert_eq!(first.citations, second.citations);
        assert_eq!(first.sections, second.sections);
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let json = r#"{
            "project": {"name": "Buck Study"},
            "criteria": [{"id": 1, "name": "Efficiency", "weight": 60.0}],
            "components": [{"id": 1, "manufacturer": "TI", "part_number": "TPS62840"}],
            "scores": [{"component_id": 1, "criterion_id": 1, "score": 9}]
        }"#;
        let request: StudyRequest = serde_json::from_str(json).unwrap();
        assert!(request.narrative.is_empty());
        assert!(request.criteria[0].higher_is_better);
        let document = build_report(&request, &ReportConfig::default()).unwrap();
        assert_eq!(document.results[0].rank, 1);
    }
}
