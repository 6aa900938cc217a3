//! Section assembly.
//!
//! Builds the fixed nine-section document model from the ranked results, the
//! parsed narrative and the prebuilt citation list. Table and chart failures
//! never abort assembly; they degrade into short notes so the rest of the
//! document still builds.

use crate::citations::citation_number;
use crate::config::ReportConfig;
use crate::core::{
    Block, Citation, CitationCategory, Criterion, ProjectMeta, RankedComponent, ScoreBand,
    ScoreEntry,
};
use crate::errors::ReportError;
use crate::report::charts::{self, BarChart, RadarChart};
use crate::report::tables::{self, trim_number, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed section sequence of every report.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Cover,
    TableOfContents,
    ExecutiveSummary,
    Methodology,
    ComponentAnalysis,
    VisualAnalysis,
    Conclusion,
    References,
    Appendix,
}

impl SectionKind {
    pub const ORDERED: [SectionKind; 9] = [
        SectionKind::Cover,
        SectionKind::TableOfContents,
        SectionKind::ExecutiveSummary,
        SectionKind::Methodology,
        SectionKind::ComponentAnalysis,
        SectionKind::VisualAnalysis,
        SectionKind::Conclusion,
        SectionKind::References,
        SectionKind::Appendix,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Cover => "Cover",
            Self::TableOfContents => "Table of Contents",
            Self::ExecutiveSummary => "Executive Summary",
            Self::Methodology => "Methodology",
            Self::ComponentAnalysis => "Component Analysis",
            Self::VisualAnalysis => "Visual Analysis",
            Self::Conclusion => "Conclusion",
            Self::References => "References",
            Self::Appendix => "Appendix",
        }
    }

    /// Static page number printed in the table of contents. Pages are fixed
    /// rather than measured; renderers paginate differently and the listing
    /// only has to be plausible, not exact.
    pub fn toc_page(&self) -> Option<u32> {
        match self {
            Self::ExecutiveSummary => Some(2),
            Self::Methodology => Some(3),
            Self::ComponentAnalysis => Some(4),
            Self::VisualAnalysis => Some(6),
            Self::Conclusion => Some(7),
            Self::References => Some(8),
            Self::Appendix => Some(9),
            Self::Cover | Self::TableOfContents => None,
        }
    }
}

/// One drawable piece of a section. Renderers walk these in order; a backend
/// that cannot draw a kind (fallback PDF and tables, say) skips it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum SectionElement {
    Heading { level: u8, text: String },
    Paragraph(String),
    Bullets(Vec<String>),
    Table(Table),
    BarChart(BarChart),
    RadarChart(RadarChart),
    /// Short substitute text for content that could not be built.
    Note(String),
}

impl From<Block> for SectionElement {
    fn from(block: Block) -> Self {
        match block {
            Block::Heading { level, text } => Self::Heading { level, text },
            Block::Paragraph(text) => Self::Paragraph(text),
            Block::Bullets(items) => Self::Bullets(items),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    pub elements: Vec<SectionElement>,
}

impl Section {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            elements: Vec::new(),
        }
    }

    pub fn titled(kind: SectionKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            elements: Vec::new(),
        }
    }

    fn push(&mut self, element: SectionElement) {
        self.elements.push(element);
    }
}

/// First narrative paragraphs promoted to the executive summary.
struct NarrativeSummary {
    paragraphs: Vec<String>,
    /// Index just past the last block the summary consumed.
    consumed: usize,
}

/// Assembles the section list for one build. Holds borrows only; all mutable
/// per-build state (the citation counter) lives upstream.
pub struct SectionAssembler<'a> {
    meta: &'a ProjectMeta,
    criteria: &'a [Criterion],
    results: &'a [RankedComponent],
    blocks: &'a [Block],
    citations: &'a [Citation],
    config: &'a ReportConfig,
    generated_at: DateTime<Utc>,
}

impl<'a> SectionAssembler<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        meta: &'a ProjectMeta,
        criteria: &'a [Criterion],
        results: &'a [RankedComponent],
        blocks: &'a [Block],
        citations: &'a [Citation],
        config: &'a ReportConfig,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            meta,
            criteria,
            results,
            blocks,
            citations,
            config,
            generated_at,
        }
    }

    /// Produce the nine sections in their fixed order.
    pub fn assemble(&self) -> Vec<Section> {
        let summary = self.narrative_summary();
        let consumed = summary.as_ref().map_or(0, |s| s.consumed);
        vec![
            self.cover(),
            self.table_of_contents(),
            self.executive_summary(summary),
            self.methodology(),
            self.component_analysis(consumed),
            self.visual_analysis(),
            self.conclusion(),
            self.references(),
            self.appendix(),
        ]
    }

    fn cover(&self) -> Section {
        let mut section = Section::titled(SectionKind::Cover, self.meta.name.clone());
        section.push(SectionElement::Paragraph("Component Trade Study".to_string()));
        if !self.meta.component_type.is_empty() {
            section.push(SectionElement::Paragraph(format!(
                "Component type: {}",
                self.meta.component_type
            )));
        }
        if !self.meta.description.is_empty() {
            section.push(SectionElement::Paragraph(self.meta.description.clone()));
        }
        section.push(SectionElement::Paragraph(format!(
            "Generated on {}",
            self.generated_at.format("%Y-%m-%d")
        )));
        section
    }

    fn table_of_contents(&self) -> Section {
        let mut section = Section::new(SectionKind::TableOfContents);
        let entries = SectionKind::ORDERED
            .iter()
            .filter_map(|kind| {
                kind.toc_page()
                    .map(|page| format!("{} - page {}", kind.title(), page))
            })
            .collect();
        section.push(SectionElement::Bullets(entries));
        section
    }

    fn executive_summary(&self, summary: Option<NarrativeSummary>) -> Section {
        let mut section = Section::new(SectionKind::ExecutiveSummary);
        match summary {
            Some(narrative) => {
                for paragraph in narrative.paragraphs {
                    section.push(SectionElement::Paragraph(paragraph));
                }
            }
            None => section.push(SectionElement::Paragraph(self.templated_summary())),
        }
        section
    }

    fn methodology(&self) -> Section {
        let mut section = Section::new(SectionKind::Methodology);
        section.push(SectionElement::Paragraph(format!(
            "Each candidate was scored from 1 to 10 against {} weighted criteria. \
             Weighted total = sum(score x weight) / sum(weight), rounded to two decimals.",
            self.criteria.len()
        )));
        self.push_table(&mut section, tables::criteria_table(self.criteria));
        self.push_table(&mut section, tables::weight_distribution(self.criteria));
        section.push(SectionElement::Heading {
            level: 2,
            text: "Scoring Scale".to_string(),
        });
        let legend = [
            ScoreBand::Excellent,
            ScoreBand::Good,
            ScoreBand::Fair,
            ScoreBand::Poor,
        ]
        .iter()
        .map(|band| format!("{} ({}): {}", band.label(), band.range_label(), band.description()))
        .collect();
        section.push(SectionElement::Bullets(legend));
        section
    }

    fn component_analysis(&self, consumed: usize) -> Section {
        let mut section = Section::new(SectionKind::ComponentAnalysis);

        // Narrative commentary past whatever the executive summary consumed.
        for block in self.blocks.iter().skip(consumed) {
            section.push(block.clone().into());
        }

        self.push_table(&mut section, tables::scoring_matrix(self.results, self.criteria));
        self.push_table(
            &mut section,
            tables::tradeoff_table(self.results, self.criteria, self.config.tradeoff_top_n),
        );

        section.push(SectionElement::Heading {
            level: 2,
            text: "Overall Ranking".to_string(),
        });
        section.push(SectionElement::Bullets(self.ranking_lines()));

        for result in self.by_rank() {
            self.push_detail_card(&mut section, result);
        }
        section
    }

    fn visual_analysis(&self) -> Section {
        let mut section = Section::new(SectionKind::VisualAnalysis);
        let bar = charts::bar_data(self.results, self.config.max_bar_items);
        let radar = charts::radar_data(self.results, self.criteria, self.config.max_radar_items);
        if bar.is_none() && radar.is_none() {
            section.push(SectionElement::Note(
                "No chart data is available for this study.".to_string(),
            ));
            return section;
        }
        section.push(SectionElement::Paragraph(
            "Weighted totals and per-criterion profiles of the leading candidates.".to_string(),
        ));
        if let Some(chart) = bar {
            section.push(SectionElement::BarChart(chart));
        }
        if let Some(chart) = radar {
            section.push(SectionElement::RadarChart(chart));
        }
        section
    }

    fn conclusion(&self) -> Section {
        let mut section = Section::new(SectionKind::Conclusion);
        let ordered = self.by_rank();
        if let Some(top) = ordered.first() {
            let noun = if self.meta.component_type.is_empty() {
                "component"
            } else {
                self.meta.component_type.as_str()
            };
            let mut text = format!(
                "{} achieved the highest weighted total ({:.2}) and is the recommended {}.",
                top.label(),
                top.total_score,
                noun
            );
            if let Some(runner) = ordered.get(1) {
                text.push_str(&format!(
                    " It leads {} by {:.2} points.",
                    runner.label(),
                    top.total_score - runner.total_score
                ));
            }
            section.push(SectionElement::Paragraph(text));
            section.push(SectionElement::Paragraph("Final ranking:".to_string()));
            section.push(SectionElement::Bullets(self.ranking_lines()));
        }
        section
    }

    fn references(&self) -> Section {
        let mut section = Section::new(SectionKind::References);
        if self.citations.is_empty() {
            section.push(SectionElement::Paragraph(
                "No scored entry met the citation thresholds.".to_string(),
            ));
            return section;
        }
        section.push(SectionElement::Paragraph(
            "Numbered citations back the strength and weakness claims in the component analysis."
                .to_string(),
        ));
        // Citations arrive in indexer order, so one component's entries are
        // always consecutive.
        let mut index = 0;
        while index < self.citations.len() {
            let label = self.citations[index].component_label.clone();
            let mut items = Vec::new();
            while index < self.citations.len() && self.citations[index].component_label == label {
                items.push(reference_line(&self.citations[index]));
                index += 1;
            }
            section.push(SectionElement::Heading { level: 2, text: label });
            section.push(SectionElement::Bullets(items));
        }
        section
    }

    fn appendix(&self) -> Section {
        let mut section = Section::new(SectionKind::Appendix);
        self.push_table(&mut section, tables::raw_score_matrix(self.results, self.criteria));
        section.push(SectionElement::Heading {
            level: 2,
            text: "Run Metadata".to_string(),
        });
        let scored_pairs: usize = self.results.iter().map(|r| r.entries.len()).sum();
        section.push(SectionElement::Bullets(vec![
            format!("Generated: {} UTC", self.generated_at.format("%Y-%m-%d %H:%M")),
            format!("Components evaluated: {}", self.results.len()),
            format!("Criteria: {}", self.criteria.len()),
            format!("Scored pairs: {}", scored_pairs),
            format!("Engine version: {}", env!("CARGO_PKG_VERSION")),
        ]));
        section
    }

    // First one or two narrative paragraphs, when their combined text is long
    // enough to stand as a summary. Leading headings are skipped; a bullet
    // list or a later heading ends collection.
    fn narrative_summary(&self) -> Option<NarrativeSummary> {
        let mut paragraphs: Vec<String> = Vec::new();
        let mut consumed = 0;
        for (index, block) in self.blocks.iter().enumerate() {
            match block {
                Block::Heading { .. } if paragraphs.is_empty() => continue,
                Block::Paragraph(text) => {
                    paragraphs.push(text.clone());
                    consumed = index + 1;
                    if paragraphs.len() == 2 {
                        break;
                    }
                }
                _ => break,
            }
        }
        let combined: usize = paragraphs.iter().map(|p| p.chars().count()).sum();
        if combined > self.config.min_narrative_summary_len {
            Some(NarrativeSummary { paragraphs, consumed })
        } else {
            None
        }
    }

    // Deterministic stand-in when the narrative gives no usable summary.
    fn templated_summary(&self) -> String {
        let ordered = self.by_rank();
        let mut text = format!(
            "{} candidates were evaluated against {} weighted criteria.",
            self.results.len(),
            self.criteria.len()
        );
        if let Some(top) = ordered.first() {
            text.push_str(&format!(
                " {} achieved the highest weighted total of {:.2}.",
                top.label(),
                top.total_score
            ));
            if let Some(runner) = ordered.get(1) {
                text.push_str(&format!(
                    " The margin over {} is {:.2} points.",
                    runner.label(),
                    top.total_score - runner.total_score
                ));
            }
        }
        // reduce keeps the first criterion on equal weights.
        let heaviest = self
            .criteria
            .iter()
            .reduce(|best, c| if c.weight > best.weight { c } else { best });
        if let Some(criterion) = heaviest {
            text.push_str(&format!(
                " {} carried the largest weight ({}).",
                criterion.name,
                trim_number(criterion.weight)
            ));
        }
        text
    }

    fn push_detail_card(&self, section: &mut Section, result: &RankedComponent) {
        section.push(SectionElement::Heading {
            level: 2,
            text: format!("{}. {}", result.rank, result.label()),
        });
        if !result.component.description.is_empty() {
            section.push(SectionElement::Paragraph(result.component.description.clone()));
        }
        section.push(SectionElement::Paragraph(format!(
            "Weighted total: {:.2} (rank {} of {})",
            result.total_score,
            result.rank,
            self.results.len()
        )));

        let strengths: Vec<String> = result
            .entries_by_score_desc()
            .into_iter()
            .filter(|e| e.score >= self.config.strength_threshold)
            .map(|e| self.score_line(result, e, CitationCategory::Strength))
            .collect();
        if !strengths.is_empty() {
            section.push(SectionElement::Paragraph("Strengths:".to_string()));
            section.push(SectionElement::Bullets(strengths));
        }

        let weaknesses: Vec<String> = result
            .entries_by_score_desc()
            .into_iter()
            .filter(|e| e.score <= self.config.weakness_threshold)
            .map(|e| self.score_line(result, e, CitationCategory::Weakness))
            .collect();
        if !weaknesses.is_empty() {
            section.push(SectionElement::Paragraph("Weaknesses:".to_string()));
            section.push(SectionElement::Bullets(weaknesses));
        }
    }

    // One strength/weakness line with an inline citation marker when the
    // entry was actually cited.
    fn score_line(
        &self,
        result: &RankedComponent,
        entry: &ScoreEntry,
        category: CitationCategory,
    ) -> String {
        let criterion = self.criteria.iter().find(|c| c.id == entry.criterion_id);
        let name = criterion
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("criterion {}", entry.criterion_id));
        let mut text = format!("{}: {}/10", name, entry.score);
        if let Some(raw) = entry.raw_value {
            match criterion.and_then(|c| c.unit.as_deref()) {
                Some(unit) => text.push_str(&format!(" ({} {})", trim_number(raw), unit)),
                None => text.push_str(&format!(" ({})", trim_number(raw))),
            }
        }
        if let Some(number) =
            citation_number(self.citations, result.component.id, entry.criterion_id, category)
        {
            text.push_str(&format!(" [{}]", number));
        }
        text
    }

    fn ranking_lines(&self) -> Vec<String> {
        self.by_rank()
            .iter()
            .map(|r| format!("{}. {} - {:.2}", r.rank, r.label(), r.total_score))
            .collect()
    }

    fn by_rank(&self) -> Vec<&RankedComponent> {
        let mut ordered: Vec<&RankedComponent> = self.results.iter().collect();
        ordered.sort_by_key(|r| r.rank);
        ordered
    }

    fn push_table(&self, section: &mut Section, table: Result<Table, ReportError>) {
        match table {
            Ok(table) => section.push(SectionElement::Table(table)),
            Err(err) => {
                log::warn!("degrading {} content: {err}", section.title);
                section.push(SectionElement::Note(err.to_string()));
            }
        }
    }
}

fn reference_line(citation: &Citation) -> String {
    let raw = citation
        .raw_value
        .map(|v| format!(", raw {}", trim_number(v)))
        .unwrap_or_default();
    format!(
        "[{}] {} ({}, {}/10{}) - {}",
        citation.number,
        citation.criterion_name,
        citation.category,
        citation.score,
        raw,
        citation.excerpt
    )
}
