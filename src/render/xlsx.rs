//! Spreadsheet backend over rust_xlsxwriter.
//!
//! Writes the study data as a five-sheet workbook: Summary, Criteria,
//! Components, Score Matrix and Rankings. The matrix sheet carries one
//! score / raw value / rationale / confidence column group per criterion and
//! one row per component in rank order, with score cells colored by band.
//! This backend reads the ranked results directly rather than the section
//! stream; prose sections have no spreadsheet rendition.

use crate::core::{Criterion, RankedComponent, ScoreBand};
use crate::render::{document_filename, DocumentFormat, DocumentRenderer, RenderedDocument};
use crate::report::tables::trim_number;
use crate::report::ReportDocument;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet, XlsxError};

/// Matrix columns per criterion: score, raw value, rationale, confidence.
const GROUP_WIDTH: u16 = 4;

pub struct XlsxRenderer;

impl XlsxRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for XlsxRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for XlsxRenderer {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Xlsx
    }

    fn render(&self, report: &ReportDocument) -> anyhow::Result<RenderedDocument> {
        Ok(RenderedDocument {
            bytes: write_workbook(report)?,
            mime_type: DocumentFormat::Xlsx.mime_type().to_string(),
            filename: document_filename(&report.meta.project.name, DocumentFormat::Xlsx),
        })
    }
}

fn write_workbook(report: &ReportDocument) -> Result<Vec<u8>, XlsxError> {
    let formats = SheetFormats::new();
    let results = by_rank(&report.results);

    let mut workbook = Workbook::new();
    summary_sheet(workbook.add_worksheet(), report, &results, &formats)?;
    criteria_sheet(workbook.add_worksheet(), &report.criteria, &formats)?;
    components_sheet(workbook.add_worksheet(), &results, &formats)?;
    matrix_sheet(workbook.add_worksheet(), &results, &report.criteria, &formats)?;
    rankings_sheet(workbook.add_worksheet(), &results, &formats)?;
    workbook.save_to_buffer()
}

/// Cell formats shared by all sheets.
struct SheetFormats {
    title: Format,
    header: Format,
    sub_header: Format,
    label: Format,
    total: Format,
    fraction: Format,
    wrap: Format,
}

impl SheetFormats {
    fn new() -> Self {
        Self {
            title: Format::new().set_bold().set_font_size(14),
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(0x295285))
                .set_align(FormatAlign::Center),
            sub_header: Format::new()
                .set_background_color(Color::RGB(0xEDEFF1))
                .set_align(FormatAlign::Center),
            label: Format::new().set_bold(),
            total: Format::new().set_bold().set_num_format("0.00"),
            fraction: Format::new().set_num_format("0.00"),
            wrap: Format::new().set_text_wrap(),
        }
    }

    fn banded(&self, band: ScoreBand) -> Format {
        Format::new()
            .set_align(FormatAlign::Center)
            .set_background_color(band_color(band))
    }
}

// The classic spreadsheet conditional-formatting palette.
fn band_color(band: ScoreBand) -> Color {
    match band {
        ScoreBand::Excellent => Color::RGB(0xC6EFCE),
        ScoreBand::Good => Color::RGB(0xE2EFDA),
        ScoreBand::Fair => Color::RGB(0xFFEB9C),
        ScoreBand::Poor => Color::RGB(0xFFC7CE),
    }
}

fn by_rank(results: &[RankedComponent]) -> Vec<&RankedComponent> {
    let mut ordered: Vec<&RankedComponent> = results.iter().collect();
    ordered.sort_by_key(|r| r.rank);
    ordered
}

fn summary_sheet(
    sheet: &mut Worksheet,
    report: &ReportDocument,
    results: &[&RankedComponent],
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    sheet.set_name("Summary")?;
    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(1, 52)?;

    sheet.write_string_with_format(0, 0, &report.meta.project.name, &formats.title)?;

    let scored_pairs: usize = report.results.iter().map(|r| r.entries.len()).sum();
    let mut row = 2;
    let mut pair = |sheet: &mut Worksheet, key: &str, value: String| -> Result<(), XlsxError> {
        sheet.write_string_with_format(row, 0, key, &formats.label)?;
        sheet.write_string(row, 1, value)?;
        row += 1;
        Ok(())
    };

    if !report.meta.project.component_type.is_empty() {
        pair(sheet, "Component type", report.meta.project.component_type.clone())?;
    }
    if !report.meta.project.description.is_empty() {
        pair(sheet, "Description", report.meta.project.description.clone())?;
    }
    pair(
        sheet,
        "Generated",
        format!("{} UTC", report.meta.generated_at.format("%Y-%m-%d %H:%M")),
    )?;
    pair(sheet, "Engine version", report.meta.engine_version.clone())?;
    pair(sheet, "Components evaluated", report.results.len().to_string())?;
    pair(sheet, "Criteria", report.criteria.len().to_string())?;
    pair(sheet, "Scored pairs", scored_pairs.to_string())?;
    pair(sheet, "Citations", report.citations.len().to_string())?;
    if let Some(top) = results.first() {
        pair(
            sheet,
            "Recommended",
            format!("{} ({:.2})", top.label(), top.total_score),
        )?;
    }
    Ok(())
}

fn criteria_sheet(
    sheet: &mut Worksheet,
    criteria: &[Criterion],
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    sheet.set_name("Criteria")?;
    let headers = [
        "Name",
        "Weight",
        "Unit",
        "Direction",
        "Min Requirement",
        "Max Requirement",
        "Description",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &formats.header)?;
    }
    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(6, 48)?;

    for (index, criterion) in criteria.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, &criterion.name)?;
        sheet.write_number(row, 1, criterion.weight)?;
        if let Some(unit) = &criterion.unit {
            sheet.write_string(row, 2, unit)?;
        }
        sheet.write_string(
            row,
            3,
            if criterion.higher_is_better {
                "higher is better"
            } else {
                "lower is better"
            },
        )?;
        if let Some(min) = criterion.min_requirement {
            sheet.write_number(row, 4, min)?;
        }
        if let Some(max) = criterion.max_requirement {
            sheet.write_number(row, 5, max)?;
        }
        sheet.write_string_with_format(row, 6, &criterion.description, &formats.wrap)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn components_sheet(
    sheet: &mut Worksheet,
    results: &[&RankedComponent],
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    sheet.set_name("Components")?;
    for (col, header) in ["Manufacturer", "Part Number", "Description"].iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &formats.header)?;
    }
    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(1, 20)?;
    sheet.set_column_width(2, 56)?;

    for (index, result) in results.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, &result.component.manufacturer)?;
        sheet.write_string(row, 1, &result.component.part_number)?;
        sheet.write_string_with_format(row, 2, &result.component.description, &formats.wrap)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

/// Detailed matrix: two header rows (criterion group spans, then the
/// score / raw value / rationale / confidence labels), one data row per
/// component, trailing weighted-total column.
fn matrix_sheet(
    sheet: &mut Worksheet,
    results: &[&RankedComponent],
    criteria: &[Criterion],
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    sheet.set_name("Score Matrix")?;

    sheet.merge_range(0, 0, 1, 0, "Component", &formats.header)?;
    for (index, criterion) in criteria.iter().enumerate() {
        let base = group_base(index);
        let title = format!("{} (weight {})", criterion.name, trim_number(criterion.weight));
        sheet.merge_range(0, base, 0, base + GROUP_WIDTH - 1, &title, &formats.header)?;
        for (offset, label) in ["Score", "Raw Value", "Rationale", "Confidence"]
            .iter()
            .enumerate()
        {
            sheet.write_string_with_format(1, base + offset as u16, *label, &formats.sub_header)?;
        }
        sheet.set_column_width(base, 8)?;
        sheet.set_column_width(base + 1, 11)?;
        sheet.set_column_width(base + 2, 42)?;
        sheet.set_column_width(base + 3, 11)?;
    }
    let total_col = group_base(criteria.len());
    sheet.merge_range(0, total_col, 1, total_col, "Total", &formats.header)?;
    sheet.set_column_width(0, 28)?;
    sheet.set_column_width(total_col, 10)?;

    for (index, result) in results.iter().enumerate() {
        let row = index as u32 + 2;
        sheet.write_string(row, 0, result.label())?;
        for (criterion_index, criterion) in criteria.iter().enumerate() {
            // Missing pairs leave the whole group blank.
            let Some(entry) = result.entry(criterion.id) else {
                continue;
            };
            let base = group_base(criterion_index);
            sheet.write_number_with_format(
                row,
                base,
                f64::from(entry.score),
                &formats.banded(entry.band()),
            )?;
            if let Some(raw) = entry.raw_value {
                sheet.write_number(row, base + 1, raw)?;
            }
            if let Some(rationale) = &entry.rationale {
                sheet.write_string_with_format(row, base + 2, rationale, &formats.wrap)?;
            }
            if let Some(confidence) = entry.confidence {
                sheet.write_number_with_format(row, base + 3, confidence, &formats.fraction)?;
            }
        }
        sheet.write_number_with_format(row, total_col, result.total_score, &formats.total)?;
    }
    sheet.set_freeze_panes(2, 1)?;
    Ok(())
}

fn group_base(criterion_index: usize) -> u16 {
    1 + criterion_index as u16 * GROUP_WIDTH
}

fn rankings_sheet(
    sheet: &mut Worksheet,
    results: &[&RankedComponent],
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    sheet.set_name("Rankings")?;
    let headers = ["Rank", "Component", "Manufacturer", "Part Number", "Total Score"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &formats.header)?;
    }
    sheet.set_column_width(1, 30)?;
    sheet.set_column_width(2, 24)?;
    sheet.set_column_width(3, 20)?;
    sheet.set_column_width(4, 12)?;

    for (index, result) in results.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_number(row, 0, result.rank as f64)?;
        sheet.write_string(row, 1, result.label())?;
        sheet.write_string(row, 2, &result.component.manufacturer)?;
        sheet.write_string(row, 3, &result.component.part_number)?;
        sheet.write_number_with_format(row, 4, result.total_score, &formats.total)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::core::{Component, ComponentId, CriterionId, ProjectMeta, ScoreEntry};
    use crate::report::{build_report_at, StudyRequest};
    use chrono::{TimeZone, Utc};

    fn sample_document() -> ReportDocument {
        let request = StudyRequest {
            project: ProjectMeta::new("Buck Converter Study"),
            criteria: vec![
                Criterion::new(1, "Efficiency", 60.0).with_unit("%"),
                Criterion::new(2, "Cost", 40.0),
            ],
            components: vec![
                Component::new(1, "TI", "TPS62840"),
                Component::new(2, "Analog", "ADP5301"),
            ],
            scores: vec![
                ScoreEntry::new(ComponentId(1), CriterionId(1), 9)
                    .with_raw_value(92.0)
                    .with_rationale("Best-in-class efficiency across the full load range.")
                    .with_confidence(0.9),
                ScoreEntry::new(ComponentId(1), CriterionId(2), 6),
                ScoreEntry::new(ComponentId(2), CriterionId(1), 7),
                ScoreEntry::new(ComponentId(2), CriterionId(2), 3)
                    .with_rationale("Unit cost is well above the alternatives at volume."),
            ],
            narrative: String::new(),
        };
        let at = Utc.with_ymd_and_hms(2024, 5, 14, 9, 30, 0).unwrap();
        build_report_at(&request, &ReportConfig::default(), at).unwrap()
    }

    fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn produces_zip_container() {
        let rendered = XlsxRenderer::new().render(&sample_document()).unwrap();
        assert!(rendered.bytes.starts_with(b"PK\x03\x04"));
        assert_eq!(rendered.filename, "Buck_Converter_Study_report.xlsx");
        assert_eq!(
            rendered.mime_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn workbook_holds_five_sheets() {
        // Zip entry names sit uncompressed in the local file headers.
        let rendered = XlsxRenderer::new().render(&sample_document()).unwrap();
        assert!(contains_bytes(&rendered.bytes, b"xl/workbook.xml"));
        assert!(contains_bytes(&rendered.bytes, b"xl/worksheets/sheet5.xml"));
        assert!(!contains_bytes(&rendered.bytes, b"xl/worksheets/sheet6.xml"));
    }

    #[test]
    fn band_colors_follow_score_buckets() {
        assert_eq!(band_color(ScoreBand::Excellent), Color::RGB(0xC6EFCE));
        assert_eq!(band_color(ScoreBand::Poor), Color::RGB(0xFFC7CE));
    }

    #[test]
    fn matrix_group_columns_are_four_wide() {
        assert_eq!(group_base(0), 1);
        assert_eq!(group_base(1), 5);
        assert_eq!(group_base(2), 9);
    }
}
