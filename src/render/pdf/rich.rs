//! Rich paginated PDF layout over lopdf.
//!
//! Draws the full section model: styled headings, color-banded tables, vector
//! bar and radar charts, page footers. Layout is cursor-based: the builder
//! walks each section top to bottom, breaking to a fresh page whenever the
//! next element would not fit. Every section after the cover starts on its
//! own page, which keeps the static table-of-contents numbers plausible.
//!
//! Text metrics are approximate (average Helvetica advance width); cell text
//! is truncated to its column budget rather than measured glyph by glyph.

use crate::core::ScoreBand;
use crate::render::pdf::fallback::wrap;
use crate::render::{document_filename, DocumentFormat, DocumentRenderer, RenderedDocument};
use crate::report::charts::{BarChart, RadarChart};
use crate::report::sections::{Section, SectionElement, SectionKind};
use crate::report::tables::{Table, TableRow};
use crate::report::ReportDocument;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 54.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const BODY_SIZE: f32 = 10.0;
const BODY_LEADING: f32 = 14.0;
const CELL_SIZE: f32 = 8.5;
const ROW_HEIGHT: f32 = 16.0;
const HEADER_HEIGHT: f32 = 18.0;
const SUB_HEADER_HEIGHT: f32 = 13.0;
const CELL_PAD: f32 = 3.0;
const BULLET_INDENT: f32 = 12.0;
const BAR_HEIGHT: f32 = 12.0;
const BAR_GAP: f32 = 7.0;
const RADAR_RADIUS: f32 = 92.0;

type Rgb = (f32, f32, f32);

const INK: Rgb = (0.15, 0.16, 0.18);
const MUTED: Rgb = (0.45, 0.47, 0.50);
const ACCENT: Rgb = (0.16, 0.32, 0.52);
const WHITE: Rgb = (1.0, 1.0, 1.0);
const GRID: Rgb = (0.78, 0.80, 0.82);
const SUB_HEADER_BG: Rgb = (0.93, 0.94, 0.95);
const SERIES: [Rgb; 3] = [
    (0.16, 0.32, 0.52),
    (0.77, 0.35, 0.22),
    (0.33, 0.55, 0.31),
];

fn band_fill(band: ScoreBand) -> Rgb {
    match band {
        ScoreBand::Excellent => (0.76, 0.89, 0.77),
        ScoreBand::Good => (0.87, 0.93, 0.79),
        ScoreBand::Fair => (0.99, 0.92, 0.72),
        ScoreBand::Poor => (0.96, 0.78, 0.75),
    }
}

#[derive(Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

pub struct RichPdfRenderer;

impl RichPdfRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RichPdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for RichPdfRenderer {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn render(&self, report: &ReportDocument) -> anyhow::Result<RenderedDocument> {
        let mut layout = Layout::new(&report.meta.project.name);
        for (index, section) in report.sections.iter().enumerate() {
            if section.kind == SectionKind::Cover {
                layout.cover(section);
                continue;
            }
            if index > 0 {
                layout.new_page();
            }
            layout.section_title(&section.title);
            for element in &section.elements {
                layout.element(element);
            }
        }
        Ok(RenderedDocument {
            bytes: layout.finish(&report.meta.project.name)?,
            mime_type: DocumentFormat::Pdf.mime_type().to_string(),
            filename: document_filename(&report.meta.project.name, DocumentFormat::Pdf),
        })
    }
}

/// Cursor layout building one content-operation list per page. Drawing is
/// infallible; encoding and object assembly happen once in [`Layout::finish`].
struct Layout {
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
    footer: String,
}

impl Layout {
    fn new(project_name: &str) -> Self {
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
            footer: project_name.to_string(),
        }
    }

    fn element(&mut self, element: &SectionElement) {
        match element {
            SectionElement::Heading { level, text } => self.heading(*level, text),
            SectionElement::Paragraph(text) => self.paragraph(text),
            SectionElement::Bullets(items) => self.bullets(items),
            SectionElement::Table(table) => self.table(table),
            SectionElement::BarChart(chart) => self.bar_chart(chart),
            SectionElement::RadarChart(chart) => self.radar_chart(chart),
            SectionElement::Note(text) => self.note(text),
        }
    }

    // --- page management ---

    fn new_page(&mut self) {
        self.close_page();
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < MARGIN {
            self.new_page();
        }
    }

    fn close_page(&mut self) {
        if self.ops.is_empty() {
            return;
        }
        let label = format!("{} - Page {}", self.footer, self.pages.len() + 1);
        let x = PAGE_WIDTH - MARGIN - text_width(&label, 8.0);
        self.text_at(x, 30.0, Font::Regular, 8.0, MUTED, &label);
        self.pages.push(std::mem::take(&mut self.ops));
    }

    // --- drawing primitives ---

    fn text_at(&mut self, x: f32, y: f32, font: Font, size: f32, color: Rgb, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(op_color("rg", color));
        self.ops.push(Operation::new(
            "Tf",
            vec![font.resource().into(), Object::Real(size)],
        ));
        self.ops
            .push(Operation::new("Td", vec![Object::Real(x), Object::Real(y)]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_latin1(text), StringFormat::Literal)],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(op_color("rg", color));
        self.ops.push(op_reals("re", &[x, y, width, height]));
        self.ops.push(Operation::new("f", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(op_color("RG", color));
        self.ops.push(op_reals("w", &[width]));
        self.ops.push(op_reals("m", &[from.0, from.1]));
        self.ops.push(op_reals("l", &[to.0, to.1]));
        self.ops.push(Operation::new("S", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    fn stroke_polygon(&mut self, points: &[(f32, f32)], width: f32, color: Rgb) {
        let Some(first) = points.first() else {
            return;
        };
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(op_color("RG", color));
        self.ops.push(op_reals("w", &[width]));
        self.ops.push(op_reals("m", &[first.0, first.1]));
        for point in &points[1..] {
            self.ops.push(op_reals("l", &[point.0, point.1]));
        }
        // "s" closes the path before stroking.
        self.ops.push(Operation::new("s", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    // --- section pieces ---

    /// Cover page: centered title block a third down the page, rule, then the
    /// cover paragraphs (subtitle, component type, generation date).
    fn cover(&mut self, section: &Section) {
        self.y -= 170.0;
        for line in wrap(&section.title, max_chars(CONTENT_WIDTH, 26.0)) {
            self.y -= 32.0;
            let x = MARGIN + ((CONTENT_WIDTH - text_width(&line, 26.0)) / 2.0).max(0.0);
            self.text_at(x, self.y, Font::Bold, 26.0, ACCENT, &line);
        }
        self.y -= 12.0;
        self.stroke_line(
            (PAGE_WIDTH / 2.0 - 90.0, self.y),
            (PAGE_WIDTH / 2.0 + 90.0, self.y),
            1.5,
            ACCENT,
        );
        self.y -= 10.0;
        for element in &section.elements {
            if let SectionElement::Paragraph(text) = element {
                for line in wrap(text, max_chars(CONTENT_WIDTH, 12.0)) {
                    self.y -= 18.0;
                    let x = MARGIN + ((CONTENT_WIDTH - text_width(&line, 12.0)) / 2.0).max(0.0);
                    self.text_at(x, self.y, Font::Regular, 12.0, MUTED, &line);
                }
            }
        }
    }

    fn section_title(&mut self, text: &str) {
        self.ensure_room(44.0);
        self.y -= 24.0;
        self.text_at(MARGIN, self.y, Font::Bold, 18.0, ACCENT, text);
        self.y -= 8.0;
        self.stroke_line(
            (MARGIN, self.y),
            (MARGIN + CONTENT_WIDTH, self.y),
            1.0,
            ACCENT,
        );
        self.y -= 10.0;
    }

    fn heading(&mut self, level: u8, text: &str) {
        let size = if level <= 1 { 14.0 } else { 12.0 };
        self.ensure_room(size + 16.0);
        self.y -= size + 10.0;
        self.text_at(MARGIN, self.y, Font::Bold, size, INK, text);
        self.y -= 6.0;
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap(text, max_chars(CONTENT_WIDTH, BODY_SIZE)) {
            self.ensure_room(BODY_LEADING);
            self.y -= BODY_LEADING;
            self.text_at(MARGIN, self.y, Font::Regular, BODY_SIZE, INK, &line);
        }
        self.y -= 4.0;
    }

    fn bullets(&mut self, items: &[String]) {
        let budget = max_chars(CONTENT_WIDTH - BULLET_INDENT, BODY_SIZE);
        for item in items {
            for (index, line) in wrap(item, budget).into_iter().enumerate() {
                self.ensure_room(BODY_LEADING);
                self.y -= BODY_LEADING;
                if index == 0 {
                    self.fill_rect(MARGIN + 2.0, self.y + 2.5, 2.5, 2.5, INK);
                }
                self.text_at(
                    MARGIN + BULLET_INDENT,
                    self.y,
                    Font::Regular,
                    BODY_SIZE,
                    INK,
                    &line,
                );
            }
        }
        self.y -= 4.0;
    }

    /// Substitute text for a chart or table that could not be built: muted
    /// lines behind a thin marker bar.
    fn note(&mut self, text: &str) {
        let lines = wrap(text, max_chars(CONTENT_WIDTH - 10.0, BODY_SIZE));
        let height = lines.len() as f32 * BODY_LEADING;
        self.ensure_room(height + 8.0);
        self.fill_rect(MARGIN, self.y - height, 2.0, height, MUTED);
        for line in lines {
            self.y -= BODY_LEADING;
            self.text_at(MARGIN + 10.0, self.y, Font::Regular, BODY_SIZE, MUTED, &line);
        }
        self.y -= 8.0;
    }

    fn table(&mut self, table: &Table) {
        if table.header.is_empty() {
            return;
        }
        let widths = column_widths(table.header.len());

        self.ensure_room(HEADER_HEIGHT + SUB_HEADER_HEIGHT + ROW_HEIGHT + 30.0);
        self.y -= 18.0;
        self.text_at(MARGIN, self.y, Font::Bold, 11.0, INK, &table.title);
        self.y -= 6.0;
        self.table_header(table, &widths);

        for row in &table.rows {
            // Repeat the header after a page break so rows stay readable.
            if self.y - ROW_HEIGHT < MARGIN {
                self.new_page();
                self.table_header(table, &widths);
            }
            self.table_row(row, &widths);
        }
        self.y -= 10.0;
    }

    fn table_header(&mut self, table: &Table, widths: &[f32]) {
        self.y -= HEADER_HEIGHT;
        self.fill_rect(MARGIN, self.y, CONTENT_WIDTH, HEADER_HEIGHT, ACCENT);
        let mut x = MARGIN;
        for (text, width) in table.header.iter().zip(widths) {
            self.cell_text(x, *width, self.y + 5.5, Font::Bold, WHITE, text);
            x += width;
        }
        if let Some(sub) = &table.sub_header {
            self.y -= SUB_HEADER_HEIGHT;
            self.fill_rect(MARGIN, self.y, CONTENT_WIDTH, SUB_HEADER_HEIGHT, SUB_HEADER_BG);
            let mut x = MARGIN;
            for (text, width) in sub.iter().zip(widths) {
                self.cell_text(x, *width, self.y + 3.5, Font::Regular, MUTED, text);
                x += width;
            }
        }
    }

    fn table_row(&mut self, row: &TableRow, widths: &[f32]) {
        self.y -= ROW_HEIGHT;
        let mut x = MARGIN;
        for (cell, width) in row.cells.iter().zip(widths) {
            if let Some(band) = cell.band {
                self.fill_rect(x, self.y, *width, ROW_HEIGHT, band_fill(band));
            }
            let font = if cell.emphasis { Font::Bold } else { Font::Regular };
            self.cell_text(x, *width, self.y + 4.5, font, INK, &cell.text);
            x += width;
        }
        self.stroke_line(
            (MARGIN, self.y),
            (MARGIN + CONTENT_WIDTH, self.y),
            0.4,
            GRID,
        );
    }

    fn cell_text(&mut self, x: f32, width: f32, baseline: f32, font: Font, color: Rgb, text: &str) {
        let budget = max_chars(width - 2.0 * CELL_PAD, CELL_SIZE);
        let shown = truncate_to(text, budget);
        self.text_at(x + CELL_PAD, baseline, font, CELL_SIZE, color, &shown);
    }

    fn bar_chart(&mut self, chart: &BarChart) {
        let label_width = 170.0;
        let scale_width = CONTENT_WIDTH - label_width - 46.0;
        let needed = 28.0 + chart.bars.len() as f32 * (BAR_HEIGHT + BAR_GAP) + 12.0;
        self.ensure_room(needed);

        self.y -= 18.0;
        self.text_at(MARGIN, self.y, Font::Bold, 11.0, INK, &chart.title);
        self.y -= 4.0;
        let axis_top = self.y;

        for bar in &chart.bars {
            self.y -= BAR_HEIGHT + BAR_GAP;
            let label = truncate_to(&bar.label, max_chars(label_width - 6.0, CELL_SIZE));
            self.text_at(MARGIN, self.y + 2.0, Font::Regular, CELL_SIZE, INK, &label);
            let fraction = (bar.total_score / 10.0).clamp(0.0, 1.0) as f32;
            self.fill_rect(MARGIN + label_width, self.y, fraction * scale_width, BAR_HEIGHT, ACCENT);
            self.text_at(
                MARGIN + label_width + fraction * scale_width + 4.0,
                self.y + 2.0,
                Font::Regular,
                CELL_SIZE,
                MUTED,
                &format!("{:.2}", bar.total_score),
            );
        }
        // Zero axis down the left edge of the bars.
        self.stroke_line(
            (MARGIN + label_width, axis_top),
            (MARGIN + label_width, self.y),
            0.6,
            GRID,
        );
        self.y -= 10.0;
    }

    fn radar_chart(&mut self, chart: &RadarChart) {
        let legend_height = chart.series.len() as f32 * 14.0;
        self.ensure_room(2.0 * RADAR_RADIUS + legend_height + 66.0);

        self.y -= 18.0;
        self.text_at(MARGIN, self.y, Font::Bold, 11.0, INK, &chart.title);
        let center = (PAGE_WIDTH / 2.0, self.y - 22.0 - RADAR_RADIUS);

        // Reference rings and spokes.
        for ring in [0.25, 0.5, 0.75, 1.0] {
            let points = polygon_points(center, chart.axes.len(), |_| ring * RADAR_RADIUS);
            self.stroke_polygon(&points, 0.5, GRID);
        }
        for (index, axis) in chart.axes.iter().enumerate() {
            let vertex = vertex_at(center, index, chart.axes.len(), RADAR_RADIUS);
            self.stroke_line(center, vertex, 0.5, GRID);
            let label_at = vertex_at(center, index, chart.axes.len(), RADAR_RADIUS + 12.0);
            let label = truncate_to(axis, 18);
            self.text_at(
                label_at.0 - text_width(&label, 8.0) / 2.0,
                label_at.1 - 3.0,
                Font::Regular,
                8.0,
                MUTED,
                &label,
            );
        }

        for (index, series) in chart.series.iter().enumerate() {
            let color = SERIES[index % SERIES.len()];
            let points = polygon_points(center, series.values.len(), |axis| {
                (series.values[axis].clamp(0.0, 1.0) as f32) * RADAR_RADIUS
            });
            self.stroke_polygon(&points, 1.3, color);
        }

        // Legend below the plot.
        self.y = center.1 - RADAR_RADIUS - 20.0;
        for (index, series) in chart.series.iter().enumerate() {
            self.y -= 14.0;
            let color = SERIES[index % SERIES.len()];
            self.fill_rect(MARGIN, self.y + 1.0, 8.0, 8.0, color);
            self.text_at(MARGIN + 14.0, self.y, Font::Regular, CELL_SIZE, INK, &series.label);
        }
        self.y -= 8.0;
    }

    // --- document assembly ---

    fn finish(mut self, title: &str) -> anyhow::Result<Vec<u8>> {
        self.close_page();

        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();
        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        let count = self.pages.len() as i64;
        for operations in std::mem::take(&mut self.pages) {
            let encoded = Content { operations }.encode()?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(encode_latin1(title), StringFormat::Literal),
            "Producer" => Object::String(b"tradestudy".to_vec(), StringFormat::Literal),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn op_color(operator: &str, (r, g, b): Rgb) -> Operation {
    op_reals(operator, &[r, g, b])
}

fn op_reals(operator: &str, values: &[f32]) -> Operation {
    Operation::new(operator, values.iter().map(|v| Object::Real(*v)).collect())
}

/// Vertices of a regular polygon around `center`, axis 0 at the top, with a
/// per-axis radius.
fn polygon_points(
    center: (f32, f32),
    axes: usize,
    radius: impl Fn(usize) -> f32,
) -> Vec<(f32, f32)> {
    (0..axes)
        .map(|axis| vertex_at(center, axis, axes, radius(axis)))
        .collect()
}

fn vertex_at(center: (f32, f32), axis: usize, axes: usize, radius: f32) -> (f32, f32) {
    let angle =
        std::f32::consts::FRAC_PI_2 + axis as f32 * std::f32::consts::TAU / axes.max(1) as f32;
    (
        center.0 + angle.cos() * radius,
        center.1 + angle.sin() * radius,
    )
}

/// First column gets a wider share for the component/criterion label, the
/// rest split evenly.
fn column_widths(columns: usize) -> Vec<f32> {
    let shares = 1.6 + (columns - 1) as f32;
    let mut widths = vec![CONTENT_WIDTH * 1.6 / shares];
    widths.extend(std::iter::repeat(CONTENT_WIDTH / shares).take(columns - 1));
    widths
}

// Approximate average Helvetica advance width.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

fn max_chars(width: f32, size: f32) -> usize {
    (width / (size * 0.5)).floor() as usize
}

fn truncate_to(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let cut: String = text.chars().take(budget.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

/// Latin-1 bytes for a PDF string literal; lopdf handles delimiter escaping.
/// Characters outside Latin-1 become `?`, control characters become spaces.
fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ 0x20..=0xFF => code as u8,
            code if code < 0x20 => b' ',
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::core::{Component, ComponentId, Criterion, CriterionId, ProjectMeta, ScoreEntry};
    use crate::report::{build_report_at, StudyRequest};
    use chrono::{TimeZone, Utc};

    fn sample_document() -> ReportDocument {
        let request = StudyRequest {
            project: ProjectMeta {
                name: "Buck Converter Study".to_string(),
                component_type: "buck converter".to_string(),
                description: "Regulator selection for the sensor board.".to_string(),
            },
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
                    .with_rationale("Best-in-class efficiency across the full load range."),
                ScoreEntry::new(ComponentId(1), CriterionId(2), 6),
                ScoreEntry::new(ComponentId(2), CriterionId(1), 7),
                ScoreEntry::new(ComponentId(2), CriterionId(2), 3)
                    .with_rationale("Unit cost is well above the alternatives at volume."),
            ],
            narrative: "Findings\n\nThe efficiency leader held its margin in every load case we \
                        examined during bench validation."
                .to_string(),
        };
        let at = Utc.with_ymd_and_hms(2024, 5, 14, 9, 30, 0).unwrap();
        build_report_at(&request, &ReportConfig::default(), at).unwrap()
    }

    fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn renders_one_page_per_section_at_least() {
        let document = sample_document();
        let rendered = RichPdfRenderer::new().render(&document).unwrap();
        assert!(rendered.bytes.starts_with(b"%PDF-1.4"));
        assert_eq!(rendered.filename, "Buck_Converter_Study_report.pdf");

        let parsed = Document::load_mem(&rendered.bytes).unwrap();
        // Cover plus one page per remaining section; long sections may add more.
        assert!(parsed.get_pages().len() >= document.sections.len());
        assert!(parsed.trailer.get(b"Root").is_ok());
    }

    #[test]
    fn embeds_standard_fonts() {
        let rendered = RichPdfRenderer::new().render(&sample_document()).unwrap();
        assert!(contains_bytes(&rendered.bytes, b"Helvetica"));
        assert!(contains_bytes(&rendered.bytes, b"Helvetica-Bold"));
    }

    #[test]
    fn column_widths_fill_content_width() {
        for columns in 1..=6 {
            let widths = column_widths(columns);
            assert_eq!(widths.len(), columns);
            let total: f32 = widths.iter().sum();
            assert!((total - CONTENT_WIDTH).abs() < 0.01);
        }
        let widths = column_widths(4);
        assert!(widths[0] > widths[1]);
    }

    #[test]
    fn truncation_respects_budget() {
        assert_eq!(truncate_to("short", 20), "short");
        let long = truncate_to(&"x".repeat(40), 20);
        assert_eq!(long.chars().count(), 20);
        assert!(long.ends_with("..."));
    }

    #[test]
    fn radar_vertices_start_at_top() {
        let top = vertex_at((100.0, 100.0), 0, 4, 50.0);
        assert!((top.0 - 100.0).abs() < 0.001);
        assert!((top.1 - 150.0).abs() < 0.001);
    }

    #[test]
    fn latin1_encoding_replaces_out_of_range() {
        assert_eq!(encode_latin1("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_latin1("\u{03b1}"), vec![b'?']);
        assert_eq!(encode_latin1("a\tb"), vec![b'a', b' ', b'b']);
    }
}
