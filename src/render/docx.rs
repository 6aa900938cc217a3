//! Editable-document backend over docx-rs.
//!
//! Emits the section model as a flat sequence of styled headings, body
//! paragraphs and bulleted lists. Tables and charts are not reproduced here;
//! this output exists for editing the prose, while the PDF and spreadsheet
//! carry the full data.

use crate::render::{document_filename, DocumentFormat, DocumentRenderer, RenderedDocument};
use crate::report::sections::{Section, SectionElement, SectionKind};
use crate::report::ReportDocument;
use docx_rs::{
    AbstractNumbering, AlignmentType, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat,
    Numbering, NumberingId, Paragraph, Run, Start, Style, StyleType,
};
use std::io::Cursor;

// Word reserves numbering id 1 for its own defaults.
const BULLET_NUMBERING: usize = 2;

const ACCENT_HEX: &str = "295285";
const MUTED_HEX: &str = "737880";

pub struct DocxRenderer;

impl DocxRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for DocxRenderer {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn render(&self, report: &ReportDocument) -> anyhow::Result<RenderedDocument> {
        let mut docx = base_document();
        for section in &report.sections {
            docx = push_section(docx, section);
        }
        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer)?;
        Ok(RenderedDocument {
            bytes: buffer.into_inner(),
            mime_type: DocumentFormat::Docx.mime_type().to_string(),
            filename: document_filename(&report.meta.project.name, DocumentFormat::Docx),
        })
    }
}

/// Empty document carrying the style set and the bullet list definition.
/// Sizes are half-points.
fn base_document() -> Docx {
    Docx::new()
        .add_style(
            Style::new("Title", StyleType::Paragraph)
                .name("Title")
                .size(52)
                .bold()
                .color(ACCENT_HEX),
        )
        .add_style(
            Style::new("Subtitle", StyleType::Paragraph)
                .name("Subtitle")
                .size(24)
                .color(MUTED_HEX),
        )
        .add_style(
            Style::new("Heading1", StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold()
                .color(ACCENT_HEX),
        )
        .add_style(
            Style::new("Heading2", StyleType::Paragraph)
                .name("Heading 2")
                .size(26)
                .bold(),
        )
        .add_style(
            Style::new("Heading3", StyleType::Paragraph)
                .name("Heading 3")
                .size(24)
                .bold(),
        )
        .add_style(
            Style::new("Note", StyleType::Paragraph)
                .name("Note")
                .italic()
                .color(MUTED_HEX),
        )
        .add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING).add_level(Level::new(
            0,
            Start::new(1),
            NumberFormat::new("bullet"),
            LevelText::new("\u{2022}"),
            LevelJc::new("left"),
        )))
        .add_numbering(Numbering::new(BULLET_NUMBERING, BULLET_NUMBERING))
}

fn push_section(docx: Docx, section: &Section) -> Docx {
    if section.kind == SectionKind::Cover {
        return push_cover(docx, section);
    }
    let mut docx = docx.add_paragraph(styled(&section.title, "Heading1"));
    for element in &section.elements {
        docx = push_element(docx, element);
    }
    docx
}

/// Cover text is centered; everything after it is left-aligned prose.
fn push_cover(mut docx: Docx, section: &Section) -> Docx {
    docx = docx.add_paragraph(
        Paragraph::new()
            .style("Title")
            .align(AlignmentType::Center)
            .add_run(Run::new().add_text(section.title.as_str())),
    );
    for element in &section.elements {
        if let SectionElement::Paragraph(text) = element {
            docx = docx.add_paragraph(
                Paragraph::new()
                    .style("Subtitle")
                    .align(AlignmentType::Center)
                    .add_run(Run::new().add_text(text.as_str())),
            );
        }
    }
    docx
}

fn push_element(docx: Docx, element: &SectionElement) -> Docx {
    match element {
        SectionElement::Heading { level, text } => {
            docx.add_paragraph(styled(text, heading_style(*level)))
        }
        SectionElement::Paragraph(text) => docx.add_paragraph(plain(text)),
        SectionElement::Bullets(items) => items.iter().fold(docx, |acc, item| {
            acc.add_paragraph(
                Paragraph::new()
                    .numbering(NumberingId::new(BULLET_NUMBERING), IndentLevel::new(0))
                    .add_run(Run::new().add_text(item.as_str())),
            )
        }),
        SectionElement::Note(text) => docx.add_paragraph(styled(text, "Note")),
        // Tabular and chart content is carried by the PDF and spreadsheet
        // backends only.
        SectionElement::Table(_) | SectionElement::BarChart(_) | SectionElement::RadarChart(_) => {
            docx
        }
    }
}

/// Narrative headings sit one level below the section title.
fn heading_style(level: u8) -> &'static str {
    if level <= 1 {
        "Heading2"
    } else {
        "Heading3"
    }
}

fn styled(text: &str, style: &str) -> Paragraph {
    Paragraph::new()
        .style(style)
        .add_run(Run::new().add_text(text))
}

fn plain(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}
