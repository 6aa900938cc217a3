//! Minimal PDF writer with no library dependency.
//!
//! Hand-constructs the smallest well-formed PDF that still carries the report
//! text: a fixed five-object graph (catalog, pages, one page, one content
//! stream, one Type1 Helvetica font), a correct xref table and trailer.
//! Section text is flattened to wrapped plain-text lines on a single page;
//! tables and charts are skipped. Text is encoded as Latin-1 with `?` for
//! anything outside that range.

use crate::render::{document_filename, DocumentFormat, DocumentRenderer, RenderedDocument};
use crate::report::sections::SectionElement;
use crate::report::ReportDocument;

/// Lines that fit one US Letter page at 10pt type with 12pt leading,
/// starting at y=720 and stopping at the 72pt bottom margin.
const PAGE_LINE_CAPACITY: usize = 54;

/// Conservative character budget for one line of 10pt Helvetica inside
/// 72pt side margins.
const WRAP_WIDTH: usize = 88;

pub struct FallbackPdfRenderer;

impl FallbackPdfRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FallbackPdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for FallbackPdfRenderer {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn render(&self, report: &ReportDocument) -> anyhow::Result<RenderedDocument> {
        let lines = limit_to_page(flatten_to_lines(report));
        Ok(RenderedDocument {
            bytes: write_pdf(&lines),
            mime_type: DocumentFormat::Pdf.mime_type().to_string(),
            filename: document_filename(&report.meta.project.name, DocumentFormat::Pdf),
        })
    }
}

/// Flatten the section model to plain text lines. Section titles are
/// uppercased for separation; tables and charts have no text rendition here.
fn flatten_to_lines(report: &ReportDocument) -> Vec<String> {
    let mut lines = Vec::new();
    for section in &report.sections {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(section.title.to_uppercase());
        for element in &section.elements {
            match element {
                SectionElement::Heading { text, .. } => lines.push(text.clone()),
                SectionElement::Paragraph(text) | SectionElement::Note(text) => {
                    lines.extend(wrap(text, WRAP_WIDTH));
                }
                SectionElement::Bullets(items) => {
                    for item in items {
                        for (index, piece) in wrap(item, WRAP_WIDTH - 2).into_iter().enumerate() {
                            if index == 0 {
                                lines.push(format!("- {piece}"));
                            } else {
                                lines.push(format!("  {piece}"));
                            }
                        }
                    }
                }
                SectionElement::Table(_)
                | SectionElement::BarChart(_)
                | SectionElement::RadarChart(_) => {}
            }
        }
    }
    lines
}

/// Truncate to the single-page capacity, replacing the overflow with a
/// one-line omission marker.
fn limit_to_page(mut lines: Vec<String>) -> Vec<String> {
    if lines.len() <= PAGE_LINE_CAPACITY {
        return lines;
    }
    let omitted = lines.len() - (PAGE_LINE_CAPACITY - 1);
    lines.truncate(PAGE_LINE_CAPACITY - 1);
    lines.push(format!("... {omitted} more lines omitted"));
    lines
}

/// Greedy word wrap on character count. Words longer than a full line are
/// hard-split. Shared with the rich layout, which derives its character
/// budgets from point widths.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        for piece in split_long_word(word, width) {
            let needed = current.chars().count() + 1 + piece.chars().count();
            if !current.is_empty() && needed > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&piece);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_long_word(word: &str, width: usize) -> Vec<String> {
    if word.chars().count() <= width {
        return vec![word.to_string()];
    }
    word.chars()
        .collect::<Vec<_>>()
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Serialize the fixed object graph. Object numbers are stable: 1 catalog,
/// 2 pages, 3 page, 4 content stream, 5 font.
fn write_pdf(lines: &[String]) -> Vec<u8> {
    let objects: [Vec<u8>; 5] = [
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_vec(),
        b"<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
          /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_vec(),
        content_object(lines),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_vec(),
    ];

    let mut buffer: Vec<u8> = Vec::new();
    buffer.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets = [0usize; 6];
    for (index, body) in objects.iter().enumerate() {
        let number = index + 1;
        offsets[number] = buffer.len();
        buffer.extend_from_slice(format!("{number} 0 obj\n").as_bytes());
        buffer.extend_from_slice(body);
        buffer.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = buffer.len();
    buffer.extend_from_slice(b"xref\n0 6\n");
    // Each xref entry is exactly 20 bytes including the trailing space + LF.
    buffer.extend_from_slice(b"0000000000 65535 f \n");
    for number in 1..=5 {
        buffer.extend_from_slice(format!("{:010} 00000 n \n", offsets[number]).as_bytes());
    }
    buffer.extend_from_slice(b"trailer\n<< /Size 6 /Root 1 0 R >>\nstartxref\n");
    buffer.extend_from_slice(format!("{xref_offset}\n").as_bytes());
    buffer.extend_from_slice(b"%%EOF\n");
    buffer
}

fn content_object(lines: &[String]) -> Vec<u8> {
    let stream = content_stream(lines);
    let mut object = Vec::new();
    object.extend_from_slice(format!("<< /Length {} >>\nstream\n", stream.len()).as_bytes());
    object.extend_from_slice(&stream);
    object.extend_from_slice(b"\nendstream");
    object
}

fn content_stream(lines: &[String]) -> Vec<u8> {
    let mut stream = Vec::new();
    stream.extend_from_slice(b"BT\n/F1 10 Tf\n12 TL\n72 720 Td\n");
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            stream.extend_from_slice(b"T*\n");
        }
        stream.push(b'(');
        stream.extend_from_slice(&encode_pdf_text(line));
        stream.extend_from_slice(b") Tj\n");
    }
    stream.extend_from_slice(b"ET");
    stream
}

/// Latin-1 encoding of a string literal for a content stream. Characters
/// outside Latin-1 become `?`; `(`, `)` and `\` are escaped; control
/// characters would break the literal and are flattened to spaces.
fn encode_pdf_text(text: &str) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(text.len());
    for c in text.chars() {
        let byte = match u32::from(c) {
            code @ 0x20..=0xFF => code as u8,
            0x09 => b' ',
            code if code < 0x20 => b' ',
            _ => b'?',
        };
        if matches!(byte, b'(' | b')' | b'\\') {
            encoded.push(b'\\');
        }
        encoded.push(byte);
    }
    encoded
}
