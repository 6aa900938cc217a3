//! Format-level output tests through the public renderer selection API.

use chrono::{TimeZone, Utc};
use tradestudy::*;

fn sample_document() -> ReportDocument {
    let request = StudyRequest {
        project: ProjectMeta::new("Output Survey"),
        criteria: vec![
            Criterion::new(1, "Latency", 50.0).with_unit("ms"),
            Criterion::new(2, "Throughput", 50.0),
        ],
        components: vec![
            Component::new(1, "Acme", "AX-100"),
            Component::new(2, "Initech", "IN-7"),
        ],
        scores: vec![
            ScoreEntry::new(ComponentId(1), CriterionId(1), 8)
                .with_rationale("Consistently low tail latency in the soak test."),
            ScoreEntry::new(ComponentId(1), CriterionId(2), 7),
            ScoreEntry::new(ComponentId(2), CriterionId(1), 4)
                .with_rationale("Latency spikes once the queue saturates."),
            ScoreEntry::new(ComponentId(2), CriterionId(2), 9),
        ],
        narrative: String::new(),
    };
    let at = Utc.with_ymd_and_hms(2024, 9, 3, 8, 0, 0).unwrap();
    build_report_at(&request, &ReportConfig::default(), at).unwrap()
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn every_format_reports_itself() {
    for format in [
        DocumentFormat::Pdf,
        DocumentFormat::Docx,
        DocumentFormat::Xlsx,
    ] {
        let renderer = renderer_for(format, false);
        assert_eq!(renderer.format(), format);
    }
}

#[test]
fn fallback_pdf_is_well_formed() {
    let document = sample_document();
    let rendered = renderer_for(DocumentFormat::Pdf, true)
        .render(&document)
        .unwrap();
    let bytes = &rendered.bytes;
    assert!(bytes.starts_with(b"%PDF-1.4\n"));
    assert!(bytes.ends_with(b"%%EOF\n"));
    assert_eq!(rendered.filename, "Output_Survey_report.pdf");
    assert_eq!(rendered.mime_type, "application/pdf");

    // Five objects plus the free head entry; each offset must point at the
    // matching "N 0 obj" header.
    let text = String::from_utf8_lossy(bytes);
    let entries_at = text.find("xref\n0 6\n").unwrap() + "xref\n0 6\n".len();
    for number in 1..=5usize {
        let entry = &bytes[entries_at + number * 20..entries_at + number * 20 + 20];
        let offset: usize = std::str::from_utf8(&entry[..10]).unwrap().parse().unwrap();
        let header = format!("{number} 0 obj\n");
        assert_eq!(&bytes[offset..offset + header.len()], header.as_bytes());
    }
}

#[cfg(feature = "rich-pdf")]
#[test]
fn rich_pdf_parses_and_paginates() {
    let document = sample_document();
    let rendered = renderer_for(DocumentFormat::Pdf, false)
        .render(&document)
        .unwrap();
    assert!(rendered.bytes.starts_with(b"%PDF-"));

    let parsed = lopdf::Document::load_mem(&rendered.bytes).unwrap();
    // Rich layout starts a fresh page per section.
    assert!(parsed.get_pages().len() >= 9);
}

#[test]
fn docx_is_a_zip_with_word_parts() {
    let document = sample_document();
    let rendered = renderer_for(DocumentFormat::Docx, false)
        .render(&document)
        .unwrap();
    assert!(rendered.bytes.starts_with(b"PK\x03\x04"));
    assert!(contains_bytes(&rendered.bytes, b"word/document.xml"));
    assert_eq!(rendered.filename, "Output_Survey_report.docx");
}

#[test]
fn xlsx_is_a_zip_with_workbook_parts() {
    let document = sample_document();
    let rendered = renderer_for(DocumentFormat::Xlsx, false)
        .render(&document)
        .unwrap();
    assert!(rendered.bytes.starts_with(b"PK\x03\x04"));
    assert!(contains_bytes(&rendered.bytes, b"xl/workbook.xml"));
    assert!(contains_bytes(&rendered.bytes, b"xl/worksheets/sheet5.xml"));
    assert_eq!(rendered.filename, "Output_Survey_report.xlsx");
}

#[test]
fn filenames_sanitize_project_names() {
    assert_eq!(
        document_filename("ACME Phase-2 (rev 3)", DocumentFormat::Pdf),
        "ACME_Phase-2__rev_3__report.pdf"
    );
    assert_eq!(
        document_filename("???", DocumentFormat::Xlsx),
        "study_report.xlsx"
    );
}
