use crate::render::pdf::rich_layout_available;
use crate::render::DocumentFormat;
use colored::Colorize;

const ALL_FORMATS: [DocumentFormat; 3] = [
    DocumentFormat::Pdf,
    DocumentFormat::Docx,
    DocumentFormat::Xlsx,
];

/// Print each supported output format with its MIME type and the backend
/// serving it in this build.
pub fn list_formats() {
    for format in ALL_FORMATS {
        println!(
            "{:<6} {:<72} {}",
            format.extension().bold(),
            format.mime_type(),
            backend_label(format)
        );
    }
    if !rich_layout_available() {
        println!(
            "{}",
            "rich PDF layout not compiled in; pdf output uses the fallback writer".yellow()
        );
    }
}

fn backend_label(format: DocumentFormat) -> &'static str {
    match format {
        DocumentFormat::Pdf if rich_layout_available() => "rich page layout",
        DocumentFormat::Pdf => "minimal fallback writer",
        DocumentFormat::Docx => "editable word-processing document",
        DocumentFormat::Xlsx => "five-sheet data workbook",
    }
}
