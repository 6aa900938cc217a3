//! Document rendering backends.
//!
//! Every backend implements [`DocumentRenderer`] over the same
//! [`ReportDocument`] model; callers pick one through [`renderer_for`] and
//! get bytes, a MIME type and a safe filename back. Backend selection is the
//! only place rich-versus-fallback PDF capability is decided.

pub mod docx;
pub mod pdf;
pub mod xlsx;

use crate::report::ReportDocument;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target file format of a rendered document.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Xlsx,
}

impl DocumentFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// A finished document ready to hand to storage or transport.
#[derive(Clone, Debug)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

pub trait DocumentRenderer {
    fn format(&self) -> DocumentFormat;
    fn render(&self, report: &ReportDocument) -> anyhow::Result<RenderedDocument>;
}

/// Renderer for the requested format. `prefer_fallback_pdf` forces the
/// minimal PDF writer even when the rich layout backend is compiled in.
pub fn renderer_for(
    format: DocumentFormat,
    prefer_fallback_pdf: bool,
) -> Box<dyn DocumentRenderer> {
    match format {
        DocumentFormat::Pdf => pdf::pdf_renderer(prefer_fallback_pdf),
        DocumentFormat::Docx => Box::new(docx::DocxRenderer::new()),
        DocumentFormat::Xlsx => Box::new(xlsx::XlsxRenderer::new()),
    }
}

/// `{sanitized project name}_report.{ext}`.
pub fn document_filename(project_name: &str, format: DocumentFormat) -> String {
    format!(
        "{}_report.{}",
        sanitize_name(project_name),
        format.extension()
    )
}

/// Alphanumerics, `_` and `-` pass through; everything else becomes `_`.
/// A name with nothing salvageable falls back to "study".
pub fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.chars().all(|c| c == '_') {
        "study".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_special_characters() {
        assert_eq!(sanitize_name("Buck Converter Study"), "Buck_Converter_Study");
        assert_eq!(
            sanitize_name("ACME Phase-2 (rev 3)"),
            "ACME_Phase-2__rev_3_"
        );
        assert_eq!(sanitize_name("a/b\\c:d"), "a_b_c_d");
    }

    #[test]
    fn sanitize_keeps_unicode_letters() {
        assert_eq!(sanitize_name("étude α"), "étude_α");
    }

    #[test]
    fn sanitize_falls_back_for_empty_names() {
        assert_eq!(sanitize_name(""), "study");
        assert_eq!(sanitize_name("()!"), "study");
    }

    #[test]
    fn filename_carries_extension() {
        assert_eq!(
            document_filename("LDO Selection", DocumentFormat::Pdf),
            "LDO_Selection_report.pdf"
        );
        assert_eq!(
            document_filename("LDO Selection", DocumentFormat::Xlsx),
            "LDO_Selection_report.xlsx"
        );
    }

    #[test]
    fn mime_types_match_formats() {
        assert_eq!(DocumentFormat::Pdf.mime_type(), "application/pdf");
        assert!(DocumentFormat::Docx.mime_type().contains("wordprocessingml"));
        assert!(DocumentFormat::Xlsx.mime_type().contains("spreadsheetml"));
    }
}
