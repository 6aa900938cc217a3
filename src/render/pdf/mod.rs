//! PDF backends.
//!
//! Two writers share the format: the rich lopdf layout (optional, behind the
//! `rich-pdf` feature) and a minimal dependency-free fallback that is always
//! compiled. Selection happens once here; a missing rich backend is recovered
//! by substituting the fallback, never surfaced to the caller.

pub mod fallback;
#[cfg(feature = "rich-pdf")]
pub mod rich;

use super::DocumentRenderer;
use crate::errors::ReportError;

/// Whether the rich page-layout backend was compiled in.
pub fn rich_layout_available() -> bool {
    cfg!(feature = "rich-pdf")
}

#[cfg(feature = "rich-pdf")]
fn rich_renderer() -> Result<Box<dyn DocumentRenderer>, ReportError> {
    Ok(Box::new(rich::RichPdfRenderer::new()))
}

#[cfg(not(feature = "rich-pdf"))]
fn rich_renderer() -> Result<Box<dyn DocumentRenderer>, ReportError> {
    Err(ReportError::LibraryUnavailable(
        "rich-pdf feature not compiled in".to_string(),
    ))
}

/// Select the PDF backend. `prefer_fallback` skips the rich layout even when
/// it is available.
pub fn pdf_renderer(prefer_fallback: bool) -> Box<dyn DocumentRenderer> {
    if prefer_fallback {
        return Box::new(fallback::FallbackPdfRenderer::new());
    }
    match rich_renderer() {
        Ok(renderer) => renderer,
        Err(err) => {
            log::warn!("{err}; substituting the fallback PDF writer");
            Box::new(fallback::FallbackPdfRenderer::new())
        }
    }
}
