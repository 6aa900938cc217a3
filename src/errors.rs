//! Error taxonomy for report builds.
//!
//! Two of the variants are fatal and abort the build call (`DataIncomplete`,
//! `Validation`); the other two are recovered before the caller ever sees
//! them: `Render` degrades the owning sub-section to a short note, and
//! `LibraryUnavailable` is absorbed by the PDF backend selection, which
//! substitutes the fallback writer.

use thiserror::Error;

/// Main error type for report construction and rendering.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The study request cannot produce a report at all: no components, no
    /// criteria, or an empty score set. Raised before any rendering begins.
    #[error("incomplete study data: {0}")]
    DataIncomplete(String),

    /// Import-boundary rejection: missing required column, weight or score
    /// outside its valid range.
    #[error("validation failed with {} issue(s): {}", issues.len(), issues.join("; "))]
    Validation { issues: Vec<String> },

    /// A chart or table could not be built from the intermediate data. The
    /// assembler catches this and substitutes an explanatory note; it never
    /// aborts the document.
    #[error("render failure in {section}: {message}")]
    Render { section: String, message: String },

    /// The rich page-layout backend is not compiled in. Recovered once at
    /// the backend selection boundary, not per call.
    #[error("rich layout backend unavailable: {0}")]
    LibraryUnavailable(String),
}

impl ReportError {
    pub fn incomplete(message: impl Into<String>) -> Self {
        Self::DataIncomplete(message.into())
    }

    pub fn validation(issue: impl Into<String>) -> Self {
        Self::Validation {
            issues: vec![issue.into()],
        }
    }

    pub fn validations(issues: Vec<String>) -> Self {
        Self::Validation { issues }
    }

    pub fn render(section: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            section: section.into(),
            message: message.into(),
        }
    }

    /// Whether the build as a whole must abort on this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DataIncomplete(_) | Self::Validation { .. })
    }

    /// Whether the error is absorbed locally as reduced document fidelity.
    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }
}

/// Result type alias using the report error type.
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(ReportError::incomplete("no components").is_fatal());
        assert!(ReportError::validation("weight must be > 0").is_fatal());
        assert!(!ReportError::render("visuals", "bad data").is_fatal());
        assert!(!ReportError::LibraryUnavailable("rich-pdf feature off".into()).is_fatal());
    }

    #[test]
    fn validation_display_joins_issues() {
        let err = ReportError::validations(vec![
            "missing column: weight".to_string(),
            "score 14 outside [1, 10]".to_string(),
        ]);
        let text = err.to_string();
        assert!(text.contains("2 issue(s)"));
        assert!(text.contains("missing column: weight"));
    }

    #[test]
    fn render_error_names_section() {
        let err = ReportError::render("visual analysis", "empty results");
        assert_eq!(
            err.to_string(),
            "render failure in visual analysis: empty results"
        );
    }
}
