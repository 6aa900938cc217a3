// Export modules for library usage
pub mod citations;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod import;
pub mod narrative;
pub mod render;
pub mod report;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{
    Block, Citation, CitationCategory, Component, ComponentId, Criterion, CriterionId,
    ProjectMeta, RankedComponent, ScoreBand, ScoreEntry, ScoreSet,
};

pub use crate::config::ReportConfig;

pub use crate::errors::ReportError;

pub use crate::report::{build_report, build_report_at, ReportDocument, ReportMeta, StudyRequest};

pub use crate::render::{
    document_filename, renderer_for, DocumentFormat, DocumentRenderer, RenderedDocument,
};

pub use crate::citations::{citation_number, CitationIndexer};

pub use crate::scoring::{rank, round2};
