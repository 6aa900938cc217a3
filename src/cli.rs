use crate::render::DocumentFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// Portable document, rich layout when compiled in
    Pdf,
    /// Editable word-processing document
    Docx,
    /// Data workbook carrying the full scoring matrix
    Xlsx,
    /// Every supported format
    All,
}

impl FormatArg {
    /// Concrete formats to render for this argument.
    pub fn formats(self) -> Vec<DocumentFormat> {
        match self {
            Self::Pdf => vec![DocumentFormat::Pdf],
            Self::Docx => vec![DocumentFormat::Docx],
            Self::Xlsx => vec![DocumentFormat::Xlsx],
            Self::All => vec![
                DocumentFormat::Pdf,
                DocumentFormat::Docx,
                DocumentFormat::Xlsx,
            ],
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tradestudy")]
#[command(about = "Trade study scoring and report compilation", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build report documents from a study request
    Build {
        /// Study request JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: FormatArg,

        /// Output directory (created if missing)
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Force the minimal PDF writer even when rich layout is available
        #[arg(long = "fallback-pdf")]
        fallback_pdf: bool,

        /// Report configuration JSON file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List supported output formats and their backends
    Formats,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
