use crate::config::ReportConfig;
use crate::errors::ReportError;
use crate::import;
use crate::render::{renderer_for, DocumentFormat};
use crate::report::{self, StudyRequest};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

pub struct BuildConfig {
    pub input: PathBuf,
    pub formats: Vec<DocumentFormat>,
    pub output: PathBuf,
    pub fallback_pdf: bool,
    pub config_path: Option<PathBuf>,
}

/// Load the study request, build the report once, render every requested
/// format and write the files under the output directory.
pub fn build_documents(config: &BuildConfig) -> Result<()> {
    let request = load_request(&config.input)?;
    let report_config = load_report_config(config.config_path.as_deref())?;
    validate(&request, &report_config)?;

    let document = report::build_report(&request, &report_config)?;
    println!(
        "{} {} components against {} criteria, {} citations",
        "ranked".green(),
        document.results.len(),
        document.criteria.len(),
        document.citations.len()
    );

    fs::create_dir_all(&config.output).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output.display()
        )
    })?;

    for format in &config.formats {
        let rendered = renderer_for(*format, config.fallback_pdf).render(&document)?;
        let path = config.output.join(&rendered.filename);
        fs::write(&path, &rendered.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "{} {} ({} bytes, {})",
            "wrote".green(),
            path.display().to_string().cyan(),
            rendered.bytes.len(),
            rendered.mime_type
        );
    }

    Ok(())
}

fn load_request(path: &Path) -> Result<StudyRequest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read study request: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse study request JSON: {}", path.display()))
}

fn load_report_config(path: Option<&Path>) -> Result<ReportConfig> {
    let Some(path) = path else {
        return Ok(ReportConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read report config: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse report config JSON: {}", path.display()))
}

fn validate(request: &StudyRequest, report_config: &ReportConfig) -> Result<()> {
    if let Err(issues) = report_config.validate() {
        return Err(ReportError::validations(issues).into());
    }
    import::validate_request(request)?;
    Ok(())
}
