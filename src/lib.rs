pub mod analyzer;
pub mod args;
pub mod config;
pub mod errors;
pub mod fonts;
pub mod format;
pub mod layout;
pub mod loader;
pub mod pdf;
pub mod render;

use crate::config::ReportConfig;
use crate::errors::ReportError;
use log::info;
use std::path::PathBuf;

/// Runs the whole pipeline: load the input, summarize it and write the PDF
/// report. Returns the path of the written report.
///
/// Each stage fails fast; nothing is written unless every stage succeeds.
pub fn run(config: &ReportConfig) -> Result<PathBuf, ReportError> {
    info!("Reading data...");
    let records = loader::load_records(&config.input)?;

    info!("Analyzing data...");
    let analysis = analyzer::analyze(&records)?;

    info!("Generating report...");
    let document = render::render_report(
        &analysis.periods,
        &analysis.summary,
        config.generated_at,
    );
    render::write_report(&document, &config.output)?;

    info!("Report generated successfully: {}", config.output.display());
    Ok(config.output.clone())
}
