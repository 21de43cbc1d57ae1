//! `hubnet solve`

use anyhow::{Context, Result};
use hubnet_algo::solve_design;
use hubnet_cli::{HubnetConfig, ReportFormat};
use hubnet_io::{load_instance, report_to_json, write_json};
use std::fs;
use std::path::Path;
use tracing::info;

pub fn handle(
    config: &HubnetConfig,
    instance_path: &Path,
    solver: Option<&str>,
    format: Option<ReportFormat>,
    out: Option<&Path>,
) -> Result<()> {
    // Backend and tolerances are checked before the instance is read
    let design_config = config.design_config(solver);
    design_config.validate()?;

    let instance = load_instance(instance_path)?;
    for warning in instance.warnings() {
        tracing::warn!("{}", warning);
    }
    info!(
        instance = %instance_path.display(),
        backend = %design_config.backend,
        "solving network design"
    );

    let outcome = solve_design(&instance, &design_config).context("solving network design")?;
    let format = format.unwrap_or(config.report.format);

    match (format, out) {
        (ReportFormat::Json, Some(path)) => write_json(&outcome.report, path)?,
        (ReportFormat::Json, None) => println!("{}", report_to_json(&outcome.report)?),
        (ReportFormat::Plain, Some(path)) => fs::write(path, outcome.report.render())
            .with_context(|| format!("writing report to '{}'", path.display()))?,
        (ReportFormat::Plain, None) => print!("{}", outcome.report),
    }
    if let Some(path) = out {
        info!(path = %path.display(), "report written");
    }

    Ok(())
}
