//! Configuration file for the `hubnet` command.
//!
//! Stored in `~/.hubnet/config.toml`. Every key is optional; command-line
//! flags take precedence over file values.
//!
//! ```toml
//! [solver]
//! backend = "microlp"
//!
//! [report]
//! format = "plain"
//! objective_tolerance = 1e-6
//! assignment_threshold = 0.5
//! ```

use crate::cli::ReportFormat;
use hubnet_algo::DesignConfig;
use hubnet_core::{HubnetError, HubnetResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HubnetConfig {
    pub solver: SolverSection,
    pub report: ReportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverSection {
    /// Backend name, see `hubnet solvers`
    pub backend: String,
}

impl Default for SolverSection {
    fn default() -> Self {
        Self {
            backend: DesignConfig::default().backend,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSection {
    pub format: ReportFormat,
    pub objective_tolerance: f64,
    pub assignment_threshold: f64,
}

impl Default for ReportSection {
    fn default() -> Self {
        let design = DesignConfig::default();
        Self {
            format: ReportFormat::Plain,
            objective_tolerance: design.objective_tolerance,
            assignment_threshold: design.assignment_threshold,
        }
    }
}

impl HubnetConfig {
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".hubnet"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load from the default location; defaults when the file is absent.
    pub fn load() -> HubnetResult<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> HubnetResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents).map_err(|e| {
            HubnetError::Config(format!("invalid config file '{}': {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Explicit path if given, otherwise the default location.
    pub fn resolve(path: Option<&Path>) -> HubnetResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Library settings, with an optional backend override from the command line.
    pub fn design_config(&self, backend: Option<&str>) -> DesignConfig {
        DesignConfig {
            backend: backend.unwrap_or(&self.solver.backend).to_string(),
            assignment_threshold: self.report.assignment_threshold,
            objective_tolerance: self.report.objective_tolerance,
        }
    }
}
