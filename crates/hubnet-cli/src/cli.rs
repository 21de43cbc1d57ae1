use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hubnet",
    author,
    version,
    about = "Two-echelon hub/satellite distribution network design",
    long_about = None
)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    /// Configuration file (defaults to ~/.hubnet/config.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and solve the network design for an instance
    Solve {
        /// Instance document (.json, .yaml or .yml)
        #[arg(value_hint = ValueHint::FilePath)]
        instance: PathBuf,
        /// Solver backend (microlp, highs, coin_cbc)
        #[arg(long)]
        solver: Option<String>,
        /// Report format
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
        /// Write the report to a file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Check an instance document and list every diagnostic
    Validate {
        /// Instance document (.json, .yaml or .yml)
        #[arg(value_hint = ValueHint::FilePath)]
        instance: PathBuf,
    },
    /// List the solver backends compiled into this build
    Solvers,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Plain,
    Json,
}
