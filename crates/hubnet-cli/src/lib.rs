pub mod cli;
pub mod config;

pub use cli::{Cli, Commands, ReportFormat};
pub use config::HubnetConfig;
