use crate::config::{AuditConfig, DEFAULT_CONFIG_PATH};
use crate::utils::error::Result;
use clap::Args;
use std::path::PathBuf;

/// Flags shared by both binaries.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Path to the TOML configuration file [default: audit.toml, built-in defaults if absent]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl CommonArgs {
    /// An explicit `--config` must exist; the default path may be absent.
    pub fn load_config(&self) -> Result<AuditConfig> {
        match &self.config {
            Some(path) => AuditConfig::from_file(path),
            None => AuditConfig::from_file_or_default(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn init_logger(&self) {
        if self.log_json {
            crate::utils::logger::init_json_logger(self.verbose);
        } else {
            crate::utils::logger::init_cli_logger(self.verbose);
        }
    }
}
