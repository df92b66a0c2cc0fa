pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

pub const DEFAULT_LISTING_FILE: &str = "inventory.html";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "inventory-publish")]
#[command(about = "Convert an inventory CSV report into a categorized HTML listing and upload it")]
#[command(after_help = "If the report filename starts with YYYYMMDDHHMM it is used as the date and \
time the report was run. For example, April 28th 2020 at 2:45pm would be 202004281445.\n\n\
Examples:\n  inventory-publish -i 202004301400.csv -o inventory.html")]
pub struct CliConfig {
    /// The CSV inventory report
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// The HTML file the report is converted to
    #[arg(short = 'o', long = "output", default_value = DEFAULT_LISTING_FILE)]
    pub output: PathBuf,

    /// Do NOT upload the HTML file
    #[arg(short = 'l', long = "local-only")]
    pub local_only: bool,

    /// TOML configuration file (defaults to inventory-publish.toml when present)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn upload_enabled(&self) -> bool {
        !self.local_only
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input.to_string_lossy())?;
        validation::validate_path("output", &self.output.to_string_lossy())?;
        Ok(())
    }
}
