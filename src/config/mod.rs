#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

pub mod cli;
pub mod toml_config;

pub use toml_config::{LibraryConfig, LogFormat};

/// Command-line flags. Any flag given overrides the config file.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "small-library")]
#[command(about = "Library catalog, members and loans from the terminal")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the catalog file
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Catalog file name inside the data directory
    #[arg(long)]
    pub books_file: Option<String>,

    /// Days between borrow date and due date
    #[arg(long)]
    pub loan_days: Option<u32>,

    /// Load the catalog file before showing the menu
    #[arg(long)]
    pub autoload: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Reads the config file, if any, and applies the flag overrides.
    pub fn resolve(&self) -> Result<LibraryConfig> {
        let mut config = match &self.config {
            Some(path) => LibraryConfig::from_file(path)?,
            None => LibraryConfig::default(),
        };

        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if let Some(books_file) = &self.books_file {
            config.storage.books_file = books_file.clone();
        }
        if let Some(days) = self.loan_days {
            config.lending.loan_period_days = days;
        }
        if self.autoload {
            config.storage.autoload = true;
        }
        if self.json_logs {
            config.logging.format = LogFormat::Json;
        }
        Ok(config)
    }
}
