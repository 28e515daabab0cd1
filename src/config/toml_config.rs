use crate::domain::model::{LoanPolicy, DEFAULT_LOAN_PERIOD_DAYS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LibraryError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MAX_LOAN_PERIOD_DAYS: u32 = 365;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub storage: StorageConfig,
    pub lending: LendingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub books_file: String,
    /// Load the catalog file when the session starts.
    pub autoload: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            books_file: "books.txt".to_string(),
            autoload: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingConfig {
    pub loan_period_days: u32,
    pub release_holdings_on_return: bool,
    pub block_removal_while_borrowed: bool,
    /// Loans are not persisted, so a book saved as borrowed comes back with
    /// no open loan. When set, such books are made available on load.
    pub reset_borrowed_on_load: bool,
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
            release_holdings_on_return: false,
            block_removal_while_borrowed: false,
            reset_borrowed_on_load: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set, e.g. `debug`.
    pub level: Option<String>,
    pub format: LogFormat,
}

impl LibraryConfig {
    /// Reads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LibraryError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LibraryError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LibraryError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("storage.data_dir", &self.storage.data_dir)?;
        validation::validate_path("storage.books_file", &self.storage.books_file)?;
        validation::validate_range(
            "lending.loan_period_days",
            self.lending.loan_period_days,
            1,
            MAX_LOAN_PERIOD_DAYS,
        )?;
        if let Some(level) = &self.logging.level {
            validation::validate_non_empty_string("logging.level", level)?;
        }
        Ok(())
    }
}

impl ConfigProvider for LibraryConfig {
    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    fn books_file(&self) -> &str {
        &self.storage.books_file
    }

    fn loan_policy(&self) -> LoanPolicy {
        LoanPolicy {
            loan_period_days: self.lending.loan_period_days,
            release_holdings_on_return: self.lending.release_holdings_on_return,
            block_removal_while_borrowed: self.lending.block_removal_while_borrowed,
        }
    }

    fn reset_borrowed_on_load(&self) -> bool {
        self.lending.reset_borrowed_on_load
    }
}

impl Validate for LibraryConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
