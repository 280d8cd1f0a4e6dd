use crate::config::toml_config::TomlConfig;
use crate::core::store::DEFAULT_STORE_FILE;
use crate::core::ConfigProvider;
use crate::utils::error::{GradeError, Result};
use crate::utils::validation::{validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "grade-tracker")]
#[command(about = "Record grades and compute averages from a JSON grade store")]
pub struct CliConfig {
    /// Endpoint path, e.g. /grades or /save-grade
    pub path: String,

    /// HTTP method; defaults to the route's own method
    #[arg(short = 'X', long)]
    pub method: Option<String>,

    /// JSON request payload
    #[arg(short = 'd', long)]
    pub payload: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Grade store location; overrides the config file
    #[arg(long)]
    pub store: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// Fills unset options from the TOML file; flags given on the command line win.
    pub fn merge_toml(&mut self, toml: &TomlConfig) {
        if self.store.is_none() {
            self.store = Some(toml.store_path().to_string());
        }
        self.verbose |= toml.verbose();
        self.log_json |= toml.json_logs();
    }

    pub fn payload_json(&self) -> Result<serde_json::Value> {
        match &self.payload {
            None => Ok(serde_json::Value::Object(Default::default())),
            Some(raw) => {
                serde_json::from_str(raw).map_err(|e| GradeError::InvalidConfigValueError {
                    field: "payload".to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

impl ConfigProvider for CliConfig {
    fn store_path(&self) -> &str {
        self.store.as_deref().unwrap_or(DEFAULT_STORE_FILE)
    }

    fn verbose(&self) -> bool {
        self.verbose
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("store", self.store_path())?;
        self.payload_json()?;
        Ok(())
    }
}
