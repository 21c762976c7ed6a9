//! Engine configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;

use core_kernel::Currency;

use crate::error::ServiceError;

/// Engine configuration
///
/// Read from an optional `billing.toml` in the working directory (or an
/// explicit file) and then from `BILLING_*` environment variables, the
/// latter taking precedence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// ISO code of the billing currency
    pub currency: String,
    /// Log level or filter directive
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Actor recorded on claim audit entries
    pub adjudicator: String,
    /// Scenario file with catalog, patients and visits
    pub scenario_path: Option<PathBuf>,
    /// Where bills and claim snapshots are appended
    pub output_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency: "SGD".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            adjudicator: "auto-adjudicator".to_string(),
            scenario_path: None,
            output_path: None,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from file and environment
    ///
    /// Without `file`, a missing `billing.toml` is not an error.
    pub fn load(file: Option<&Path>) -> Result<Self, ServiceError> {
        let source = match file {
            Some(path) => config::File::from(path.to_path_buf()).required(true),
            None => config::File::with_name("billing").required(false),
        };

        let config = config::Config::builder()
            .add_source(source)
            .add_source(config::Environment::with_prefix("BILLING"))
            .build()?
            .try_deserialize::<EngineConfig>()?;

        Ok(config)
    }

    /// Billing currency
    pub fn currency(&self) -> Result<Currency, ServiceError> {
        Currency::from_code(self.currency.trim()).ok_or_else(|| {
            ServiceError::Configuration(format!("unsupported currency: {}", self.currency))
        })
    }

    /// Checks values that deserialization alone cannot
    pub fn validate(&self) -> Result<(), ServiceError> {
        self.currency()?;
        if self.adjudicator.trim().is_empty() {
            return Err(ServiceError::Configuration(
                "adjudicator must not be blank".to_string(),
            ));
        }
        if self.log_level.trim().is_empty() {
            return Err(ServiceError::Configuration(
                "log_level must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}
