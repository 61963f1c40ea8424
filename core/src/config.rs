use serde::{Deserialize, Serialize};
use std::env::VarError;

use crate::errors::ConfigError;

pub const CONFIG_ENV_VAR: &str = "GREETER_CONFIG";
pub const DEFAULT_LOG_FILTER: &str = "greeter_core=info,bootstrap=info";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GreeterConfig {
    /// `tracing_subscriber::EnvFilter` directives, used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// CloudWatch shows escape codes verbatim, so this stays off in Lambda.
    pub ansi: bool,
}

impl Default for GreeterConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            ansi: false,
        }
    }
}

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<GreeterConfig> {
    let config = match config_path {
        Some(path) => GreeterConfig::from_file(path)?,
        None => GreeterConfig::from_env()?,
    };
    config.validate()?;
    Ok(config)
}

impl GreeterConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            origin: path.to_string(),
            error: Box::new(e),
        })?;
        Self::from_yaml_str(&content, path)
    }

    /// Reads inline YAML from `GREETER_CONFIG`, falling back to defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(config_str) => Self::from_yaml_str(&config_str, CONFIG_ENV_VAR),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                origin: CONFIG_ENV_VAR.to_string(),
                error: Box::new(e),
            }),
        }
    }

    pub fn from_yaml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::LoadFailed {
            origin: origin.to_string(),
            error: Box::new(e),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "log_filter cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
