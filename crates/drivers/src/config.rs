use std::collections::BTreeMap;
use std::path::Path;

use polaroid_studio_adapters::StaticLabelCatalog;
use polaroid_studio_application::WizardConfig;
use polaroid_studio_domain::PresentationType;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub wizard: WizardConfig,
    pub decode: DecodeConfig,
    pub logging: LoggingConfig,
    /// Display text overrides keyed by presentation type code.
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    pub workers: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self { workers: 2 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
    /// `pretty` or `json`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.decode.workers == 0 {
            return Err(ConfigError::Invalid(
                "decode.workers must be at least 1".to_string(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }
        self.label_catalog().map(|_| ())
    }

    pub fn label_catalog(&self) -> Result<StaticLabelCatalog, ConfigError> {
        self.labels
            .iter()
            .try_fold(StaticLabelCatalog::default(), |catalog, (code, text)| {
                let kind = PresentationType::from_code(code)
                    .map_err(|error| ConfigError::Invalid(format!("labels: {error}")))?;
                Ok(catalog.with_override(kind, text.clone()))
            })
    }
}
