use hanabi_bot::AgentParams;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

use crate::deals::{MAX_PLAYERS, MIN_PLAYERS};

const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root harness configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    #[serde(default)]
    pub agent: AgentParams,
    #[serde(default)]
    pub input: Option<InputConfig>,
    #[serde(default)]
    pub deals: Option<DealConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        validate_agent(&self.agent)?;
        if let Some(input) = self.input.as_ref() {
            input.validate()?;
        }
        if let Some(deals) = self.deals.as_ref() {
            deals.validate()?;
        }
        if self.input.is_none() && self.deals.is_none() {
            return Err(ValidationError::InvalidField {
                field: "input".to_string(),
                message: "either input.observations or deals must be configured".to_string(),
            });
        }
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Apply deal count/seed overrides. A count alone creates a deals block
    /// when the file has none; a seed alone needs one to attach to.
    pub fn override_deals(
        &mut self,
        count: Option<usize>,
        seed: Option<u64>,
    ) -> Result<(), ValidationError> {
        match (self.deals.as_mut(), count) {
            (Some(deals), _) => {
                if let Some(count) = count {
                    deals.count = count;
                }
                if seed.is_some() {
                    deals.seed = seed;
                }
            }
            (None, Some(count)) => {
                self.deals = Some(DealConfig {
                    seed,
                    count,
                    players: default_players(),
                });
            }
            (None, None) if seed.is_some() => {
                return Err(ValidationError::InvalidField {
                    field: "deals.seed".to_string(),
                    message: "a seed override needs a deals block or a deal count".to_string(),
                });
            }
            (None, None) => {}
        }
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

/// Recorded observations to replay, one JSON object per line.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InputConfig {
    pub observations: PathBuf,
}

impl InputConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.observations.as_os_str().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "input.observations".to_string(),
                message: "path must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Synthetic opening deals generated from a seed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DealConfig {
    pub seed: Option<u64>,
    pub count: usize,
    #[serde(default = "default_players")]
    pub players: usize,
}

impl DealConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::InvalidField {
                field: "deals.count".to_string(),
                message: "number of deals must be greater than zero".to_string(),
            });
        }

        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(ValidationError::InvalidField {
                field: "deals.players".to_string(),
                message: format!("players must be between {MIN_PLAYERS} and {MAX_PLAYERS}"),
            });
        }

        Ok(())
    }
}

fn default_players() -> usize {
    2
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_agent(agent: &AgentParams) -> Result<(), ValidationError> {
    if agent.information_tokens == 0 {
        return Err(ValidationError::InvalidField {
            field: "agent.information_tokens".to_string(),
            message: "information token cap must be greater than zero".to_string(),
        });
    }

    if agent.chromosome.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "agent.chromosome".to_string(),
            message: "chromosome must list at least one rule".to_string(),
        });
    }

    agent
        .chromosome
        .validate()
        .map_err(|err| ValidationError::InvalidField {
            field: "agent.chromosome".to_string(),
            message: err.to_string(),
        })?;

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
