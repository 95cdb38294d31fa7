// ddeps-core/src/infrastructure/config.rs
//
// Layering: defaults -> config file -> environment. CLI flags are applied on
// top by the binary.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, instrument};

use crate::domain::document::DataFormat;
use crate::domain::error::DomainError;
use crate::domain::rules::RuleOptions;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["ddeps.yaml", ".ddeps.yaml"];

pub const ENV_RECOMMENDED_FORMATS: &str = "DDEPS_RECOMMENDED_FORMATS";
pub const ENV_OUTPUT: &str = "DDEPS_OUTPUT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown output '{}' (expected 'text' or 'json')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Enables the "not in the recommended list" warning.
    #[serde(default)]
    pub recommended_formats: Option<Vec<String>>,
    #[serde(default)]
    pub output: OutputFormat,
}

impl ValidatorConfig {
    /// Resolves `recommended_formats` against the allowed format set.
    pub fn to_rule_options(&self) -> Result<RuleOptions, DomainError> {
        let Some(names) = &self.recommended_formats else {
            return Ok(RuleOptions::default());
        };
        if names.is_empty() {
            return Err(DomainError::InvalidConfig(
                "recommended_formats is empty; remove the key to disable the check".into(),
            ));
        }
        let formats = names
            .iter()
            .map(|name| name.trim().parse::<DataFormat>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RuleOptions {
            recommended_formats: Some(formats),
        })
    }
}

/// Splits `a, b,,c` into `["a", "b", "c"]`.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// --- LOADER ---

#[instrument(skip(working_dir))]
pub fn load_validator_config(
    working_dir: &Path,
    explicit: Option<&Path>,
) -> Result<ValidatorConfig, InfrastructureError> {
    let mut config = match find_config_file(working_dir, explicit)? {
        Some(path) => {
            info!(path = ?path, "Loading validator config");
            load_config_file(&path)?
        }
        None => {
            debug!("No config file found, using defaults");
            ValidatorConfig::default()
        }
    };

    apply_env_overrides(&mut config)?;
    Ok(config)
}

fn find_config_file(
    root: &Path,
    explicit: Option<&Path>,
) -> Result<Option<PathBuf>, InfrastructureError> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(Some(path.to_path_buf()))
        } else {
            Err(InfrastructureError::ConfigNotFound(
                path.display().to_string(),
            ))
        };
    }

    Ok(CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.is_file()))
}

fn load_config_file(path: &Path) -> Result<ValidatorConfig, InfrastructureError> {
    let content = fs::read_to_string(path).map_err(|source| InfrastructureError::FileAccess {
        path: path.display().to_string(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(ValidatorConfig::default());
    }
    serde_yaml::from_str(&content)
        .map_err(|e| InfrastructureError::ConfigError(format!("{}: {}", path.display(), e)))
}

fn apply_env_overrides(config: &mut ValidatorConfig) -> Result<(), InfrastructureError> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Same as the env layer, with an injectable lookup.
pub fn apply_overrides(
    config: &mut ValidatorConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), InfrastructureError> {
    if let Some(val) = lookup(ENV_RECOMMENDED_FORMATS) {
        info!(new = %val, "Overriding recommended formats via ENV");
        config.recommended_formats = Some(split_list(&val));
    }
    if let Some(val) = lookup(ENV_OUTPUT) {
        info!(old = %config.output, new = %val, "Overriding output via ENV");
        config.output = val
            .parse()
            .map_err(|e: DomainError| InfrastructureError::ConfigError(e.to_string()))?;
    }
    Ok(())
}
