//! Configuration loading from disk and environment.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "GATEWAY_CONFIG";

/// Environment variable overriding `security.jwt_signing_key`.
pub const SIGNING_KEY_ENV: &str = "GATEWAY_JWT_SIGNING_KEY";

/// Config file used when `GATEWAY_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "gateway.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse TOML and apply environment overrides, without validating.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    let mut config: GatewayConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Where the running configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// No file at the default location; built-in defaults apply.
    Defaults { path: PathBuf },
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Defaults { path } => write!(f, "defaults ({} not found)", path.display()),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolve the config the process starts with.
///
/// Reads `GATEWAY_CONFIG` (or `gateway.toml`). A missing file at the default
/// location means "all defaults"; a missing file that was named explicitly is
/// an error. Does not log; the caller logs the returned source once the
/// subscriber is installed.
pub fn load_from_env() -> Result<(GatewayConfig, ConfigSource), ConfigError> {
    let explicit = std::env::var(CONFIG_PATH_ENV).ok();
    let (config, source) = match explicit {
        Some(path) => resolve(Path::new(&path), true)?,
        None => resolve(Path::new(DEFAULT_CONFIG_PATH), false)?,
    };

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok((config, source))
}

/// Read `path`, or fall back to defaults when it is absent and optional.
fn resolve(path: &Path, explicit: bool) -> Result<(GatewayConfig, ConfigSource), ConfigError> {
    if !explicit && !path.exists() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());
        return Ok((config, ConfigSource::Defaults { path: path.to_path_buf() }));
    }

    let config = parse_config(&fs::read_to_string(path)?)?;
    Ok((config, ConfigSource::File(path.to_path_buf())))
}

fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(SIGNING_KEY_ENV).filter(|k| !k.is_empty()) {
        config.security.jwt_signing_key = Some(key);
    }
}
