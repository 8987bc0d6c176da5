use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads, parses and validates a TOML configuration file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_hash(path).map(|(config, _)| config)
}

/// Same as [`load_config`], also returning the hex SHA-256 of the file
///
/// The hash is taken over the exact bytes that were parsed, so a file edited
/// between the two steps cannot produce a mismatched pair.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, digest(&content)))
}

pub(crate) fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Hex SHA-256 of a configuration file, without parsing it
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(digest(&content))
}

fn digest(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
