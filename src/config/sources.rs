// Configuration source loading.
//
// Priority order:
// 1. Environment variables (OTLP2S3_* prefix)
// 2. Config file path from OTLP2S3_CONFIG
// 3. Default config files (./config.toml, ./.otlp2s3.toml)
// 4. Built-in defaults

use super::env_overrides::{self, StdEnvSource};
use super::ExporterConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

/// Load configuration using native environment/file access.
pub fn load_config() -> Result<ExporterConfig> {
    let mut config = load_from_file()?.unwrap_or_default();

    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

fn load_from_file() -> Result<Option<ExporterConfig>> {
    if let Ok(path) = env::var("OTLP2S3_CONFIG") {
        return read_config_file(Path::new(&path)).map(Some);
    }

    for path in &["./config.toml", "./.otlp2s3.toml"] {
        let path = Path::new(path);
        if path.exists() {
            return read_config_file(path).map(Some);
        }
    }

    Ok(None)
}

/// Load configuration from a specific file path (for CLI --config flag).
/// Returns error if file doesn't exist or can't be parsed.
pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let mut config = read_config_file(path.as_ref())?;

    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<ExporterConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
