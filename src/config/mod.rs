// otlp2s3 configuration
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Config file path from --config or the OTLP2S3_CONFIG env var
// 3. Default config file locations (./config.toml, ./.otlp2s3.toml)
// 4. Built-in defaults (lowest priority)
//
// AWS_ENDPOINT_URL is not folded into the config here. It is read by
// `writer::resolve_endpoint` when the storage client is constructed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{EnvSource, MapEnvSource, StdEnvSource, ENV_PREFIX};

use crate::types::{Compression, Marshaler};
use crate::writer::Granularity;

/// Main exporter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default)]
    pub marshaler: Marshaler,

    #[serde(default)]
    pub s3uploader: S3UploaderConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs: Option<FsConfig>,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Fs,
    #[default]
    S3,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Fs => write!(f, "fs"),
            StorageBackend::S3 => write!(f, "s3"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fs" | "filesystem" => Ok(StorageBackend::Fs),
            "s3" | "aws" => Ok(StorageBackend::S3),
            _ => anyhow::bail!("Unsupported storage backend: {}. Supported: fs, s3", s),
        }
    }
}

/// S3 upload settings: bucket, key layout and client endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct S3UploaderConfig {
    pub region: String,
    pub s3_bucket: String,
    /// Leading key segment. Joined with `/` even when empty.
    pub s3_prefix: String,
    /// Partition granularity setting (`hour` or `minute`).
    pub s3_partition: String,
    /// Prepended to the signal label in the object file name.
    pub file_prefix: String,
    /// Explicit endpoint override. `None` or empty defers to the resolver fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub s3_force_path_style: bool,
    pub compression: Compression,
}

impl Default for S3UploaderConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            s3_bucket: String::new(),
            s3_prefix: String::new(),
            s3_partition: "hour".to_string(),
            file_prefix: String::new(),
            endpoint: None,
            s3_force_path_style: false,
            compression: Compression::None,
        }
    }
}

impl S3UploaderConfig {
    /// Partition granularity, with unrecognised settings falling back to hourly.
    pub fn granularity(&self) -> Granularity {
        Granularity::from_setting(&self.s3_partition)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsConfig {
    pub path: String,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            path: "./data".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl ExporterConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Load configuration from a specific file path (for CLI usage).
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Build a configuration from optional inline TOML plus overrides supplied by
    /// an `EnvSource`. Never touches the host environment or filesystem.
    pub fn load_with_env<E: EnvSource>(inline_config: Option<&str>, env: &E) -> Result<Self> {
        let mut config = match inline_config {
            Some(inline) => {
                toml::from_str(inline).context("Failed to parse inline config content")?
            }
            None => ExporterConfig::default(),
        };

        config.apply_env_overrides_from(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides from a custom source.
    pub fn apply_env_overrides_from<E: EnvSource>(&mut self, env: &E) -> Result<()> {
        env_overrides::apply_env_overrides(self, env)
    }

    /// File extension for uploaded objects, including the compression suffix.
    pub fn file_format(&self) -> String {
        match self.s3uploader.compression.extension() {
            Some(ext) => format!("{}.{}", self.marshaler.format(), ext),
            None => self.marshaler.format().to_string(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("fs".parse::<StorageBackend>().unwrap(), StorageBackend::Fs);
        assert_eq!("s3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!(
            "filesystem".parse::<StorageBackend>().unwrap(),
            StorageBackend::Fs
        );
        assert_eq!("aws".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert!("r2".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_default_configs() {
        let config = ExporterConfig::default();
        assert_eq!(config.backend, StorageBackend::S3);
        assert_eq!(config.s3uploader.region, "us-east-1");
        assert_eq!(config.s3uploader.s3_partition, "hour");
        assert_eq!(config.s3uploader.granularity(), Granularity::Hour);
        assert!(config.s3uploader.endpoint.is_none());
        assert_eq!(config.log.format, LogFormat::Text);
    }

    #[test]
    fn test_parse_toml() {
        let config: ExporterConfig = toml::from_str(
            r#"
            marshaler = "otlp_proto"

            [s3uploader]
            s3_bucket = "telemetry"
            s3_prefix = "keyprefix"
            s3_partition = "minute"
            file_prefix = "fileprefix"
            endpoint = "http://localhost:4566"
            compression = "gzip"
            "#,
        )
        .unwrap();

        assert_eq!(config.marshaler, Marshaler::OtlpProto);
        assert_eq!(config.s3uploader.s3_bucket, "telemetry");
        assert_eq!(config.s3uploader.region, "us-east-1");
        assert_eq!(config.s3uploader.granularity(), Granularity::Minute);
        assert_eq!(
            config.s3uploader.endpoint.as_deref(),
            Some("http://localhost:4566")
        );
        assert_eq!(config.file_format(), "binpb.gz");
    }

    #[test]
    fn test_file_format_without_compression() {
        let config = ExporterConfig::default();
        assert_eq!(config.file_format(), "json");
    }
}
