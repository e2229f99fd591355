use super::{ExporterConfig, FsConfig, LogFormat, StorageBackend};
use crate::types::{Compression, Marshaler};
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;

pub const ENV_PREFIX: &str = "OTLP2S3_";

/// Abstraction over environment-variable lookups so callers and tests can
/// supply their own source instead of the process environment.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the OTLP2S3_ prefix
    /// Used for AWS standard variables (AWS_REGION, AWS_ENDPOINT_URL, etc.)
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment keyed by full variable name.
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for MapEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(&format!("{}{}", ENV_PREFIX, key)).cloned()
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Apply environment-variable overrides (highest priority) to the exporter config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut ExporterConfig, env: &E) -> Result<()> {
    // Storage backend
    if let Some(backend) = env.get("BACKEND") {
        config.backend = backend
            .parse::<StorageBackend>()
            .context("Invalid OTLP2S3_BACKEND value")?;
    }
    if let Some(path) = env.get("FS_PATH") {
        config.fs.get_or_insert_with(FsConfig::default).path = path;
    }

    if let Some(marshaler) = env.get("MARSHALER") {
        config.marshaler = marshaler
            .parse::<Marshaler>()
            .context("Invalid OTLP2S3_MARSHALER value")?;
    }

    // S3 uploader
    let s3 = &mut config.s3uploader;
    if let Some(bucket) = env.get("S3_BUCKET") {
        s3.s3_bucket = bucket;
    }
    // AWS standard region variable (without OTLP2S3_ prefix), prefixed one wins
    if let Some(region) = env.get("S3_REGION").or_else(|| env.get_raw("AWS_REGION")) {
        s3.region = region;
    }
    if let Some(prefix) = env.get("S3_PREFIX") {
        s3.s3_prefix = prefix;
    }
    if let Some(partition) = env.get("S3_PARTITION") {
        s3.s3_partition = partition;
    }
    if let Some(file_prefix) = env.get("FILE_PREFIX") {
        s3.file_prefix = file_prefix;
    }
    if let Some(endpoint) = env.get("S3_ENDPOINT") {
        s3.endpoint = Some(endpoint);
    }
    if let Some(val) = get_env_bool(env, "S3_FORCE_PATH_STYLE")? {
        s3.s3_force_path_style = val;
    }
    if let Some(compression) = env.get("COMPRESSION") {
        s3.compression = compression
            .parse::<Compression>()
            .context("Invalid OTLP2S3_COMPRESSION value")?;
    }

    // Logging
    if let Some(level) = env.get("LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some(format) = env.get("LOG_FORMAT") {
        config.log.format = match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
    }

    Ok(())
}

fn get_env_bool<E: EnvSource>(env: &E, key: &str) -> Result<Option<bool>> {
    match env.get(key) {
        Some(val) => {
            let parsed = val.parse::<bool>().map_err(|e| {
                anyhow!(
                    "Failed to parse {}{} (expected bool): {}",
                    ENV_PREFIX,
                    key,
                    e
                )
            })?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::Granularity;

    #[test]
    fn overrides_s3_uploader_fields() {
        let env = MapEnvSource::new()
            .with("OTLP2S3_S3_BUCKET", "telemetry")
            .with("OTLP2S3_S3_PREFIX", "otel")
            .with("OTLP2S3_S3_PARTITION", "minute")
            .with("OTLP2S3_FILE_PREFIX", "collector-a-")
            .with("OTLP2S3_S3_ENDPOINT", "http://minio:9000")
            .with("OTLP2S3_S3_FORCE_PATH_STYLE", "true")
            .with("OTLP2S3_COMPRESSION", "gzip")
            .with("OTLP2S3_MARSHALER", "otlp_proto");

        let mut config = ExporterConfig::default();
        apply_env_overrides(&mut config, &env).unwrap();

        let s3 = &config.s3uploader;
        assert_eq!(s3.s3_bucket, "telemetry");
        assert_eq!(s3.s3_prefix, "otel");
        assert_eq!(s3.granularity(), Granularity::Minute);
        assert_eq!(s3.file_prefix, "collector-a-");
        assert_eq!(s3.endpoint.as_deref(), Some("http://minio:9000"));
        assert!(s3.s3_force_path_style);
        assert_eq!(s3.compression, Compression::Gzip);
        assert_eq!(config.marshaler, Marshaler::OtlpProto);
    }

    #[test]
    fn region_prefers_prefixed_variable() {
        let env = MapEnvSource::new().with("AWS_REGION", "eu-west-1");
        let mut config = ExporterConfig::default();
        apply_env_overrides(&mut config, &env).unwrap();
        assert_eq!(config.s3uploader.region, "eu-west-1");

        let env = env.with("OTLP2S3_S3_REGION", "ap-south-1");
        apply_env_overrides(&mut config, &env).unwrap();
        assert_eq!(config.s3uploader.region, "ap-south-1");
    }

    #[test]
    fn aws_endpoint_url_is_not_folded_into_config() {
        let env = MapEnvSource::new().with("AWS_ENDPOINT_URL", "https://default_endpoint.com");
        let mut config = ExporterConfig::default();
        apply_env_overrides(&mut config, &env).unwrap();
        assert!(config.s3uploader.endpoint.is_none());
    }

    #[test]
    fn rejects_invalid_values() {
        let mut config = ExporterConfig::default();
        let env = MapEnvSource::new().with("OTLP2S3_S3_FORCE_PATH_STYLE", "yes");
        assert!(apply_env_overrides(&mut config, &env).is_err());

        let env = MapEnvSource::new().with("OTLP2S3_BACKEND", "gcs");
        assert!(apply_env_overrides(&mut config, &env).is_err());
    }

    #[test]
    fn fs_path_creates_fs_section() {
        let env = MapEnvSource::new()
            .with("OTLP2S3_BACKEND", "fs")
            .with("OTLP2S3_FS_PATH", "/tmp/otel");
        let mut config = ExporterConfig::default();
        apply_env_overrides(&mut config, &env).unwrap();
        assert_eq!(config.backend, StorageBackend::Fs);
        assert_eq!(config.fs.unwrap().path, "/tmp/otel");
    }
}
