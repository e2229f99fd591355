// Initialization utilities
//
// Storage writer and logging/tracing setup

use crate::config::{EnvSource, ExporterConfig, LogFormat, StorageBackend};
use crate::writer::S3Writer;
use anyhow::Result;
use tracing::info;

/// Build the writer from ExporterConfig
pub fn init_writer<E: EnvSource>(config: &ExporterConfig, env: &E) -> Result<S3Writer> {
    info!(
        "Initializing writer with storage backend: {}",
        config.backend
    );

    match config.backend {
        StorageBackend::Fs => {
            if let Some(fs) = config.fs.as_ref() {
                info!("Using filesystem storage at: {}", fs.path);
            }
        }
        StorageBackend::S3 => {
            let s3 = &config.s3uploader;
            info!(
                "Using S3 storage: bucket={}, region={}, partition={}",
                s3.s3_bucket,
                s3.region,
                s3.granularity().as_str()
            );
        }
    }

    S3Writer::from_config(config, env)
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))
}

/// Initialize tracing/logging from ExporterConfig
pub fn init_tracing(config: &ExporterConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // Try to set the global subscriber; ignore error if already set (idempotent)
    let _ = match config.log.format {
        LogFormat::Json => {
            tracing::subscriber::set_global_default(registry.with(fmt::layer().json()))
        }
        LogFormat::Text => tracing::subscriber::set_global_default(registry.with(fmt::layer())),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapEnvSource;

    #[test]
    fn init_tracing_is_idempotent() {
        let config = ExporterConfig::default();
        init_tracing(&config);
        init_tracing(&config);
    }

    #[test]
    fn init_writer_reports_storage_errors() {
        let config = ExporterConfig::default();
        let err = init_writer(&config, &MapEnvSource::new()).unwrap_err();
        assert!(err.to_string().contains("Failed to initialize storage"));
    }
}
