// Configuration validation
//
// Validates that required fields are present and values are sensible

use super::*;
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &ExporterConfig) -> Result<()> {
    match config.backend {
        StorageBackend::S3 => validate_s3_uploader(&config.s3uploader)?,
        StorageBackend::Fs => validate_fs(config.fs.as_ref())?,
    }

    validate_partition(&config.s3uploader);

    Ok(())
}

fn validate_s3_uploader(config: &S3UploaderConfig) -> Result<()> {
    if config.s3_bucket.is_empty() {
        bail!(
            "S3 bucket name is required\n\n\
            How to fix:\n\
              • Environment: export {}S3_BUCKET=my-bucket\n\
              • TOML: [s3uploader]\n              s3_bucket = \"my-bucket\"\n",
            ENV_PREFIX
        );
    }

    if config.region.is_empty() {
        bail!(
            "S3 region is required\n\n\
            How to fix:\n\
              • Environment: export {}S3_REGION=us-west-2\n\
              • TOML: [s3uploader]\n              region = \"us-west-2\"\n",
            ENV_PREFIX
        );
    }

    Ok(())
}

fn validate_fs(config: Option<&FsConfig>) -> Result<()> {
    let fs =
        config.ok_or_else(|| anyhow::anyhow!("fs storage backend requires 'fs' configuration"))?;

    if fs.path.is_empty() {
        bail!(
            "Filesystem path is required\n\n\
            How to fix:\n\
              • Environment: export {}FS_PATH=/data/otlp\n\
              • TOML: [fs]\n              path = \"/data/otlp\"\n",
            ENV_PREFIX
        );
    }

    Ok(())
}

/// Unrecognised partition settings are accepted and written hourly.
fn validate_partition(config: &S3UploaderConfig) {
    if !Granularity::is_recognized(&config.s3_partition) {
        warn!(
            s3_partition = %config.s3_partition,
            "s3uploader.s3_partition is not 'hour' or 'minute'; partitioning by hour"
        );
    }
}
