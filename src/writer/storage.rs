//! Storage client construction and the put-object capability.

use async_trait::async_trait;

use super::endpoint::resolve_endpoint;
use super::error::{Result, WriterError};
use crate::config::{EnvSource, ExporterConfig, StorageBackend};

/// Accepts a fully formed object key and its payload.
#[async_trait]
pub trait ObjectSink: Send + Sync {
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()>;
}

#[async_trait]
impl ObjectSink for opendal::Operator {
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        self.write(key, body)
            .await
            .map_err(|e| WriterError::put_object(key, e))?;
        Ok(())
    }
}

/// Build the storage operator for the configured backend.
///
/// For S3 the endpoint comes from [`resolve_endpoint`]; when it resolves to
/// `None` the builder keeps its default region-based endpoint.
pub fn initialize_operator<E: EnvSource>(
    config: &ExporterConfig,
    env: &E,
) -> Result<opendal::Operator> {
    let operator = match config.backend {
        StorageBackend::Fs => {
            let fs = config.fs.as_ref().ok_or_else(|| {
                WriterError::invalid_config("fs config required for filesystem backend".to_string())
            })?;

            let fs_builder = opendal::services::Fs::default().root(&fs.path);
            opendal::Operator::new(fs_builder)
                .map_err(|e| WriterError::client_init("filesystem", e))?
                .finish()
        }
        StorageBackend::S3 => {
            let s3 = &config.s3uploader;
            if s3.s3_bucket.is_empty() {
                return Err(WriterError::invalid_config(
                    "s3uploader.s3_bucket required for S3 backend".to_string(),
                ));
            }

            let mut s3_builder = opendal::services::S3::default()
                .bucket(&s3.s3_bucket)
                .region(&s3.region);

            match resolve_endpoint(s3, env) {
                Some(endpoint) => {
                    tracing::debug!(endpoint = %endpoint, "Using endpoint override");
                    s3_builder = s3_builder.endpoint(&endpoint);
                }
                None => tracing::debug!(region = %s3.region, "Using default S3 endpoint"),
            }

            if !s3.s3_force_path_style {
                s3_builder = s3_builder.enable_virtual_host_style();
            }

            opendal::Operator::new(s3_builder)
                .map_err(|e| WriterError::client_init("s3", e))?
                .finish()
        }
    };

    tracing::debug!(backend = %config.backend, "Storage operator initialized");
    Ok(operator)
}
