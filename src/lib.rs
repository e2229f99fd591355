//! otlp2s3 - write batched OTLP telemetry to time-partitioned S3 objects.
//!
//! Each flush produces one object under
//! `{s3_prefix}/year=YYYY/month=MM/day=DD/hour=HH[/minute=MM]/{file_prefix}{signal}_{token}.{format}`.
//! The storage endpoint is resolved once, when the writer is built:
//! explicit `s3uploader.endpoint`, then `AWS_ENDPOINT_URL`, then the
//! client's default region-based resolution.

pub mod config;
pub mod init;
pub mod types;
pub mod writer;

pub use config::{EnvSource, ExporterConfig, MapEnvSource, S3UploaderConfig, StdEnvSource};
pub use types::{Compression, Marshaler, SignalType};
pub use writer::{
    build_object_key, partition_key, resolve_endpoint, Granularity, ObjectSink, S3Writer,
    UploadRequest, WriterError,
};
