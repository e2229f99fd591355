//! Upload of encoded telemetry payloads to partitioned object keys.

use chrono::{DateTime, Utc};
use flate2::{write::GzEncoder, Compression as GzLevel};
use std::io::Write;
use std::sync::Arc;

use super::error::{Result, WriterError};
use super::key::build_object_key;
use super::partition::Granularity;
use super::storage::{initialize_operator, ObjectSink};
use crate::config::{EnvSource, ExporterConfig};
use crate::types::{Compression, SignalType};

/// Static parts of every object key, taken from configuration.
#[derive(Debug, Clone)]
pub struct KeyLayout {
    pub key_prefix: String,
    pub file_prefix: String,
    pub granularity: Granularity,
    pub file_format: String,
}

impl KeyLayout {
    pub fn from_config(config: &ExporterConfig) -> Self {
        Self {
            key_prefix: config.s3uploader.s3_prefix.clone(),
            file_prefix: config.s3uploader.file_prefix.clone(),
            granularity: config.s3uploader.granularity(),
            file_format: config.file_format(),
        }
    }

    /// Full object key for a write at `at`.
    pub fn object_key(&self, at: &DateTime<Utc>, signal: SignalType) -> String {
        build_object_key(
            at,
            &self.key_prefix,
            self.granularity,
            &self.file_prefix,
            signal.as_str(),
            &self.file_format,
        )
    }
}

/// Request parameters for uploading one flushed batch.
pub struct UploadRequest<'a> {
    /// Type of OTLP signal (logs, traces, metrics)
    pub signal_type: SignalType,
    /// Payload already encoded by the configured marshaler
    pub body: &'a [u8],
    /// Batch timestamp used for partitioning; `None` uses the current time
    pub timestamp: Option<DateTime<Utc>>,
}

/// Writes payloads under time-partitioned keys through an [`ObjectSink`].
#[derive(Clone)]
pub struct S3Writer {
    sink: Arc<dyn ObjectSink>,
    layout: KeyLayout,
    compression: Compression,
}

impl std::fmt::Debug for S3Writer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Writer")
            .field("layout", &self.layout)
            .field("compression", &self.compression)
            .finish_non_exhaustive()
    }
}

impl S3Writer {
    /// Build a writer whose storage client uses the resolved endpoint.
    pub fn from_config<E: EnvSource>(config: &ExporterConfig, env: &E) -> Result<Self> {
        let operator = initialize_operator(config, env)?;
        Ok(Self::with_sink(Arc::new(operator), config))
    }

    /// Build a writer over an existing sink (e.g. an in-memory operator).
    pub fn with_sink(sink: Arc<dyn ObjectSink>, config: &ExporterConfig) -> Self {
        Self {
            sink,
            layout: KeyLayout::from_config(config),
            compression: config.s3uploader.compression,
        }
    }

    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    /// Upload one payload and return its composed object key.
    ///
    /// The key is returned as composed, before the storage client normalises
    /// it: with an empty `s3_prefix` it starts with `/`, while opendal stores
    /// the object without the leading slash.
    pub async fn upload(&self, req: UploadRequest<'_>) -> Result<String> {
        let at = req.timestamp.unwrap_or_else(Utc::now);
        let key = self.layout.object_key(&at, req.signal_type);

        let body = match self.compression {
            Compression::None => req.body.to_vec(),
            Compression::Gzip => gzip(req.body).map_err(|e| WriterError::put_object(&key, e))?,
        };
        let bytes_written = body.len();

        self.sink.put_object(&key, body).await?;

        tracing::info!(
            signal = %req.signal_type,
            key = %key,
            bytes = bytes_written,
            "Uploaded object"
        );

        Ok(key)
    }
}

fn gzip(body: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(body.len() / 2), GzLevel::default());
    encoder.write_all(body)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        objects: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait::async_trait]
    impl ObjectSink for RecordingSink {
        async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
            self.objects
                .lock()
                .unwrap()
                .push((key.to_string(), body));
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait::async_trait]
    impl ObjectSink for FailingSink {
        async fn put_object(&self, key: &str, _body: Vec<u8>) -> Result<()> {
            Err(WriterError::put_object(key, "refused"))
        }
    }

    fn config(partition: &str, compression: Compression) -> ExporterConfig {
        let mut config = ExporterConfig::default();
        config.s3uploader.s3_bucket = "telemetry".to_string();
        config.s3uploader.s3_prefix = "keyprefix".to_string();
        config.s3uploader.file_prefix = "fileprefix".to_string();
        config.s3uploader.s3_partition = partition.to_string();
        config.s3uploader.compression = compression;
        config
    }

    #[tokio::test]
    async fn upload_writes_under_partitioned_key() {
        let sink = Arc::new(RecordingSink::default());
        let writer = S3Writer::with_sink(sink.clone(), &config("minute", Compression::None));
        let ts = Utc.with_ymd_and_hms(2022, 6, 5, 0, 0, 0).unwrap();

        let key = writer
            .upload(UploadRequest {
                signal_type: SignalType::Logs,
                body: b"{\"resourceLogs\":[]}",
                timestamp: Some(ts),
            })
            .await
            .unwrap();

        assert!(key.starts_with(
            "keyprefix/year=2022/month=06/day=05/hour=00/minute=00/fileprefixlogs_"
        ));
        assert!(key.ends_with(".json"));

        let objects = sink.objects.lock().unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].0, key);
        assert_eq!(objects[0].1, b"{\"resourceLogs\":[]}");
    }

    #[tokio::test]
    async fn gzip_compresses_and_suffixes_key() {
        let sink = Arc::new(RecordingSink::default());
        let writer = S3Writer::with_sink(sink.clone(), &config("hour", Compression::Gzip));
        let payload = b"metric payload ".repeat(64);

        let key = writer
            .upload(UploadRequest {
                signal_type: SignalType::Metrics,
                body: &payload,
                timestamp: None,
            })
            .await
            .unwrap();
        assert!(key.ends_with(".json.gz"));
        assert!(key.contains("/fileprefixmetrics_"));
        assert!(!key.contains("minute="));

        let objects = sink.objects.lock().unwrap();
        let mut decoded = Vec::new();
        GzDecoder::new(objects[0].1.as_slice())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, payload);
    }

    #[tokio::test]
    async fn empty_prefix_key_is_returned_as_composed() {
        let sink = Arc::new(RecordingSink::default());
        let mut cfg = config("hour", Compression::None);
        cfg.s3uploader.s3_prefix = String::new();
        let writer = S3Writer::with_sink(sink.clone(), &cfg);

        let key = writer
            .upload(UploadRequest {
                signal_type: SignalType::Logs,
                body: b"{}",
                timestamp: Some(Utc.with_ymd_and_hms(2022, 6, 5, 0, 0, 0).unwrap()),
            })
            .await
            .unwrap();

        assert!(key.starts_with("/year=2022/month=06/day=05/hour=00/fileprefixlogs_"));
        assert_eq!(sink.objects.lock().unwrap()[0].0, key);
    }

    #[tokio::test]
    async fn sink_errors_propagate() {
        let writer = S3Writer::with_sink(Arc::new(FailingSink), &config("hour", Compression::None));
        let err = writer
            .upload(UploadRequest {
                signal_type: SignalType::Traces,
                body: b"",
                timestamp: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WriterError::PutObject { ref key, .. } if key.starts_with("keyprefix/")));
    }

    #[test]
    fn debug_output_shows_layout_without_sink() {
        let writer = S3Writer::with_sink(Arc::new(FailingSink), &config("minute", Compression::Gzip));
        let rendered = format!("{:?}", writer);
        assert!(rendered.starts_with("S3Writer {"));
        assert!(rendered.contains("key_prefix: \"keyprefix\""));
        assert!(rendered.contains("granularity: Minute"));
        assert!(rendered.contains("compression: Gzip"));
        assert!(!rendered.contains("sink"));
    }

    #[test]
    fn layout_reads_config() {
        let layout = KeyLayout::from_config(&config("weekly", Compression::Gzip));
        assert_eq!(layout.granularity, Granularity::Hour);
        assert_eq!(layout.file_format, "json.gz");
        assert_eq!(layout.key_prefix, "keyprefix");
    }
}
