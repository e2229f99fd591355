// otlp2s3 entry point
//
// Uploads one encoded telemetry payload to its time-partitioned object key.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};

use otlp2s3::config::{ExporterConfig, StdEnvSource};
use otlp2s3::init::{init_tracing, init_writer};
use otlp2s3::{SignalType, UploadRequest};

#[derive(Debug, Parser)]
#[command(name = "otlp2s3", version, about = "Upload OTLP payloads to partitioned S3 keys")]
struct Cli {
    /// TOML config file (defaults to OTLP2S3_CONFIG, ./config.toml, ./.otlp2s3.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Signal the payload carries: logs, metrics or traces
    #[arg(short, long, default_value = "logs")]
    signal: SignalType,

    /// Encoded payload file, or `-` for stdin
    payload: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config.as_ref() {
        Some(path) => ExporterConfig::load_from_path(path)?,
        None => ExporterConfig::load()?,
    };
    init_tracing(&config);

    let body = read_payload(&cli.payload)?;
    let writer = init_writer(&config, &StdEnvSource)?;

    let key = writer
        .upload(UploadRequest {
            signal_type: cli.signal,
            body: &body,
            timestamp: None,
        })
        .await?;

    println!("{}", key);
    Ok(())
}

fn read_payload(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut body = Vec::new();
        std::io::stdin()
            .read_to_end(&mut body)
            .context("Failed to read payload from stdin")?;
        return Ok(body);
    }

    std::fs::read(path).with_context(|| format!("Failed to read payload: {}", path.display()))
}
