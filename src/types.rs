//! Shared types for signal kinds, marshalers and compression.

use serde::{Deserialize, Serialize};

/// OpenTelemetry signal types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    /// Logs signal
    Logs,
    /// Traces signal
    Traces,
    /// Metrics signal
    Metrics,
}

impl SignalType {
    /// Label embedded in object file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Logs => "logs",
            SignalType::Traces => "traces",
            SignalType::Metrics => "metrics",
        }
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SignalType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "logs" | "log" => Ok(SignalType::Logs),
            "traces" | "trace" => Ok(SignalType::Traces),
            "metrics" | "metric" => Ok(SignalType::Metrics),
            _ => anyhow::bail!("Unsupported signal: {}. Supported: logs, metrics, traces", s),
        }
    }
}

/// Payload marshaler. Only decides the file format tag; encoding happens upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marshaler {
    #[default]
    OtlpJson,
    OtlpProto,
    SumoIc,
    Body,
}

impl Marshaler {
    /// File extension written after the uniqueness token.
    pub fn format(&self) -> &'static str {
        match self {
            Marshaler::OtlpJson => "json",
            Marshaler::OtlpProto => "binpb",
            Marshaler::SumoIc => "json",
            Marshaler::Body => "txt",
        }
    }
}

impl std::fmt::Display for Marshaler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Marshaler::OtlpJson => write!(f, "otlp_json"),
            Marshaler::OtlpProto => write!(f, "otlp_proto"),
            Marshaler::SumoIc => write!(f, "sumo_ic"),
            Marshaler::Body => write!(f, "body"),
        }
    }
}

impl std::str::FromStr for Marshaler {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "otlp_json" => Ok(Marshaler::OtlpJson),
            "otlp_proto" => Ok(Marshaler::OtlpProto),
            "sumo_ic" => Ok(Marshaler::SumoIc),
            "body" => Ok(Marshaler::Body),
            _ => anyhow::bail!(
                "Unsupported marshaler: {}. Supported: otlp_json, otlp_proto, sumo_ic, body",
                s
            ),
        }
    }
}

/// Compression applied to the payload before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    Gzip,
}

impl Compression {
    /// Extension appended to the file format, if any.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            Compression::Gzip => Some("gz"),
        }
    }
}

impl std::str::FromStr for Compression {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "" | "none" => Ok(Compression::None),
            "gzip" => Ok(Compression::Gzip),
            _ => anyhow::bail!("Unsupported compression: {}. Supported: none, gzip", s),
        }
    }
}
