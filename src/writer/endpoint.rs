//! Storage endpoint resolution.

use crate::config::{EnvSource, S3UploaderConfig};

/// Standard AWS endpoint override variable.
pub const AWS_ENDPOINT_ENV: &str = "AWS_ENDPOINT_URL";

/// Resolve the endpoint the S3 client should target.
///
/// First match wins:
/// 1. `config.endpoint`, when set and non-empty
/// 2. `AWS_ENDPOINT_URL` from `env`, when set and non-empty
/// 3. `None`: keep the client's own region-based endpoint resolution
///
/// Values are passed through unvalidated. `env` is read on every call.
pub fn resolve_endpoint<E: EnvSource>(config: &S3UploaderConfig, env: &E) -> Option<String> {
    if let Some(endpoint) = config.endpoint.as_deref().filter(|e| !e.is_empty()) {
        return Some(endpoint.to_string());
    }

    env.get_raw(AWS_ENDPOINT_ENV).filter(|e| !e.is_empty())
}
