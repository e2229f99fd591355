//! Object key composition.
//!
//! Keys have the shape
//! `{key_prefix}/{partition}/{file_prefix}{signal}_{token}.{file_format}`.
//! Segments are concatenated with `/` verbatim: an empty key prefix still
//! yields a leading `/`, and no characters are escaped.

use chrono::{Datelike, Timelike};
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};

use super::partition::{partition_key, Granularity};

// Seeded once per process so concurrent writers start from unrelated offsets.
static TOKEN_COUNTER: Lazy<AtomicU64> = Lazy::new(|| AtomicU64::new(rand::random()));

/// Return a fresh uniqueness token.
///
/// Tokens come from a process-wide counter seeded randomly, so no two calls in
/// one process return the same value before the counter wraps (2^64 calls).
pub fn next_uniqueness_token() -> u64 {
    TOKEN_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Join the key parts around an explicit uniqueness token.
pub fn compose_object_key(
    partition: &str,
    key_prefix: &str,
    file_prefix: &str,
    signal: &str,
    file_format: &str,
    token: u64,
) -> String {
    format!(
        "{}/{}/{}{}_{}.{}",
        key_prefix, partition, file_prefix, signal, token, file_format
    )
}

/// Build the full object key for a write at `t` with a fresh uniqueness token.
pub fn build_object_key<T>(
    t: &T,
    key_prefix: &str,
    granularity: Granularity,
    file_prefix: &str,
    signal: &str,
    file_format: &str,
) -> String
where
    T: Datelike + Timelike,
{
    let partition = partition_key(t, granularity);
    let key = compose_object_key(
        &partition,
        key_prefix,
        file_prefix,
        signal,
        file_format,
        next_uniqueness_token(),
    );

    tracing::debug!(key = %key, granularity = granularity.as_str(), "Composed object key");
    key
}
