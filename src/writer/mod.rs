//! Object key layout, endpoint resolution and upload.
//!
//! Keys and endpoints are pure functions of their inputs; the writer ties
//! them to an opendal-backed put-object sink.

// Allow large error types - rich diagnostic messages are more valuable on error paths.
#![allow(clippy::result_large_err)]

mod endpoint;
mod error;
mod key;
mod partition;
mod storage;
mod write;

pub use endpoint::{resolve_endpoint, AWS_ENDPOINT_ENV};
pub use error::{ErrorCode, Result, WriterError};
pub use key::{build_object_key, compose_object_key, next_uniqueness_token};
pub use partition::{partition_key, Granularity};
pub use storage::{initialize_operator, ObjectSink};
pub use write::{KeyLayout, S3Writer, UploadRequest};
