//! Error types for storage client construction and object uploads.

use thiserror::Error;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Uploader configuration missing or invalid
    E001InvalidConfig,
    /// E002: Storage client could not be constructed
    E002ClientInit,
    /// E003: Object could not be prepared or stored
    E003PutObject,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E001InvalidConfig => "E001",
            Self::E002ClientInit => "E002",
            Self::E003PutObject => "E003",
        }
    }

    pub fn docs_url(&self) -> String {
        format!(
            "https://smithclay.github.io/otlp2s3/troubleshooting.html#{}",
            self.as_str().to_lowercase()
        )
    }
}

/// Errors raised while building the storage client or putting objects
#[derive(Debug, Error)]
pub enum WriterError {
    /// A required uploader setting is missing
    #[error("[{code}] Invalid uploader configuration: {message}\n\nSee: {docs_url}")]
    InvalidConfig {
        code: &'static str,
        message: String,
        docs_url: String,
    },

    /// The opendal operator for the backend failed to build
    #[error("[{code}] Failed to create {backend} client: {reason}\n\nSee: {docs_url}")]
    ClientInit {
        code: &'static str,
        backend: String,
        reason: String,
        docs_url: String,
    },

    /// Compressing or writing an object failed
    #[error("[{code}] Failed to put object '{key}': {reason}\n\nSee: {docs_url}")]
    PutObject {
        code: &'static str,
        key: String,
        reason: String,
        docs_url: String,
    },
}

impl WriterError {
    pub fn invalid_config(message: String) -> Self {
        let code_enum = ErrorCode::E001InvalidConfig;
        Self::InvalidConfig {
            code: code_enum.as_str(),
            message,
            docs_url: code_enum.docs_url(),
        }
    }

    pub fn client_init(backend: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        let code_enum = ErrorCode::E002ClientInit;
        Self::ClientInit {
            code: code_enum.as_str(),
            backend: backend.into(),
            reason: reason.to_string(),
            docs_url: code_enum.docs_url(),
        }
    }

    pub fn put_object(key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        let code_enum = ErrorCode::E003PutObject;
        Self::PutObject {
            code: code_enum.as_str(),
            key: key.into(),
            reason: reason.to_string(),
            docs_url: code_enum.docs_url(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidConfig { .. } => ErrorCode::E001InvalidConfig,
            Self::ClientInit { .. } => ErrorCode::E002ClientInit,
            Self::PutObject { .. } => ErrorCode::E003PutObject,
        }
    }
}

/// Result type alias for WriterError
pub type Result<T> = std::result::Result<T, WriterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_object_message_names_key_and_docs() {
        let err = WriterError::put_object("otel/logs_1.json", "bucket missing");
        assert_eq!(err.code(), ErrorCode::E003PutObject);
        let msg = err.to_string();
        assert!(msg.starts_with("[E003] Failed to put object 'otel/logs_1.json': bucket missing"));
        assert!(msg.ends_with("troubleshooting.html#e003"));
    }

    #[test]
    fn client_init_message_names_backend() {
        let err = WriterError::client_init("s3", "region is missing");
        assert_eq!(err.code(), ErrorCode::E002ClientInit);
        assert!(err
            .to_string()
            .starts_with("[E002] Failed to create s3 client: region is missing"));
    }
}
