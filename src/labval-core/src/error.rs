//! Error types for validator operations.

use labval_crypto::CryptoError;
use thiserror::Error;

use crate::types::Finding;

/// Broad class of a [`ValidatorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing environment variable, file or flag.
    Config,
    /// File read failure, HTTP transport failure or timeout.
    Io,
    /// Malformed trusted key or a token that failed verification.
    Crypto,
    /// Request or response body of an unexpected shape.
    Protocol,
    /// Well-formed response carrying a non-empty `error` field.
    RemoteRejection,
}

/// Errors that can occur during a validator invocation.
///
/// Every variant is terminal: nothing in the pipeline retries.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// Required input missing.
    #[error("Error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Local or network I/O failed.
    #[error("Error: {message}")]
    Io {
        /// Error message.
        message: String,
    },

    /// The exchange request exceeded the client deadline.
    #[error("Error: Sending HTTP request - 'request to {endpoint} timed out after {seconds}s'")]
    Timeout {
        /// Endpoint that did not answer.
        endpoint: String,
        /// Configured deadline.
        seconds: u64,
    },

    /// Key or token verification failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// A body could not be serialized or parsed.
    #[error("Error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// The remote service rejected the submission.
    #[error("Error message: '{message}'")]
    RemoteRejection {
        /// The service's `error` field.
        message: String,
        /// Outstanding findings, when the service sent any.
        findings: Option<Vec<Finding>>,
    },
}

impl ValidatorError {
    /// Create a config error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Classify this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. } => ErrorCategory::Config,
            Self::Io { .. } | Self::Timeout { .. } => ErrorCategory::Io,
            Self::Crypto(_) => ErrorCategory::Crypto,
            Self::Protocol { .. } => ErrorCategory::Protocol,
            Self::RemoteRejection { .. } => ErrorCategory::RemoteRejection,
        }
    }

    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        1
    }
}
