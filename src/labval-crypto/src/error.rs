//! Cryptographic error types.

use thiserror::Error;

/// Errors that can occur while loading the trusted key or verifying a token.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The trusted key material could not be decoded or parsed.
    #[error("Error: Error parsing pem block - '{reason}'")]
    MalformedKey {
        /// Reason the key is unusable.
        reason: String,
    },

    /// The token signature does not verify against the trusted key.
    #[error("Error: Parsing claims from jwt - 'invalid signature: {reason}'")]
    InvalidSignature {
        /// Reason the signature was rejected.
        reason: String,
    },

    /// The token is past its `exp` claim.
    #[error("Error: Parsing claims from jwt - 'token is expired'")]
    Expired,

    /// The token is not valid yet (`nbf` or `iat` in the future).
    #[error("Error: Parsing claims from jwt - 'token is not valid yet: {reason}'")]
    NotYetValid {
        /// Which temporal claim failed.
        reason: String,
    },

    /// The token is not a well-formed compact JWS or its claims do not decode.
    #[error("Error: Parsing claims from jwt - '{reason}'")]
    Malformed {
        /// Reason the token is malformed.
        reason: String,
    },
}

impl CryptoError {
    /// Create a malformed key error.
    #[must_use]
    pub fn malformed_key(reason: impl Into<String>) -> Self {
        Self::MalformedKey {
            reason: reason.into(),
        }
    }

    /// Create an invalid signature error.
    #[must_use]
    pub fn invalid_signature(reason: impl Into<String>) -> Self {
        Self::InvalidSignature {
            reason: reason.into(),
        }
    }

    /// Create a malformed token error.
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// Whether this error came from the trusted key rather than a token.
    #[must_use]
    pub fn is_key_error(&self) -> bool {
        matches!(self, Self::MalformedKey { .. })
    }
}

impl From<jsonwebtoken::errors::Error> for CryptoError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid {
                reason: "nbf".into(),
            },
            ErrorKind::InvalidSignature => Self::invalid_signature("signature mismatch"),
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                Self::invalid_signature("signing method not accepted")
            },
            ErrorKind::InvalidKeyFormat | ErrorKind::InvalidRsaKey(_) => {
                Self::malformed_key(err.to_string())
            },
            _ => Self::malformed(err.to_string()),
        }
    }
}
