//! Token types shared by the verifier and its callers.

use serde::{Deserialize, Serialize};

/// Signature algorithms accepted for tokens signed by the trusted key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256
    Rs256,
    /// RSASSA-PKCS1-v1_5 with SHA-384
    Rs384,
    /// RSASSA-PKCS1-v1_5 with SHA-512
    Rs512,
}

impl SignatureAlgorithm {
    /// Every algorithm the verifier will accept.
    pub const ACCEPTED: [Self; 3] = [Self::Rs256, Self::Rs384, Self::Rs512];

    /// The JWS `alg` header value.
    #[must_use]
    pub const fn jws_name(&self) -> &'static str {
        match self {
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
        }
    }

    pub(crate) const fn to_jwt(self) -> jsonwebtoken::Algorithm {
        match self {
            Self::Rs256 => jsonwebtoken::Algorithm::RS256,
            Self::Rs384 => jsonwebtoken::Algorithm::RS384,
            Self::Rs512 => jsonwebtoken::Algorithm::RS512,
        }
    }
}

/// Registered (RFC 7519) claims carried by every validator token.
///
/// All fields are optional; temporal claims are only enforced when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    /// Subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Expiration (Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    /// Not before (Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<u64>,
    /// Issued at (Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

/// Claims of a token that passed signature and temporal validation.
///
/// `T` is the caller's custom claim shape; it is decoded from the same JSON
/// object as the registered claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedClaims<T> {
    /// Registered claims.
    #[serde(flatten)]
    pub registered: RegisteredClaims,
    /// Custom claims.
    #[serde(flatten)]
    pub custom: T,
}

impl<T> VerifiedClaims<T> {
    /// Consume the wrapper and keep only the custom claims.
    pub fn into_custom(self) -> T {
        self.custom
    }
}
