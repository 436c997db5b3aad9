//! Trusted key loading.
//!
//! The process trusts a single RSA public key. Where the PEM text comes from
//! is abstracted behind [`TrustedKeyProvider`] so a build can ship a rotated
//! key, or tests can substitute their own, without touching the verifier.

use std::borrow::Cow;
use std::fmt;

use jsonwebtoken::DecodingKey;
use rustls_pki_types::pem::{Error as PemError, PemObject};
use rustls_pki_types::SubjectPublicKeyInfoDer;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::error::CryptoError;

/// Source of the trusted public key in PEM form.
pub trait TrustedKeyProvider {
    /// Short label used in diagnostics.
    fn name(&self) -> &str;

    /// PEM-encoded `PUBLIC KEY` block.
    fn pem(&self) -> Result<Cow<'_, str>, CryptoError>;
}

/// The key compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedKeyProvider;

impl EmbeddedKeyProvider {
    const PEM: &'static str = include_str!("../keys/labs_validator.pub.pem");

    /// Create the provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TrustedKeyProvider for EmbeddedKeyProvider {
    fn name(&self) -> &str {
        "embedded"
    }

    fn pem(&self) -> Result<Cow<'_, str>, CryptoError> {
        Ok(Cow::Borrowed(Self::PEM))
    }
}

/// A key supplied as PEM text at startup.
#[derive(Debug, Clone)]
pub struct PemKeyProvider {
    name: String,
    pem: String,
}

impl PemKeyProvider {
    /// Wrap caller-supplied PEM text.
    pub fn new(name: impl Into<String>, pem: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pem: pem.into(),
        }
    }
}

impl TrustedKeyProvider for PemKeyProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn pem(&self) -> Result<Cow<'_, str>, CryptoError> {
        Ok(Cow::Borrowed(&self.pem))
    }
}

/// The parsed, immutable RSA verification key.
#[derive(Clone)]
pub struct SigningKey {
    pub(crate) decoding_key: DecodingKey,
    fingerprint: [u8; 32],
}

impl SigningKey {
    /// Decode and parse the provider's PEM block.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedKey`] if there is no `PUBLIC KEY`
    /// block, the body is not valid base64, or the key is not RSA.
    #[instrument(skip_all, fields(provider = provider.name()))]
    pub fn initialize(provider: &dyn TrustedKeyProvider) -> Result<Self, CryptoError> {
        let pem = provider.pem()?;
        let der = SubjectPublicKeyInfoDer::from_pem_slice(pem.as_bytes()).map_err(|e| match e {
            PemError::NoItemsFound => CryptoError::malformed_key("No pem"),
            other => CryptoError::malformed_key(other.to_string()),
        })?;

        let decoding_key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| CryptoError::malformed_key(e.to_string()))?;

        let fingerprint: [u8; 32] = Sha256::digest(der.as_ref()).into();
        debug!(
            fingerprint = %hex::encode(fingerprint),
            der_len = der.as_ref().len(),
            "Got a successful rsa pub key"
        );

        Ok(Self {
            decoding_key,
            fingerprint,
        })
    }

    /// SHA-256 over the DER `SubjectPublicKeyInfo`.
    #[must_use]
    pub fn fingerprint(&self) -> &[u8; 32] {
        &self.fingerprint
    }

    /// Hex form of [`Self::fingerprint`].
    #[must_use]
    pub fn fingerprint_hex(&self) -> String {
        hex::encode(self.fingerprint)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("fingerprint", &self.fingerprint_hex())
            .finish_non_exhaustive()
    }
}
