//! Signed-token verification.
//!
//! Tokens are compact JWS strings (`header.payload.signature`). Verification
//! order is signature, then claim decoding, then temporal checks; a token
//! that fails any step yields an error and no claims.

use std::collections::HashSet;
use std::fmt::Debug;

use jsonwebtoken::{Algorithm, Validation};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::CryptoError;
use crate::key::SigningKey;
use crate::types::{SignatureAlgorithm, VerifiedClaims};

impl SigningKey {
    /// Verify `token` against this key and decode its claims as `T`.
    ///
    /// `exp` and `nbf` are checked by the JWS layer; `iat` is checked here.
    /// All three are optional and use zero leeway.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::InvalidSignature`] for a bad signature or an
    ///   algorithm outside [`SignatureAlgorithm::ACCEPTED`]
    /// - [`CryptoError::Expired`] / [`CryptoError::NotYetValid`]
    /// - [`CryptoError::Malformed`] if the token or its claims do not decode
    #[instrument(skip_all)]
    pub fn verify<T>(&self, token: &str) -> Result<VerifiedClaims<T>, CryptoError>
    where
        T: DeserializeOwned + Debug,
    {
        let data = jsonwebtoken::decode::<VerifiedClaims<T>>(token, &self.decoding_key, &validation())?;
        let claims = data.claims;

        if let Some(iat) = claims.registered.iat {
            if iat > jsonwebtoken::get_current_timestamp() {
                return Err(CryptoError::NotYetValid {
                    reason: "iat".into(),
                });
            }
        }

        debug!(alg = ?data.header.alg, claims = ?claims, "Got claims");
        Ok(claims)
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.algorithms = SignatureAlgorithm::ACCEPTED
        .iter()
        .map(|alg| alg.to_jwt())
        .collect();
    validation.required_spec_claims = HashSet::new();
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.validate_aud = false;
    validation
}
