//! # labval-crypto
//!
//! Signed-token verification for labs-validator.
//!
//! The validator trusts exactly one RSA public key. It is loaded once from a
//! [`TrustedKeyProvider`] into an immutable [`SigningKey`], which is then used
//! for every token the process verifies:
//!
//! ```text
//! TrustedKeyProvider ──pem──▶ SigningKey::initialize ──▶ SigningKey
//!                                                         │
//!                         token ──────────────────────────▶ verify::<T>()
//!                                                         │
//!                                                         ▼
//!                                                VerifiedClaims<T>
//! ```
//!
//! ## Security Properties
//!
//! - Only RSA PKCS#1 v1.5 signatures (RS256/RS384/RS512) are accepted
//! - `exp`, `nbf` and `iat` are enforced with zero leeway when present
//! - Claims are never returned for a token that failed any check

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod key;
mod token;
mod types;

pub use error::CryptoError;
pub use key::{EmbeddedKeyProvider, PemKeyProvider, SigningKey, TrustedKeyProvider};
pub use types::{RegisteredClaims, SignatureAlgorithm, VerifiedClaims};
