//! # labval-core
//!
//! Token-validation and result-exchange protocol for labs-validator, the
//! client that submits scanner or config output to the labs verification
//! service.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Session                             │
//! │                                                              │
//! │  LABS_AUTH ──▶ SigningKey::verify ──▶ resolve_callback       │
//! │                                            │                 │
//! │                                            ▼                 │
//! │  payload ────────────────────────────▶ Exchanger::send       │
//! │                                            │                 │
//! │                       error ◀──────────────┤                 │
//! │                         │                  │ result          │
//! │                         ▼                  ▼                 │
//! │                 RemoteRejection   SigningKey::verify         │
//! │                                            │                 │
//! │                                            ▼                 │
//! │                                   resolve_follow_up          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Data sources (`sources::trivy`, `sources::webconfig`) only produce the
//! payload; the protocol is shared.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod claims;
pub mod commands;
pub mod config;
pub mod error;
pub mod exchange;
pub mod render;
pub mod session;
pub mod sources;
pub mod types;

pub use claims::{
    resolve_callback, resolve_follow_up, RoutedClaims, ScmClaims, ValidationClaims,
    SCM_TOKEN_STATE, VALIDATION_TOKEN_STATE,
};
pub use commands::{execute, run, SourceCommand};
pub use config::{LabsEnvironment, ValidatorConfig};
pub use error::{ErrorCategory, ValidatorError};
pub use exchange::{ExchangeEnvelope, ExchangeResponse, Exchanger, HttpExchanger};
pub use session::{Acceptance, ExchangeOutcome, Session, SessionState};
pub use sources::SourceKind;
pub use types::Finding;
