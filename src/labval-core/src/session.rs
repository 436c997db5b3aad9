//! Session orchestration.
//!
//! ```text
//! Init ──verify auth token──▶ CallbackResolved ──send payload──▶ Exchanged
//!                                                                 │
//!                                     error set ◀─────────────────┤
//!                                        │                        │ result set
//!                                        ▼                        ▼
//!                                      Failed              FollowUpResolved
//! ```
//!
//! A failed transition is never retried; the session stays where it was and
//! the error is returned verbatim.

use std::sync::Arc;

use base64::Engine;
use labval_crypto::SigningKey;
use tracing::{debug, info, instrument, warn};

use crate::claims::{resolve_callback, resolve_follow_up, ScmClaims, ValidationClaims};
use crate::error::ValidatorError;
use crate::exchange::{Exchanger, HttpExchanger};
use crate::render::success_message;

/// Where a [`Session`] is in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Authorization token verified, exchange endpoint known (maybe empty).
    CallbackResolved,
    /// A response was received but carried neither `error` nor `result`.
    Exchanged,
    /// The service rejected the submission.
    Failed,
    /// The result token was verified and its follow-up URL extracted.
    FollowUpResolved,
}

/// Successful outcome of an exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptance {
    /// Follow-up endpoint from the result token (may be empty).
    pub follow_up_url: String,
    /// URL-safe base64 of the raw result token.
    pub encoded_token: String,
    /// Human-facing success message.
    pub message: String,
}

/// Terminal outcome of [`Session::submit`] that is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The service returned a verified result token.
    Accepted(Acceptance),
    /// The service returned neither an error nor a result.
    Empty,
}

/// One validator invocation's protocol state.
pub struct Session<E: Exchanger = HttpExchanger> {
    auth_token: String,
    exchange_url: String,
    follow_up_url: Option<String>,
    key: Arc<SigningKey>,
    exchanger: E,
    state: SessionState,
}

impl Session<HttpExchanger> {
    /// Verify `auth_token` and resolve its callback, using the HTTP exchanger.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Crypto`] if the token fails verification.
    pub fn new(auth_token: impl Into<String>, key: Arc<SigningKey>) -> Result<Self, ValidatorError> {
        Self::with_exchanger(auth_token, key, HttpExchanger::new())
    }
}

impl<E: Exchanger> Session<E> {
    /// Verify `auth_token` and resolve its callback.
    ///
    /// A `state` other than `scm_token` leaves the exchange endpoint empty.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Crypto`] if the token fails verification.
    #[instrument(skip_all)]
    pub fn with_exchanger(
        auth_token: impl Into<String>,
        key: Arc<SigningKey>,
        exchanger: E,
    ) -> Result<Self, ValidatorError> {
        let auth_token = auth_token.into();
        let claims = key.verify::<ScmClaims>(&auth_token)?.into_custom();

        let exchange_url = resolve_callback(&claims).to_string();
        if exchange_url.is_empty() {
            warn!(state = %claims.state, "Authorization token has no usable callback");
        } else {
            debug!(exchange_url = %exchange_url, name = %claims.name, "Resolved callback");
        }

        Ok(Self {
            auth_token,
            exchange_url,
            follow_up_url: None,
            key,
            exchanger,
            state: SessionState::CallbackResolved,
        })
    }

    /// Current protocol state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The endpoint the payload will be sent to.
    pub fn exchange_url(&self) -> &str {
        &self.exchange_url
    }

    /// The follow-up endpoint, once resolved.
    pub fn follow_up_url(&self) -> Option<&str> {
        self.follow_up_url.as_deref()
    }

    /// Replace the exchange endpoint, bypassing claim routing.
    pub fn override_exchange_url(&mut self, url: impl Into<String>) {
        self.exchange_url = url.into();
        info!(exchange_url = %self.exchange_url, "Exchange endpoint overridden");
    }

    /// Send `payload` and interpret the response.
    ///
    /// # Errors
    ///
    /// - transport, timeout or body errors from the exchanger
    /// - [`ValidatorError::RemoteRejection`] when the response's `error` is set
    /// - [`ValidatorError::Crypto`] if the result token fails verification
    #[instrument(skip_all, fields(exchange_url = %self.exchange_url))]
    pub fn submit(&mut self, payload: &[u8]) -> Result<ExchangeOutcome, ValidatorError> {
        let response = self
            .exchanger
            .send(&self.exchange_url, &self.auth_token, payload)?;
        self.state = SessionState::Exchanged;

        if response.is_rejection() {
            self.state = SessionState::Failed;
            info!(
                error = %response.error,
                findings = response.findings.as_ref().map_or(0, Vec::len),
                "Submission rejected"
            );
            return Err(ValidatorError::RemoteRejection {
                message: response.error,
                findings: response.findings,
            });
        }

        if !response.has_result() {
            warn!("Response carried neither error nor result");
            return Ok(ExchangeOutcome::Empty);
        }

        let acceptance = self.resolve_follow_up(&response.result)?;
        Ok(ExchangeOutcome::Accepted(acceptance))
    }

    fn resolve_follow_up(&mut self, result_token: &str) -> Result<Acceptance, ValidatorError> {
        let claims = self
            .key
            .verify::<ValidationClaims>(result_token)?
            .into_custom();

        let follow_up_url = resolve_follow_up(&claims).to_string();
        if follow_up_url.is_empty() {
            warn!(state = %claims.state, "Result token has no usable validation url");
        }

        let encoded_token = base64::engine::general_purpose::URL_SAFE.encode(result_token);
        let message = success_message(&follow_up_url, &encoded_token);

        self.follow_up_url = Some(follow_up_url.clone());
        self.state = SessionState::FollowUpResolved;

        Ok(Acceptance {
            follow_up_url,
            encoded_token,
            message,
        })
    }
}
