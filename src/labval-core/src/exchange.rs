//! Result exchange with the verification service.
//!
//! One blocking POST per invocation:
//!
//! ```text
//! POST <callback>
//! Content-Type: application/json
//!
//! {"auth": "<authorization token>", "data": "<base64 payload>"}
//! ```
//!
//! The HTTP status is not inspected. Only the body decides the outcome, so a
//! 4xx/5xx response carrying `{"error": ...}` is still a parsed response.

use std::io;
use std::time::Duration;

use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::EXCHANGE_TIMEOUT;
use crate::error::ValidatorError;
use crate::types::{nullable, Finding};

/// Request body sent to the exchange endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeEnvelope {
    /// The caller's authorization token, unchanged.
    pub auth: String,
    /// Standard base64 of the payload bytes.
    pub data: String,
}

impl ExchangeEnvelope {
    /// Wrap `payload` for `auth_token`.
    #[must_use]
    pub fn new(auth_token: &str, payload: &[u8]) -> Self {
        Self {
            auth: auth_token.to_string(),
            data: encode_payload(payload),
        }
    }

    /// Recover the payload bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Protocol`] if `data` is not standard base64.
    pub fn payload(&self) -> Result<Vec<u8>, ValidatorError> {
        decode_payload(&self.data)
    }
}

/// Parsed response body.
///
/// `error` and `result` are independent: either, both or neither may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeResponse {
    /// Signed result token on success.
    #[serde(default, deserialize_with = "nullable")]
    pub result: String,
    /// Rejection message on failure.
    #[serde(default, deserialize_with = "nullable")]
    pub error: String,
    /// Outstanding findings accompanying a rejection.
    #[serde(default)]
    pub findings: Option<Vec<Finding>>,
}

impl ExchangeResponse {
    /// Decode a raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Protocol`] if the body is not the expected JSON.
    pub fn from_body(body: &str) -> Result<Self, ValidatorError> {
        serde_json::from_str(body).map_err(|e| {
            ValidatorError::protocol(format!("parsing response json - '{}'", e))
        })
    }

    /// The service rejected the submission.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        !self.error.is_empty()
    }

    /// The service returned a result token.
    #[must_use]
    pub fn has_result(&self) -> bool {
        !self.result.is_empty()
    }
}

/// Standard (padded) base64 of the payload.
#[must_use]
pub fn encode_payload(payload: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(payload)
}

/// Inverse of [`encode_payload`].
///
/// # Errors
///
/// Returns [`ValidatorError::Protocol`] on invalid base64.
pub fn decode_payload(data: &str) -> Result<Vec<u8>, ValidatorError> {
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| ValidatorError::protocol(format!("decoding payload - '{}'", e)))
}

/// Something that can deliver a payload to an exchange endpoint.
pub trait Exchanger {
    /// Send `payload` with `auth_token` to `endpoint` and parse the reply.
    fn send(
        &self,
        endpoint: &str,
        auth_token: &str,
        payload: &[u8],
    ) -> Result<ExchangeResponse, ValidatorError>;
}

impl<T: Exchanger + ?Sized> Exchanger for &T {
    fn send(
        &self,
        endpoint: &str,
        auth_token: &str,
        payload: &[u8],
    ) -> Result<ExchangeResponse, ValidatorError> {
        (**self).send(endpoint, auth_token, payload)
    }
}

/// Blocking HTTP exchanger.
pub struct HttpExchanger {
    agent: ureq::Agent,
    timeout: Duration,
}

impl HttpExchanger {
    /// Create an exchanger with the standard 30 second deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(EXCHANGE_TIMEOUT)
    }

    /// Create an exchanger with a custom deadline.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(&format!("labs-validator/{}", env!("CARGO_PKG_VERSION")))
            .build();

        Self { agent, timeout }
    }

    /// The configured deadline.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn transport_error(&self, endpoint: &str, err: &ureq::Transport) -> ValidatorError {
        let timed_out = std::error::Error::source(err)
            .and_then(|source| source.downcast_ref::<io::Error>())
            .is_some_and(|e| matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock));

        if timed_out {
            ValidatorError::Timeout {
                endpoint: endpoint.to_string(),
                seconds: self.timeout.as_secs(),
            }
        } else {
            ValidatorError::io(format!("Sending HTTP request - '{}'", err))
        }
    }
}

impl Default for HttpExchanger {
    fn default() -> Self {
        Self::new()
    }
}

impl Exchanger for HttpExchanger {
    #[instrument(skip(self, auth_token, payload), fields(payload_len = payload.len()))]
    fn send(
        &self,
        endpoint: &str,
        auth_token: &str,
        payload: &[u8],
    ) -> Result<ExchangeResponse, ValidatorError> {
        let envelope = ExchangeEnvelope::new(auth_token, payload);
        debug!(data = %envelope.data, "Final b64");

        let body = serde_json::to_string(&envelope)
            .map_err(|e| ValidatorError::protocol(format!("Marshaling json - '{}'", e)))?;

        info!(endpoint = %endpoint, "Submitting results to labs validator");

        let response = match self
            .agent
            .post(endpoint)
            .set("Content-Type", "application/json")
            .send_string(&body)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                warn!(endpoint = %endpoint, status = code, "Non-success status, parsing body anyway");
                response
            },
            Err(ureq::Error::Transport(transport)) => {
                warn!(endpoint = %endpoint, error = %transport, "HTTP request failed");
                return Err(self.transport_error(endpoint, &transport));
            },
        };

        let status = response.status();
        let raw = response.into_string().map_err(|e| {
            if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) {
                ValidatorError::Timeout {
                    endpoint: endpoint.to_string(),
                    seconds: self.timeout.as_secs(),
                }
            } else {
                ValidatorError::io(format!("Reading HTTP response - '{}'", e))
            }
        })?;
        debug!(status, body = %raw, "Result body");

        let parsed = ExchangeResponse::from_body(&raw)?;
        debug!(response = ?parsed, "Parsed results");
        Ok(parsed)
    }
}
