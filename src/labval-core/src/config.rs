//! Configuration for a validator invocation.

use std::time::Duration;

use tracing::debug;

use crate::error::ValidatorError;

/// Variable holding the authorization token.
pub const AUTH_TOKEN_VAR: &str = "LABS_AUTH";
/// Variable selecting a fixed local/dev exchange endpoint.
pub const ENVIRONMENT_VAR: &str = "LABS_ENV";
/// Variable that enables debug logging when set to `TRUE`.
pub const DEBUG_VAR: &str = "DEBUG";

/// Client-side deadline for the exchange request.
pub const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Non-production environments whose endpoint replaces the token's callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabsEnvironment {
    /// Exercise stack running on localhost.
    Local,
    /// Shared dev deployment.
    Dev,
}

impl LabsEnvironment {
    /// Parse a `LABS_ENV` value. Unrecognized values select nothing.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "local" => Some(Self::Local),
            "dev" => Some(Self::Dev),
            _ => None,
        }
    }

    /// The fixed exchange endpoint for this environment.
    #[must_use]
    pub const fn exchange_url(&self) -> &'static str {
        match self {
            Self::Local => "http://localhost/exercise/squirrel/scm_api_callback",
            Self::Dev => "http://labs-exercise-test-508391972.ap-southeast-2.elb.amazonaws.com/exercise/squirrel/scm_api_callback",
        }
    }
}

/// Configuration for one validator run.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Raw authorization token.
    pub auth_token: String,
    /// Endpoint override, if any.
    pub environment: Option<LabsEnvironment>,
    /// Exchange request timeout.
    pub timeout: Duration,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            environment: None,
            timeout: EXCHANGE_TIMEOUT,
        }
    }
}

impl ValidatorConfig {
    /// Build from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Config`] if `LABS_AUTH` is unset or empty.
    pub fn from_env() -> Result<Self, ValidatorError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Config`] if `LABS_AUTH` is unset or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidatorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth_token = lookup(AUTH_TOKEN_VAR)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ValidatorError::config(format!("Missing environment variable {AUTH_TOKEN_VAR}"))
            })?;
        debug!("Found {}", AUTH_TOKEN_VAR);

        let environment = lookup(ENVIRONMENT_VAR).and_then(|value| LabsEnvironment::parse(&value));

        Ok(Self {
            auth_token,
            environment,
            ..Self::default()
        })
    }
}

/// Whether `DEBUG=TRUE` is present in the lookup.
///
/// Checked before [`ValidatorConfig`] is loaded so that configuration errors
/// are logged at the requested level.
pub fn debug_requested<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(DEBUG_VAR).as_deref() == Some("TRUE")
}
