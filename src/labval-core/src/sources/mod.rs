//! Data-source adapters.
//!
//! Each adapter turns a file's raw bytes into the payload submitted to the
//! verification service. The protocol itself lives in [`crate::session`].
//!
//! ## Files
//! - `trivy.rs`: Trivy misconfiguration JSON report.
//! - `webconfig.rs`: ASP.NET `web.config` `httpCookies@requireSSL`.

pub mod trivy;
pub mod webconfig;

use crate::error::ValidatorError;

/// The kinds of input the validator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Trivy JSON report.
    Trivy,
    /// Minimal `web.config` check.
    WebConfigEasy,
}

impl SourceKind {
    /// Subcommand name.
    #[must_use]
    pub const fn command(&self) -> &'static str {
        match self {
            Self::Trivy => "trivy",
            Self::WebConfigEasy => "webconfig-easy",
        }
    }

    /// Name of the file flag, used in error messages.
    #[must_use]
    pub const fn file_flag(&self) -> &'static str {
        match self {
            Self::Trivy => "--json",
            Self::WebConfigEasy => "--xml",
        }
    }

    /// What the user is having validated, as shown on rejection.
    #[must_use]
    pub const fn subject(&self) -> &'static str {
        match self {
            Self::Trivy => "scanner results",
            Self::WebConfigEasy => "config",
        }
    }

    /// Convert raw file contents into the exchange payload.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Protocol`] if the input cannot be normalized.
    pub fn build_payload(&self, raw: &[u8]) -> Result<Vec<u8>, ValidatorError> {
        match self {
            Self::Trivy => trivy::build_payload(raw),
            Self::WebConfigEasy => webconfig::build_payload(raw),
        }
    }
}
