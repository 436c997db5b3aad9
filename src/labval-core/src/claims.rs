//! Claim shapes for the two validator tokens and endpoint routing.
//!
//! Both tokens carry a `state` discriminant. A URL field is only meaningful
//! when `state` equals the shape's expected value; any other value resolves
//! to the empty endpoint rather than an error.

use serde::{Deserialize, Serialize};

use crate::types::nullable;

/// `state` of an authorization (inbound) token.
pub const SCM_TOKEN_STATE: &str = "scm_token";
/// `state` of a result (outbound) token.
pub const VALIDATION_TOKEN_STATE: &str = "validation_token";

/// Claims whose endpoint is selected by their `state` discriminant.
pub trait RoutedClaims {
    /// The `state` value under which [`Self::url`] is meaningful.
    const EXPECTED_STATE: &'static str;

    /// The discriminant.
    fn state(&self) -> &str;

    /// The URL field, regardless of `state`.
    fn url(&self) -> &str;

    /// The URL when `state` matches, otherwise `""`.
    fn resolve(&self) -> &str {
        if self.state() == Self::EXPECTED_STATE {
            self.url()
        } else {
            ""
        }
    }
}

/// Claims of the authorization token supplied via `LABS_AUTH`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmClaims {
    /// Discriminant.
    #[serde(rename = "Lstate", alias = "state", default, deserialize_with = "nullable")]
    pub state: String,
    /// Exchange endpoint.
    #[serde(rename = "Lcb", alias = "callback", default, deserialize_with = "nullable")]
    pub callback: String,
    /// Exercise name.
    #[serde(rename = "Lname", alias = "name", default, deserialize_with = "nullable")]
    pub name: String,
}

impl RoutedClaims for ScmClaims {
    const EXPECTED_STATE: &'static str = SCM_TOKEN_STATE;

    fn state(&self) -> &str {
        &self.state
    }

    fn url(&self) -> &str {
        &self.callback
    }
}

/// Claims of the token returned by a successful exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationClaims {
    /// Discriminant.
    #[serde(rename = "Lstate", alias = "state", default, deserialize_with = "nullable")]
    pub state: String,
    /// Follow-up endpoint.
    #[serde(
        rename = "Lvurl",
        alias = "validation-url",
        default,
        deserialize_with = "nullable"
    )]
    pub validation_url: String,
    /// Exercise name.
    #[serde(rename = "Lname", alias = "name", default, deserialize_with = "nullable")]
    pub name: String,
}

impl RoutedClaims for ValidationClaims {
    const EXPECTED_STATE: &'static str = VALIDATION_TOKEN_STATE;

    fn state(&self) -> &str {
        &self.state
    }

    fn url(&self) -> &str {
        &self.validation_url
    }
}

/// Exchange endpoint of an authorization token, or `""`.
#[must_use]
pub fn resolve_callback(claims: &ScmClaims) -> &str {
    claims.resolve()
}

/// Follow-up endpoint of a result token, or `""`.
#[must_use]
pub fn resolve_follow_up(claims: &ValidationClaims) -> &str {
    claims.resolve()
}
