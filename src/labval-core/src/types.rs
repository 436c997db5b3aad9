//! Wire types shared across the exchange protocol.

use serde::{Deserialize, Deserializer, Serialize};

/// One outstanding issue reported by the verification service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Finding type (e.g. the scanner check family).
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: String,
    /// Check identifier.
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    /// Short title.
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    /// Scanner message for this occurrence.
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
    /// Longer description of the check.
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    /// Severity label.
    #[serde(default, deserialize_with = "nullable")]
    pub severity: String,
}

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
