//! Trivy misconfiguration report adapter.
//!
//! The report is decoded into the subset of fields the service grades,
//! logged at debug level, and re-serialized as the payload. Decoding is
//! field-by-field: a value of the wrong type leaves that field at its zero
//! value and the rest of the report is kept. Input that is not a JSON object
//! is submitted as an empty report and graded by the service.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use tracing::{debug, warn};

use crate::error::ValidatorError;

/// Top-level Trivy JSON report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrivyReport {
    /// Report schema version, `0` when absent.
    #[serde(default = "zero", deserialize_with = "number_or_zero")]
    pub schema_version: Number,
    /// Scanned artifact.
    #[serde(default, deserialize_with = "lenient")]
    pub artifact_name: String,
    /// Artifact type (filesystem, container_image, ...).
    #[serde(default, deserialize_with = "lenient")]
    pub artifact_type: String,
    /// Per-target results.
    #[serde(default, deserialize_with = "lenient")]
    pub results: Option<Vec<TrivyResult>>,
}

/// One scanned target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrivyResult {
    /// Target path.
    #[serde(default, deserialize_with = "lenient")]
    pub target: String,
    /// Result class (config, lang-pkgs, ...).
    #[serde(default, deserialize_with = "lenient")]
    pub class: String,
    /// Counts keyed by `Successes`, `Failures`, `Exceptions`.
    #[serde(rename = "MisconfSummary", default, deserialize_with = "lenient")]
    pub summary: Option<BTreeMap<String, Number>>,
    /// Individual misconfigurations.
    #[serde(default, deserialize_with = "lenient")]
    pub misconfigurations: Option<Vec<Misconfiguration>>,
}

/// One misconfiguration reported by Trivy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Misconfiguration {
    /// Check family.
    #[serde(rename = "Type", default, deserialize_with = "lenient")]
    pub kind: String,
    /// Check identifier.
    #[serde(rename = "ID", default, deserialize_with = "lenient")]
    pub id: String,
    /// Short title.
    #[serde(rename = "Title", default, deserialize_with = "lenient")]
    pub title: String,
    /// Occurrence message.
    #[serde(rename = "Message", default, deserialize_with = "lenient")]
    pub message: String,
    /// Check description.
    #[serde(rename = "Description", default, deserialize_with = "lenient")]
    pub description: String,
    /// Severity label.
    #[serde(rename = "Severity", default, deserialize_with = "lenient")]
    pub severity: String,
    /// PASS / FAIL / EXCEPTION.
    #[serde(rename = "Status", default, deserialize_with = "lenient")]
    pub status: String,
    /// Reference URL.
    #[serde(rename = "PrimaryURL", default, deserialize_with = "lenient")]
    pub primary_url: String,
    /// Suggested fix.
    #[serde(rename = "Resolution", default, deserialize_with = "lenient")]
    pub resolution: String,
}

impl Default for TrivyReport {
    fn default() -> Self {
        Self {
            schema_version: zero(),
            artifact_name: String::new(),
            artifact_type: String::new(),
            results: None,
        }
    }
}

fn zero() -> Number {
    Number::from(0)
}

/// Decode a field, falling back to its zero value on a type mismatch.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<Number, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|_| zero()))
}

impl TrivyResult {
    /// Summary count for `key`, formatted for display, or `"na"`.
    #[must_use]
    pub fn summary_count(&self, key: &str) -> String {
        self.summary
            .as_ref()
            .and_then(|summary| summary.get(key))
            .and_then(Number::as_f64)
            .map_or_else(|| "na".to_string(), |count| format!("{}", count as i64))
    }
}

/// Decode a report, falling back to an empty report on malformed input.
#[must_use]
pub fn parse_report(raw: &[u8]) -> TrivyReport {
    serde_json::from_slice(raw).unwrap_or_else(|e| {
        warn!(error = %e, "Trivy report did not parse, submitting an empty report");
        TrivyReport::default()
    })
}

/// Normalize a raw Trivy report into the exchange payload.
///
/// # Errors
///
/// Returns [`ValidatorError::Protocol`] if the report cannot be re-serialized.
pub fn build_payload(raw: &[u8]) -> Result<Vec<u8>, ValidatorError> {
    let report = parse_report(raw);
    log_report(&report);

    let payload = serde_json::to_vec(&report)
        .map_err(|e| ValidatorError::protocol(format!("can't parse back into json - '{}'", e)))?;
    debug!(payload = %String::from_utf8_lossy(&payload), "Final json");
    Ok(payload)
}

fn log_report(report: &TrivyReport) {
    let Some(first) = report.results.as_ref().and_then(|results| {
        debug!(count = results.len(), "Found results");
        results.first()
    }) else {
        debug!("No results found");
        return;
    };

    debug!(
        successes = %first.summary_count("Successes"),
        failures = %first.summary_count("Failures"),
        exceptions = %first.summary_count("Exceptions"),
        "Misconfiguration summary"
    );

    match &first.misconfigurations {
        None => debug!("No misconfigurations found"),
        Some(misconfigs) => {
            for mc in misconfigs {
                debug!(
                    kind = %mc.kind,
                    id = %mc.id,
                    title = %mc.title,
                    url = %mc.primary_url,
                    message = %mc.message,
                    "Found misconfig"
                );
            }
        },
    }
}
