//! `web.config` adapter.
//!
//! Only `configuration/system.web/httpCookies@requireSSL` is graded.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidatorError;

const ROOT_ELEMENT: &str = "configuration";

#[derive(Debug, Default, Deserialize)]
struct Configuration {
    #[serde(rename = "system.web", default)]
    system_web: SystemWeb,
}

#[derive(Debug, Default, Deserialize)]
struct SystemWeb {
    #[serde(rename = "httpCookies", default)]
    http_cookies: HttpCookies,
}

#[derive(Debug, Default, Deserialize)]
struct HttpCookies {
    #[serde(rename = "@requireSSL", default)]
    require_ssl: String,
}

/// Payload submitted for a `web.config` check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebConfigSummary {
    /// Raw `requireSSL` attribute value, empty when absent.
    #[serde(rename = "requiressl")]
    pub require_ssl: String,
}

/// Extract the summary from raw XML.
///
/// # Errors
///
/// Returns [`ValidatorError::Protocol`] for non-UTF-8 or malformed XML, or
/// when the document root is not `<configuration>`.
pub fn parse_config(raw: &[u8]) -> Result<WebConfigSummary, ValidatorError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| ValidatorError::protocol(format!("Unmarshaling XML - '{}'", e)))?;
    let text = text.trim_start_matches('\u{feff}');

    let root = root_element(text)?;
    if root != ROOT_ELEMENT {
        return Err(ValidatorError::protocol(format!(
            "Unmarshaling XML - 'expected element type <{ROOT_ELEMENT}> but have <{root}>'"
        )));
    }

    let config: Configuration = quick_xml::de::from_str(text)
        .map_err(|e| ValidatorError::protocol(format!("Unmarshaling XML - '{}'", e)))?;

    let require_ssl = config.system_web.http_cookies.require_ssl;
    if require_ssl.is_empty() {
        debug!("No value found for RequireSSL");
    } else {
        debug!(require_ssl = %require_ssl, "Found a value for the RequireSSL string");
    }

    Ok(WebConfigSummary { require_ssl })
}

/// Local name of the first element in the document.
fn root_element(text: &str) -> Result<String, ValidatorError> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            },
            Ok(Event::Eof) => return Err(ValidatorError::protocol("Unmarshaling XML - 'EOF'")),
            Ok(_) => {},
            Err(e) => {
                return Err(ValidatorError::protocol(format!("Unmarshaling XML - '{}'", e)));
            },
        }
    }
}

/// Normalize a raw `web.config` into the exchange payload.
///
/// # Errors
///
/// Returns [`ValidatorError::Protocol`] for malformed XML.
pub fn build_payload(raw: &[u8]) -> Result<Vec<u8>, ValidatorError> {
    let summary = parse_config(raw)?;
    serde_json::to_vec(&summary)
        .map_err(|e| ValidatorError::protocol(format!("can't parse back into json - '{}'", e)))
}
