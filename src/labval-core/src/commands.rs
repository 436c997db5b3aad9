//! Command runner shared by every data source.
//!
//! Order of operations: read the input file, load configuration, load the
//! trusted key, verify the authorization token, build the payload, exchange.
//! Nothing touches the network until every local step has succeeded.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use labval_crypto::{SigningKey, TrustedKeyProvider};
use tracing::{debug, error, info, instrument};

use crate::config::ValidatorConfig;
use crate::error::ValidatorError;
use crate::exchange::HttpExchanger;
use crate::render::rejection_report;
use crate::session::{Acceptance, ExchangeOutcome, Session};
use crate::sources::SourceKind;

/// A data-source subcommand and its input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCommand {
    /// Which adapter to run.
    pub source: SourceKind,
    /// Input file, if one was given.
    pub path: Option<PathBuf>,
}

/// Run one command to completion.
///
/// Returns the acceptance, or `None` when the service answered with neither
/// an error nor a result.
///
/// # Errors
///
/// Any [`ValidatorError`]; a rejection is [`ValidatorError::RemoteRejection`].
#[instrument(skip(lookup, keys), fields(source = command.source.command()))]
pub fn run<F>(
    command: &SourceCommand,
    lookup: F,
    keys: &dyn TrustedKeyProvider,
) -> Result<Option<Acceptance>, ValidatorError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = command.path.as_ref().ok_or_else(|| {
        ValidatorError::config(format!("missing {} file", command.source.file_flag()))
    })?;

    let raw = std::fs::read(path)
        .map_err(|e| ValidatorError::io(format!("issue reading file - '{}'", e)))?;
    debug!(path = %path.display(), bytes = raw.len(), "Read input file");

    let config = ValidatorConfig::from_lookup(lookup)?;
    let key = Arc::new(SigningKey::initialize(keys)?);

    let mut session = Session::with_exchanger(
        config.auth_token,
        key,
        HttpExchanger::with_timeout(config.timeout),
    )?;
    if let Some(environment) = config.environment {
        info!(environment = ?environment, "Running against non-production environment");
        session.override_exchange_url(environment.exchange_url());
    }

    let payload = command.source.build_payload(&raw)?;

    match session.submit(&payload)? {
        ExchangeOutcome::Accepted(acceptance) => Ok(Some(acceptance)),
        ExchangeOutcome::Empty => Ok(None),
    }
}

/// Run a command and write its user-facing output.
///
/// Returns the process exit code.
pub fn execute<F>(
    command: &SourceCommand,
    lookup: F,
    keys: &dyn TrustedKeyProvider,
    out: &mut dyn Write,
) -> u8
where
    F: Fn(&str) -> Option<String>,
{
    let (text, code) = match run(command, lookup, keys) {
        Ok(Some(acceptance)) => (acceptance.message, 0),
        Ok(None) => (String::new(), 0),
        Err(ValidatorError::RemoteRejection { message, findings }) => (
            rejection_report(command.source.subject(), &message, findings.as_deref()),
            1,
        ),
        Err(err) => (format!("{}\n", err), err.exit_code()),
    };

    if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        error!(error = %e, "Failed to write output");
        return 1;
    }
    code
}
