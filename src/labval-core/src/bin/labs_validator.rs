//! labs-validator CLI - submit scanner or config output for validation.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use labval_core::config::debug_requested;
use labval_core::{execute, SourceCommand, SourceKind};
use labval_crypto::EmbeddedKeyProvider;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str = "Validate scanner results against a labs exercise.

The authorization token is read from LABS_AUTH. Set DEBUG=TRUE (or pass
--debug) for diagnostic logging on stderr.

File flags take the double-dash form: `trivy --json <FILE>` and
`webconfig-easy --xml <FILE>`. The single-dash `-json=<FILE>`, `-xml=<FILE>`
and `-debug` spellings of earlier releases are still accepted.";

/// Flags that earlier releases spelled with a single dash.
const LEGACY_FLAGS: [&str; 3] = ["json", "xml", "debug"];

/// Submit security-scanner or configuration output to the labs validation
/// service.
///
/// The authorization token is read from `LABS_AUTH`. Set `DEBUG=TRUE` (or
/// pass `--debug`) for diagnostic logging on stderr.
#[derive(Parser)]
#[command(name = "labs-validator")]
#[command(version = VERSION)]
#[command(about = "Validate scanner results against a labs exercise")]
#[command(long_about = LONG_ABOUT)]
struct Cli {
    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle trivy output
    Trivy {
        /// Input JSON file
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },

    /// Handle a trivial web.config file
    WebconfigEasy {
        /// Input web.config XML file
        #[arg(long, value_name = "FILE")]
        xml: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(long_flags(std::env::args_os()));
    let lookup = |name: &str| std::env::var(name).ok();

    // Logs go to stderr so stdout carries only the result.
    let level = if cli.debug || debug_requested(lookup) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let command = match cli.command {
        Commands::Trivy { json } => SourceCommand {
            source: SourceKind::Trivy,
            path: json,
        },
        Commands::WebconfigEasy { xml } => SourceCommand {
            source: SourceKind::WebConfigEasy,
            path: xml,
        },
    };

    let code = execute(
        &command,
        lookup,
        &EmbeddedKeyProvider::new(),
        &mut std::io::stdout().lock(),
    );
    ExitCode::from(code)
}

/// Rewrite `-json=<FILE>` style arguments to their `--json=<FILE>` form.
fn long_flags(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            let legacy = arg
                .to_str()
                .and_then(|text| text.strip_prefix('-'))
                .filter(|rest| !rest.starts_with('-'))
                .is_some_and(|rest| LEGACY_FLAGS.contains(&rest.split('=').next().unwrap_or(rest)));
            if legacy {
                let mut long = OsString::from("-");
                long.push(&arg);
                long
            } else {
                arg
            }
        })
        .collect()
}
