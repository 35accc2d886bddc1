//! Tracing subscriber setup.
//!
//! Records go to stderr, or are appended to the configured log file. Failing
//! writes are dropped by the subscriber and never reach request handling.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Filter used without `--verbose` and without `RUST_LOG`: warnings, plus the
/// one-line-per-request access log.
const DEFAULT_FILTER: &str = "warn,mngr::access=info";

/// Build the event filter.
///
/// `--verbose` enables INFO level everywhere, otherwise `RUST_LOG` wins over
/// [`DEFAULT_FILTER`].
fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file can't be opened or a subscriber is
/// already installed.
pub(crate) fn init(verbose: bool, log_file: Option<&Path>) -> Result<(), CliError> {
    let builder = tracing_subscriber::fmt().with_env_filter(filter(verbose));

    let result = if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    } else {
        builder.with_writer(std::io::stderr).try_init()
    };

    result.map_err(|e| CliError::Logging(e.to_string()))
}
