//! Tracing subscriber setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. Logs go to stderr so stdout stays usable
/// for `--json` output.
///
/// `RUST_LOG` wins when set. Otherwise only warnings are logged unless
/// `--verbose` raises the level to `debug`.
pub fn init(verbose: bool) {
    let default = if verbose { "autoclean=debug" } else { "autoclean=warn" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
