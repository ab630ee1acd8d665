//! Tracing subscriber set-up
//!
//! Logs go to stderr so stdout stays usable for dry-run output.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,infrared=info";

/// Install the global subscriber. `RUST_LOG` wins when set.
pub fn init(debug: bool) {
    let fallback = if debug { "debug" } else { DEFAULT_FILTER };

    // try_init: a second call (e.g. from tests) is a no-op
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Whether `--debug` appears anywhere in the raw argument vector
pub fn debug_requested<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter().any(|a| a.as_ref() == "--debug")
}
