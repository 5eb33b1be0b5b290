//! Log output for the command line tool
//!
//! `RESCAT_LOG` takes `EnvFilter` directives (e.g. `rescat=trace`). Without
//! it the level is `warn`, or `debug` with `--verbose`. Logs go to stderr so
//! they never mix with command output.

use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives
pub const LOG_ENV: &str = "RESCAT_LOG";

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "rescat=debug,warn" } else { "warn" }
}

/// Build the filter: `RESCAT_LOG` when set and valid, else the default level
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber; later calls are no-ops
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
