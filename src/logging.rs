//! Tracing setup for the command-line binary
//!
//! `ROUNDABOUT_LOG` takes the usual `EnvFilter` syntax
//! (`roundabout=debug,roundabout::cache=trace`). Without it, verbosity flags
//! pick the level. Logs go to stderr so report output on stdout stays
//! machine-readable.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

use crate::constants::analysis::LOG_ENV;

static INIT: Once = Once::new();

/// Filter used when `ROUNDABOUT_LOG` is not set
fn default_filter(verbosity: u8) -> EnvFilter {
    match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("roundabout=info"),
        2 => EnvFilter::new("roundabout=debug"),
        _ => EnvFilter::new("roundabout=trace"),
    }
}

/// Install the global subscriber; later calls are no-ops
pub fn init(verbosity: u8) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default_filter(verbosity));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(verbosity > 1)
            .try_init();
    });
}
