//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "preflight=info,preflight_analysis=info,preflight_core=info";

/// Initialize the preflight tracing/logging system.
///
/// Reads the `PREFLIGHT_LOG` environment variable for per-crate log levels.
/// Format: `PREFLIGHT_LOG=preflight_analysis=debug,preflight_core=warn`
///
/// Falls back to info level for the preflight crates if `PREFLIGHT_LOG` is
/// unset or invalid. Logs go to stderr; stdout is reserved for reports.
///
/// Calling this more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("PREFLIGHT_LOG")
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
