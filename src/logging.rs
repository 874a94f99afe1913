//! Diagnostic logging setup.
//!
//! Events go to stderr so they never mix with answers printed on stdout.
//! `RUST_LOG` overrides the per-command default.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default directive for line-oriented commands.
pub const CLI_DEFAULT: &str = "warn";

/// Default directive for the TUI. Output on stderr would corrupt the screen.
pub const TUI_DEFAULT: &str = "off";

/// Installs the global subscriber. Repeated calls are ignored.
pub fn init(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
