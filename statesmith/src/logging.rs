//! Diagnostics for scaffold and patch runs.
//!
//! Skip decisions, unresolved placeholders and index problems are emitted as
//! `tracing` events on stderr, filtered by `RUST_LOG`. What a command
//! produced (written paths, patch outcomes, `--json` payloads) is printed by
//! `main` on stdout and never goes through this subscriber.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when `RUST_LOG` is unset or unparsable; skip warnings stay visible.
const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber: compact events on stderr.
///
/// ```bash
/// RUST_LOG=statesmith=debug statesmith patch Player/Player.cs Jump
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
