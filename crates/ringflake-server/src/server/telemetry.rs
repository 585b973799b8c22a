//! Log output for the server.
//!
//! Events are written to stdout by `tracing_subscriber::fmt`, filtered by
//! `RUST_LOG` (default `info`). The library's own spans (bootstrap, peer
//! queries, generator stalls) are emitted because the server enables
//! `ringflake/tracing`.
//!
//! ```bash
//! RUST_LOG=ringflake=debug,tower_http=debug ringflake-server
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. Call once, before anything logs.
pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true),
        )
        .try_init()?;
    Ok(())
}
