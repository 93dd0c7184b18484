//! Tracing subscriber setup for the command-line front end.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV_VAR: &str = "TRG_RPC_LOG";

static INIT: Once = Once::new();

/// Installs a stderr subscriber filtered by `TRG_RPC_LOG`.
///
/// Falls back to `warn` when the variable is unset or invalid. Safe to call
/// more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
