//! Diagnostic logging setup

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "EDACLF_LOG";

static INIT: Once = Once::new();

/// Install a stderr fmt subscriber filtered by `EDACLF_LOG`.
///
/// Format: `EDACLF_LOG=edaclf::transform=debug,edaclf::report=info`.
/// Falls back to `warn` when unset or invalid. Idempotent.
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    });
}
