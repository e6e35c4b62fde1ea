//! Diagnostic logging bootstrap
//!
//! Diagnostics go to stderr through `tracing`; command output never does.

use crate::artifacts::core::settings::Settings;
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

pub fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&settings.log_filter)
        .map_err(|e| anyhow::anyhow!("invalid log filter {}: {}", settings.log_filter, e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))
}
