//! slirc-mirror - IRC bot with a client-side state mirror.

use anyhow::Context;
use slirc_mirror::config::{Config, validate};
use slirc_mirror::runtime::{self, Shutdown};
use slirc_mirror::telemetry;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    // Logging is configured from the file, so a load failure can only be
    // reported through the returned error.
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config {config_path}"))?;

    telemetry::init(&config.log);

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(path = %config_path, error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {config_path}", errors.len());
    }

    info!(
        host = %config.irc.host,
        port = config.irc.port,
        nick = %config.irc.nick,
        "Starting slirc-mirror"
    );

    let (state, shutdown) = runtime::run(&config.irc).await?;

    match shutdown {
        Shutdown::Quit => info!("Quit on request"),
        Shutdown::Interrupted => info!("Interrupted"),
    }

    let snapshot = state.snapshot();
    info!(
        channels = snapshot.channels.len(),
        nicks = snapshot.nicks.len(),
        "Final state"
    );
    debug!(state = %snapshot.to_json()?, "Final state dump");

    Ok(())
}
