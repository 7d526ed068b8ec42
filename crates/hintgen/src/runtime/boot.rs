//! Boot — logging init, config load, Docker connection.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::builder::HintBuilder;
use crate::conf::BuilderConfig;
use crate::error::BuildError;

/// Initialise the tracing / logging subsystem.
///
/// Logs go to stderr: stdout carries the generated documents.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hintgen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load config and connect the builder to the Docker daemon.
pub fn boot() -> Result<HintBuilder, BuildError> {
    info!("Starting hintgen v{}", env!("CARGO_PKG_VERSION"));

    let config = BuilderConfig::load()?;
    info!(
        "Loaded configuration: prefix={}, key={}, topic_prefix={}",
        config.prefix, config.key, config.topic_prefix
    );
    if !config.skip.is_empty() {
        info!("Skipping containers: {}", config.skip.join(", "));
    }

    info!(
        "Connecting to Docker daemon at: {} (API {})",
        if config.docker_host.is_empty() {
            "default socket"
        } else {
            &config.docker_host
        },
        config.docker_api_version
    );

    HintBuilder::connect(config).map_err(|e| {
        error!("Failed to create builder: {}", e);
        e
    })
}
