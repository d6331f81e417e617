use std::path::PathBuf;

use gateway_core::config::load_config;
use gateway_core::proxy::GatewayServer;

pub async fn run(config_path: Option<PathBuf>, port_override: Option<u16>) -> anyhow::Result<()> {
    // Load configuration (file + credential environment overlay)
    let mut config = load_config(config_path)?;

    if let Some(port) = port_override {
        config.server.port = port;
    }

    tracing::info!("Starting Admin Gateway...");
    tracing::info!("  Port: {}", config.server.port);
    tracing::info!("  Host: {}", config.server.host);
    tracing::info!("  Identity provider: {}", config.identity.base_url);
    tracing::info!("  Places provider: {}", config.places.base_url);
    tracing::info!(
        "  Timeouts: connect {}s, request {}s",
        config.timeouts.connect_timeout,
        config.timeouts.request_timeout
    );

    let server = GatewayServer::new(&config)?;

    tracing::info!("Gateway starting on http://{}:{}", config.server.host, config.server.port);
    tracing::info!("Press Ctrl+C to stop");

    // Run server (blocks until shutdown)
    server.run().await?;

    Ok(())
}
