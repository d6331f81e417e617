use std::path::PathBuf;
use std::time::Duration;

use gateway_core::config::{default_config_path, load_config, IDENTITY_SECRET_ENV, PLACES_API_KEY_ENV};

fn presence(value: &Option<String>) -> &'static str {
    if value.is_some() { "configured" } else { "MISSING" }
}

pub async fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config_path.clone())?;

    println!("Admin Gateway Status");
    println!("====================");
    println!();
    println!("Configuration:");
    match &config_path {
        Some(path) => println!("  Config file: {:?}", path),
        None => println!("  Default config file: {:?}", default_config_path()),
    }
    println!();
    println!("Server settings:");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!();
    println!("Upstreams:");
    println!("  Identity: {} ({} {})", config.identity.base_url, IDENTITY_SECRET_ENV, presence(&config.identity.secret_key));
    println!("  Places:   {} ({} {})", config.places.base_url, PLACES_API_KEY_ENV, presence(&config.places.api_key));

    // Probe the health endpoint; a wildcard bind address is reached through loopback
    println!();
    let host = if config.server.host == "0.0.0.0" { "127.0.0.1" } else { config.server.host.as_str() };
    let url = format!("http://{}:{}/healthz", host, config.server.port);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()?;
    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            println!("Server: RUNNING ✓");
        }
        _ => {
            println!("Server: NOT RUNNING");
        }
    }

    Ok(())
}
