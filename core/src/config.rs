use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the identity provider secret key
pub const IDENTITY_SECRET_ENV: &str = "CLERK_SECRET_KEY";
/// Environment variable holding the places provider API key
pub const PLACES_API_KEY_ENV: &str = "GOOGLE_PLACES_API_KEY";

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub places: PlacesConfig,

    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Identity provider (user accounts) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_identity_base_url")]
    pub base_url: String,

    /// Bearer secret; usually supplied through `CLERK_SECRET_KEY`
    #[serde(default)]
    pub secret_key: Option<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: default_identity_base_url(),
            secret_key: None,
        }
    }
}

/// Places provider (search + photos) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    #[serde(default = "default_places_base_url")]
    pub base_url: String,

    /// API key; usually supplied through `GOOGLE_PLACES_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: default_places_base_url(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Config {
    /// Overlay credentials from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Overlay credentials using the given lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(IDENTITY_SECRET_ENV).filter(|v| !v.trim().is_empty()) {
            self.identity.secret_key = Some(key);
        }
        if let Some(key) = lookup(PLACES_API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.places.api_key = Some(key);
        }

        // A blank key in the file is as good as no key
        self.identity.secret_key = self.identity.secret_key.take().filter(|v| !v.trim().is_empty());
        self.places.api_key = self.places.api_key.take().filter(|v| !v.trim().is_empty());
    }
}

// Default value functions
fn default_port() -> u16 { 5000 }
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_identity_base_url() -> String { "https://api.clerk.com/v1".to_string() }
fn default_places_base_url() -> String { "https://places.googleapis.com/v1".to_string() }
fn default_connect_timeout() -> u64 { 10 }
fn default_request_timeout() -> u64 { 30 }

/// Get default config file path
/// Uses ~/.config/admin-gateway/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("admin-gateway")
        .join("config.toml")
}

/// Load config from file, or return defaults if not found.
///
/// Loading order:
/// 1. Specified path (if provided)
/// 2. ./config.toml (if exists)
/// 3. default_config_path() (usually ~/.config/admin-gateway/config.toml)
///
/// Credentials from the environment are overlaid on whichever source wins.
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut config = load_file_config(path)?;
    config.apply_env();
    Ok(config)
}

fn load_file_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    // An explicit path must exist and parse
    if let Some(path) = path {
        anyhow::ensure!(path.is_file(), "config file {:?} does not exist", path);
        return read_config(&path);
    }

    // A broken working-directory file is skipped, not fatal
    let local = PathBuf::from("config.toml");
    if local.is_file() {
        match read_config(&local) {
            Ok(config) => return Ok(config),
            Err(e) => tracing::warn!("Ignoring {:?}: {:#}", local, e),
        }
    }

    let user = default_config_path();
    if user.is_file() {
        return read_config(&user);
    }

    tracing::info!("No gateway config file present, running on built-in defaults");
    Ok(Config::default())
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {:?}", path))?;
    let config = toml::from_str(&raw)
        .with_context(|| format!("invalid gateway config in {:?}", path))?;
    tracing::info!(path = ?path, "Gateway config loaded");
    Ok(config)
}
