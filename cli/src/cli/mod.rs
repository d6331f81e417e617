pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "admin-gateway")]
#[command(author, version, about = "HTTP gateway - proxies user administration and places lookups")]
pub struct Cli {
    /// Path to config file (checked in order: local config.toml, ~/.config/admin-gateway/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging for the gateway crates
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the gateway server
    Start {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show resolved configuration and whether the gateway is reachable
    Status,
}
