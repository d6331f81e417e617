//! Proxy module - HTTP gateway in front of the identity and places providers

pub mod activity;
pub mod error;
pub mod handlers;
pub mod server;
pub mod upstream;

pub use error::GatewayError;
pub use server::{router, AppState, GatewayServer};
