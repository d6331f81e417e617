//! Admin Gateway Core Library
//! Configuration, upstream clients and HTTP handlers for the identity/places gateway

pub mod config;
pub mod proxy;
