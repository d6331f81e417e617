//! Outbound clients for the identity and places providers

pub mod client;
pub mod identity;
pub mod places;

pub use identity::IdentityClient;
pub use places::PlacesClient;
