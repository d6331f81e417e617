// Handlers module
pub mod users;
pub mod places;
