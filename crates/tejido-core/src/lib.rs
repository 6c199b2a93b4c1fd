pub mod collab;
pub mod errors;
pub mod ports;
pub mod services;

pub use errors::CollabError;
