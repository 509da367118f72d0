// --- File: crates/propcoord_gcal/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
#[cfg(test)]
mod auth_test;
pub mod doc;
pub mod handlers;
pub mod routes;
pub mod service;

pub use auth::{CredentialStore, OAuthTokens};
pub use routes::routes;
pub use service::GoogleCalendarGateway;
