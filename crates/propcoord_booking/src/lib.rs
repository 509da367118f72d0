// --- File: crates/propcoord_booking/src/lib.rs ---
// Declare modules within this crate
pub mod availability;
pub mod doc;
pub mod error;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod memory;
pub mod models;
pub mod orchestrator;
pub mod property;
pub mod reconciler;
#[cfg(test)]
mod reconciler_test;
pub mod routes;
pub mod status;
#[cfg(test)]
mod status_proptest;
pub mod validator;

pub use availability::AvailabilityChecker;
pub use handlers::BookingState;
pub use memory::InMemoryCalendar;
pub use models::{BookingOutcome, BookingRequest, Rejection, Verification};
pub use orchestrator::BookingOrchestrator;
pub use property::PropertyResolver;
pub use reconciler::StatusReconciler;
pub use routes::routes;
