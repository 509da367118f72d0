// --- File: crates/services/propcoord_backend/src/lib.rs ---
pub mod app;
pub mod gateway_factory;

pub use app::build_router;
pub use gateway_factory::{build_services, Services, StartupError};
