// --- File: crates/propcoord_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // HTTP response mapping
pub mod logging; // Logging utilities
pub mod services; // Calendar gateway abstraction

pub use error::{
    auth_required, config_error, conflict, external_service_error, internal_error, not_found,
    validation_error, CoordinatorError, HttpStatusCode,
};

pub use logging::{init, init_with_level};

pub use services::{
    BookingStatus, BusyInterval, CalendarGateway, CalendarId, EventPatch, EventTime, GatewayError,
    ListOptions, NewEvent, RemoteEvent,
};
