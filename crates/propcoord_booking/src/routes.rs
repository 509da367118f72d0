// --- File: crates/propcoord_booking/src/routes.rs ---

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::{
    approve_booking_handler, list_events_handler, owner_dashboard_handler,
    reject_booking_handler, status_handler, submit_booking_handler, BookingState,
};

/// Guest booking, owner dashboard and diagnostic routes.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/booking", post(submit_booking_handler))
        .route("/owner", get(owner_dashboard_handler))
        .route("/owner/approve/{event_id}", post(approve_booking_handler))
        .route("/owner/reject/{event_id}", post(reject_booking_handler))
        .route("/list-events", get(list_events_handler))
        .route("/status", get(status_handler))
        .with_state(state)
}
