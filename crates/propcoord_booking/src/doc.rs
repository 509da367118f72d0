// File: crates/propcoord_booking/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::models::{
    BookingRequest, BookingResponse, BookingSummary, OwnerDashboard, ServiceStatus,
    StatusChangeResponse, Verification,
};

#[utoipa::path(
    post,
    path = "/booking",
    request_body(content = BookingRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Booking accepted as pending", body = BookingResponse,
         example = json!({
             "success": true,
             "event_id": "abc123xyz456",
             "errors": [],
             "verification": { "result": "found" }
         })
        ),
        (status = 422, description = "Invalid request", body = BookingResponse,
         example = json!({
             "success": false,
             "event_id": null,
             "errors": ["email is required", "start date must not be after end date"],
             "verification": null
         })
        ),
        (status = 409, description = "Dates already booked", body = BookingResponse),
        (status = 502, description = "Calendar write failed", body = BookingResponse)
    ),
    tag = "Booking"
)]
fn doc_submit_booking_handler() {}

#[utoipa::path(
    get,
    path = "/owner",
    responses(
        (status = 200, description = "Upcoming bookings", body = OwnerDashboard),
        (status = 401, description = "Calendar account not connected")
    ),
    tag = "Owner"
)]
fn doc_owner_dashboard_handler() {}

#[utoipa::path(
    post,
    path = "/owner/approve/{event_id}",
    params(
        ("event_id" = String, Path, description = "Calendar event of the booking")
    ),
    responses(
        (status = 200, description = "Booking confirmed", body = StatusChangeResponse,
         example = json!({
             "success": true,
             "event_id": "abc123xyz456",
             "status": "confirmed",
             "message": "Booking approved."
         })
        ),
        (status = 401, description = "Calendar account not connected"),
        (status = 404, description = "Booking no longer exists"),
        (status = 409, description = "Booking was already declined"),
        (status = 502, description = "Calendar update failed")
    ),
    tag = "Owner"
)]
fn doc_approve_booking_handler() {}

#[utoipa::path(
    post,
    path = "/owner/reject/{event_id}",
    params(
        ("event_id" = String, Path, description = "Calendar event of the booking")
    ),
    responses(
        (status = 200, description = "Booking declined and removed", body = StatusChangeResponse),
        (status = 401, description = "Calendar account not connected"),
        (status = 404, description = "Booking no longer exists"),
        (status = 502, description = "Update or removal failed")
    ),
    tag = "Owner"
)]
fn doc_reject_booking_handler() {}

#[utoipa::path(
    get,
    path = "/list-events",
    responses(
        (status = 200, description = "Next events on the calendar, unprocessed"),
        (status = 303, description = "Redirect to /auth/google when not connected")
    ),
    tag = "Diagnostics"
)]
fn doc_list_events_handler() {}

#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Authentication and property status", body = ServiceStatus)
    ),
    tag = "Diagnostics"
)]
fn doc_status_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_submit_booking_handler,
        doc_owner_dashboard_handler,
        doc_approve_booking_handler,
        doc_reject_booking_handler,
        doc_list_events_handler,
        doc_status_handler
    ),
    components(
        schemas(
            BookingRequest,
            BookingResponse,
            BookingSummary,
            OwnerDashboard,
            StatusChangeResponse,
            ServiceStatus,
            Verification
        )
    ),
    tags(
        (name = "booking", description = "Property booking and owner approval API")
    )
)]
pub struct BookingApiDoc;
