// File: crates/propcoord_booking/src/handlers.rs
use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use chrono::Utc;
use chrono_tz::Tz;
use propcoord_common::error::{auth_required, CoordinatorError};
use propcoord_common::services::{BookingStatus, CalendarGateway, CalendarId};
use propcoord_config::AppConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::availability::{AvailabilityChecker, DEFAULT_TIMEOUT};
use crate::error::PropertyError;
use crate::models::{
    BookingOutcome, BookingRequest, BookingResponse, OwnerDashboard, Rejection, ServiceStatus,
    StatusChangeResponse,
};
use crate::orchestrator::BookingOrchestrator;
use crate::property::PropertyResolver;
use crate::reconciler::StatusReconciler;

pub const DEFAULT_TIME_ZONE: &str = "Europe/Zurich";

const AUTH_HINT: &str =
    "Google authentication required. Connect the calendar account at /auth/google";

// Shared state of the booking and owner routes
pub struct BookingState {
    pub gateway: Arc<dyn CalendarGateway>,
    pub orchestrator: BookingOrchestrator,
    pub reconciler: StatusReconciler,
    pub property: String,
    pub calendar_id: CalendarId,
}

impl BookingState {
    /// Wires the booking core for the configured active property.
    ///
    /// Fails when the active property has no calendar or the time zone is
    /// not a known IANA name.
    pub fn from_config(
        gateway: Arc<dyn CalendarGateway>,
        config: &AppConfig,
    ) -> Result<Self, PropertyError> {
        let resolver = PropertyResolver::new(&config.properties);
        let calendar_id = resolver.active_calendar_id()?;

        let zone_name = config
            .gcal
            .time_zone
            .as_deref()
            .unwrap_or(DEFAULT_TIME_ZONE);
        let time_zone: Tz = zone_name
            .parse()
            .map_err(|_| PropertyError::InvalidTimeZone(zone_name.to_string()))?;
        let timeout = config
            .gcal
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let checker = AvailabilityChecker::new(gateway.clone(), time_zone, timeout);
        let orchestrator = BookingOrchestrator::new(
            gateway.clone(),
            checker,
            calendar_id.clone(),
            config.booking.verify_after_write,
        );
        let reconciler = StatusReconciler::new(
            gateway.clone(),
            calendar_id.clone(),
            config.booking.listing_window_days,
            config.booking.listing_max_results,
        );

        info!(
            "serving property '{}' on calendar {} ({})",
            resolver.active_property(),
            calendar_id,
            time_zone
        );

        Ok(Self {
            gateway,
            orchestrator,
            reconciler,
            property: resolver.active_property().to_string(),
            calendar_id,
        })
    }

    async fn require_auth(&self) -> Result<(), CoordinatorError> {
        if self.gateway.is_authenticated().await {
            Ok(())
        } else {
            Err(auth_required(AUTH_HINT))
        }
    }
}

/// HTTP status for a booking outcome. Validation wins over the other reasons.
pub(crate) fn outcome_status(outcome: &BookingOutcome) -> StatusCode {
    match outcome {
        BookingOutcome::Accepted { .. } => StatusCode::CREATED,
        BookingOutcome::Rejected(reasons) => {
            if reasons.iter().any(|r| matches!(r, Rejection::Invalid(_))) {
                StatusCode::UNPROCESSABLE_ENTITY
            } else if reasons.contains(&Rejection::DatesUnavailable) {
                StatusCode::CONFLICT
            } else {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

/// Handler for the guest booking form.
#[axum::debug_handler]
pub async fn submit_booking_handler(
    State(state): State<Arc<BookingState>>,
    Form(request): Form<BookingRequest>,
) -> (StatusCode, Json<BookingResponse>) {
    let outcome = state.orchestrator.submit(request).await;
    let status = outcome_status(&outcome);
    let errors = outcome.messages();

    let body = match outcome {
        BookingOutcome::Accepted {
            event_id,
            verification,
        } => BookingResponse {
            success: true,
            event_id: Some(event_id),
            errors,
            verification: Some(verification),
        },
        BookingOutcome::Rejected(_) => BookingResponse {
            success: false,
            event_id: None,
            errors,
            verification: None,
        },
    };

    (status, Json(body))
}

/// Handler listing upcoming bookings with their derived status.
#[axum::debug_handler]
pub async fn owner_dashboard_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<OwnerDashboard>, CoordinatorError> {
    state.require_auth().await?;

    let bookings = state.reconciler.list_bookings(Utc::now()).await?;
    Ok(Json(OwnerDashboard {
        property: state.property.clone(),
        calendar_id: state.calendar_id.to_string(),
        bookings,
    }))
}

#[axum::debug_handler]
pub async fn approve_booking_handler(
    State(state): State<Arc<BookingState>>,
    Path(event_id): Path<String>,
) -> Result<Json<StatusChangeResponse>, CoordinatorError> {
    state.reconciler.approve(&event_id).await?;

    Ok(Json(StatusChangeResponse {
        success: true,
        event_id,
        status: BookingStatus::Confirmed,
        message: "Booking approved.".to_string(),
    }))
}

#[axum::debug_handler]
pub async fn reject_booking_handler(
    State(state): State<Arc<BookingState>>,
    Path(event_id): Path<String>,
) -> Result<Json<StatusChangeResponse>, CoordinatorError> {
    state.reconciler.reject(&event_id).await?;

    Ok(Json(StatusChangeResponse {
        success: true,
        event_id,
        status: BookingStatus::Declined,
        message: "Booking declined and removed from the calendar.".to_string(),
    }))
}

/// Diagnostic listing of the next raw events. Sends unauthenticated callers to the consent flow.
#[axum::debug_handler]
pub async fn list_events_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Response, CoordinatorError> {
    if !state.gateway.is_authenticated().await {
        return Ok(Redirect::to("/auth/google").into_response());
    }

    let events = state.reconciler.upcoming_events(Utc::now()).await?;
    Ok(Json(events).into_response())
}

#[axum::debug_handler]
pub async fn status_handler(State(state): State<Arc<BookingState>>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        auth_established: state.gateway.is_authenticated().await,
        property: state.property.clone(),
        calendar_id: state.calendar_id.to_string(),
    })
}
