// --- File: crates/propcoord_booking/src/models.rs ---
use chrono::NaiveDate;
use propcoord_common::services::BookingStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validator::ValidationError;

/// Booking form as submitted by a guest.
#[derive(Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Arrival day, YYYY-MM-DD
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "2024-06-01"))]
    pub start_date: String,
    /// Last booked day (inclusive), YYYY-MM-DD
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "2024-06-03"))]
    pub end_date: String,
}

/// Validated, inclusive stay range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StayDates {
    /// Exclusive end for all-day calendar events.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.end.succ_opt().unwrap_or(self.end)
    }
}

/// Why a submission was turned down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Invalid(ValidationError),
    DatesUnavailable,
    /// Availability passed but the event write failed. The slot may no longer be free.
    CreateFailed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Invalid(err) => write!(f, "{err}"),
            Rejection::DatesUnavailable => f.write_str("dates already booked"),
            Rejection::CreateFailed => f.write_str("failed to create calendar event"),
        }
    }
}

/// Diagnostic result of re-reading the calendar after a booking was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "result", content = "detail", rename_all = "snake_case")]
pub enum Verification {
    Found,
    Missing,
    Failed(String),
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    Accepted {
        event_id: String,
        verification: Verification,
    },
    Rejected(Vec<Rejection>),
}

impl BookingOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, BookingOutcome::Accepted { .. })
    }

    /// Human-facing messages of a rejection, empty when accepted.
    pub fn messages(&self) -> Vec<String> {
        match self {
            BookingOutcome::Accepted { .. } => Vec::new(),
            BookingOutcome::Rejected(reasons) => reasons.iter().map(ToString::to_string).collect(),
        }
    }
}

/// One row of the owner dashboard.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingSummary {
    pub event_id: String,
    pub summary: String,
    pub guest: String,
    pub start: Option<String>,
    pub end: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "pending"))]
    pub status: BookingStatus,
}

// --- HTTP payloads ---

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    pub event_id: Option<String>,
    pub errors: Vec<String>,
    pub verification: Option<Verification>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OwnerDashboard {
    pub property: String,
    pub calendar_id: String,
    pub bookings: Vec<BookingSummary>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusChangeResponse {
    pub success: bool,
    pub event_id: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "confirmed"))]
    pub status: BookingStatus,
    pub message: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ServiceStatus {
    pub auth_established: bool,
    pub property: String,
    pub calendar_id: String,
}
