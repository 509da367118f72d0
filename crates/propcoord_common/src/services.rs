//! Calendar gateway abstraction.
//!
//! The remote calendar is the only system of record for bookings. Everything
//! the booking core needs from it goes through [`CalendarGateway`], so the
//! decision logic can run against Google Calendar in production and against an
//! in-memory calendar in tests.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use thiserror::Error;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Private extended property holding the structured booking status.
pub const STATUS_PROPERTY: &str = "bookingStatus";

/// Errors every gateway call may report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("no valid calendar credential")]
    Unauthenticated,
    #[error("event not found: {0}")]
    NotFound(String),
    #[error("remote calendar error: {0}")]
    Remote(String),
}

/// Opaque key of a remote calendar.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarId(String);

impl CalendarId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A busy period reported by a free/busy query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Start or end of a remote event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventTime {
    /// All-day event boundary. For an end, the day is exclusive.
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl EventTime {
    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::Date(d) => *d,
            EventTime::DateTime(dt) => dt.date_naive(),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

/// Lifecycle of a booking as recorded on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Declined,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "declined" | "cancelled" => Ok(BookingStatus::Declined),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// An event as read back from the remote calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    /// Structured status from the event's private extended properties.
    pub status_tag: Option<BookingStatus>,
}

/// Fields of an all-day event to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub summary: String,
    pub description: String,
    pub start_date: NaiveDate,
    /// Exclusive end: the last booked day plus one.
    pub end_date_padded: NaiveDate,
    pub status: BookingStatus,
}

/// Fields to overwrite on an existing event. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub status: Option<BookingStatus>,
}

/// Options for [`CalendarGateway::list_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Expand recurring events into instances.
    pub single_events: bool,
    pub order_by_start_time: bool,
    pub max_results: Option<i32>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            single_events: true,
            order_by_start_time: true,
            max_results: None,
        }
    }
}

/// Operations the booking core performs against the remote calendar.
pub trait CalendarGateway: Send + Sync {
    /// Whether a credential for the remote calendar is currently held.
    fn is_authenticated(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;

    /// Busy intervals of `calendar_id` within `[time_min, time_max)`.
    fn query_free_busy(
        &self,
        calendar_id: &CalendarId,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, GatewayError>;

    /// Events overlapping `[time_min, time_max)`. Without `time_max` the
    /// range is open ended.
    fn list_events(
        &self,
        calendar_id: &CalendarId,
        time_min: DateTime<Utc>,
        time_max: Option<DateTime<Utc>>,
        options: ListOptions,
    ) -> BoxFuture<'_, Vec<RemoteEvent>, GatewayError>;

    /// Creates an all-day event and returns its id.
    fn create_event(
        &self,
        calendar_id: &CalendarId,
        event: NewEvent,
    ) -> BoxFuture<'_, String, GatewayError>;

    fn get_event(
        &self,
        calendar_id: &CalendarId,
        event_id: &str,
    ) -> BoxFuture<'_, RemoteEvent, GatewayError>;

    fn patch_event(
        &self,
        calendar_id: &CalendarId,
        event_id: &str,
        patch: EventPatch,
    ) -> BoxFuture<'_, (), GatewayError>;

    fn delete_event(
        &self,
        calendar_id: &CalendarId,
        event_id: &str,
    ) -> BoxFuture<'_, (), GatewayError>;
}
