// --- File: crates/propcoord_booking/src/reconciler.rs ---
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use propcoord_common::services::{
    BookingStatus, CalendarGateway, CalendarId, EventPatch, GatewayError, ListOptions, RemoteEvent,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ReconcileError;
use crate::models::BookingSummary;
use crate::status::{derive_status, replace_pending_prefix, CONFIRMED_PREFIX, DECLINED_PREFIX};

/// Number of events shown by the diagnostic upcoming list.
pub const UPCOMING_LIMIT: i32 = 10;

/// Owner-side status transitions and the booking listing.
pub struct StatusReconciler {
    gateway: Arc<dyn CalendarGateway>,
    calendar_id: CalendarId,
    listing_window: Duration,
    listing_max_results: i32,
}

impl StatusReconciler {
    pub fn new(
        gateway: Arc<dyn CalendarGateway>,
        calendar_id: CalendarId,
        listing_window_days: i64,
        listing_max_results: i32,
    ) -> Self {
        Self {
            gateway,
            calendar_id,
            listing_window: Duration::days(listing_window_days.max(1)),
            listing_max_results,
        }
    }

    pub async fn approve(&self, event_id: &str) -> Result<(), ReconcileError> {
        self.approve_at(event_id, Utc::now()).await
    }

    /// Rewrites `PENDING ` to `CONFIRMED ` and stamps the description.
    ///
    /// Approving an already confirmed booking keeps its summary but appends
    /// another approval note. A declined booking cannot be approved.
    pub async fn approve_at(&self, event_id: &str, now: DateTime<Utc>) -> Result<(), ReconcileError> {
        let event = self.fetch(event_id).await?;
        if derive_status(&event) == BookingStatus::Declined {
            warn!("refusing to approve declined booking {}", event_id);
            return Err(ReconcileError::AlreadyDeclined(event_id.to_string()));
        }
        let patch = transition_patch(&event, Transition::Approve, now);

        self.gateway
            .patch_event(&self.calendar_id, event_id, patch)
            .await
            .map_err(|err| ReconcileError::on_write(event_id, err))?;

        info!("booking {} approved", event_id);
        Ok(())
    }

    pub async fn reject(&self, event_id: &str) -> Result<(), ReconcileError> {
        self.reject_at(event_id, Utc::now()).await
    }

    /// Marks the booking declined, then removes it from the calendar.
    ///
    /// The patch happens first so the declined state is visible in the
    /// calendar's trash. A failed delete leaves the event present and
    /// declined; it is reported, not retried.
    pub async fn reject_at(&self, event_id: &str, now: DateTime<Utc>) -> Result<(), ReconcileError> {
        let event = self.fetch(event_id).await?;
        let patch = transition_patch(&event, Transition::Decline, now);

        self.gateway
            .patch_event(&self.calendar_id, event_id, patch)
            .await
            .map_err(|err| ReconcileError::on_write(event_id, err))?;

        if let Err(err) = self.gateway.delete_event(&self.calendar_id, event_id).await {
            warn!("booking {} declined but delete failed: {}", event_id, err);
            return Err(match err {
                GatewayError::Unauthenticated => ReconcileError::Unauthenticated,
                other => ReconcileError::DeclinedNotRemoved {
                    event_id: event_id.to_string(),
                    reason: other.to_string(),
                },
            });
        }

        info!("booking {} declined and removed", event_id);
        Ok(())
    }

    /// Bookings starting within the listing window from `now`.
    pub async fn list_bookings(&self, now: DateTime<Utc>) -> Result<Vec<BookingSummary>, GatewayError> {
        let options = ListOptions {
            max_results: Some(self.listing_max_results),
            ..ListOptions::default()
        };
        let events = self
            .gateway
            .list_events(&self.calendar_id, now, Some(now + self.listing_window), options)
            .await?;

        Ok(events.iter().map(to_summary).collect())
    }

    /// The next few raw events from `now`, however far ahead, for diagnostics.
    pub async fn upcoming_events(&self, now: DateTime<Utc>) -> Result<Vec<RemoteEvent>, GatewayError> {
        let options = ListOptions {
            max_results: Some(UPCOMING_LIMIT),
            ..ListOptions::default()
        };
        self.gateway
            .list_events(&self.calendar_id, now, None, options)
            .await
    }

    async fn fetch(&self, event_id: &str) -> Result<RemoteEvent, ReconcileError> {
        self.gateway
            .get_event(&self.calendar_id, event_id)
            .await
            .map_err(|err| ReconcileError::on_read(event_id, err))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Approve,
    Decline,
}

impl Transition {
    fn target(self) -> BookingStatus {
        match self {
            Transition::Approve => BookingStatus::Confirmed,
            Transition::Decline => BookingStatus::Declined,
        }
    }
}

fn transition_patch(event: &RemoteEvent, transition: Transition, now: DateTime<Utc>) -> EventPatch {
    let (prefix, verb) = match transition {
        Transition::Approve => (CONFIRMED_PREFIX, "Approved"),
        Transition::Decline => (DECLINED_PREFIX, "Declined"),
    };
    let note = format!(
        "\n{verb} on {}",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    );

    EventPatch {
        // Untitled events stay untitled
        summary: event
            .summary
            .as_deref()
            .map(|summary| replace_pending_prefix(summary, prefix)),
        description: Some(format!(
            "{}{note}",
            event.description.as_deref().unwrap_or_default()
        )),
        status: Some(transition.target()),
    }
}

fn to_summary(event: &RemoteEvent) -> BookingSummary {
    BookingSummary {
        event_id: event.id.clone(),
        summary: event
            .summary
            .clone()
            .unwrap_or_else(|| "No title".to_string()),
        guest: event.description.clone().unwrap_or_default(),
        start: event.start.map(|t| t.to_string()),
        end: event.end.map(|t| t.to_string()),
        status: derive_status(event),
    }
}
