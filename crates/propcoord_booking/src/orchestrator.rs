// --- File: crates/propcoord_booking/src/orchestrator.rs ---
use propcoord_common::services::{
    BookingStatus, CalendarGateway, CalendarId, ListOptions, NewEvent, RemoteEvent,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::availability::{day_start_utc, AvailabilityChecker};
use crate::models::{BookingOutcome, BookingRequest, Rejection, StayDates, Verification};
use crate::status::{booking_description, booking_title};
use crate::validator::validate;

/// Turns booking requests into pending calendar events.
///
/// The remote calendar is the only store; nothing is kept in memory between
/// submissions. Two submissions for overlapping ranges that run concurrently
/// can both pass the availability check before either writes.
pub struct BookingOrchestrator {
    gateway: Arc<dyn CalendarGateway>,
    checker: AvailabilityChecker,
    calendar_id: CalendarId,
    verify_after_write: bool,
}

impl BookingOrchestrator {
    pub fn new(
        gateway: Arc<dyn CalendarGateway>,
        checker: AvailabilityChecker,
        calendar_id: CalendarId,
        verify_after_write: bool,
    ) -> Self {
        Self {
            gateway,
            checker,
            calendar_id,
            verify_after_write,
        }
    }

    pub fn calendar_id(&self) -> &CalendarId {
        &self.calendar_id
    }

    pub async fn submit(&self, request: BookingRequest) -> BookingOutcome {
        let dates = match validate(&request) {
            Ok(dates) => dates,
            Err(errors) => {
                info!("booking request rejected by validation: {:?}", errors);
                return BookingOutcome::Rejected(errors.into_iter().map(Rejection::Invalid).collect());
            }
        };

        if !self
            .checker
            .is_free(&self.calendar_id, dates.start, dates.end)
            .await
        {
            info!("dates {} - {} not available", dates.start, dates.end);
            return BookingOutcome::Rejected(vec![Rejection::DatesUnavailable]);
        }

        let new_event = NewEvent {
            summary: booking_title(&request.name),
            description: booking_description(&request.name, &request.email),
            start_date: dates.start,
            end_date_padded: dates.end_exclusive(),
            status: BookingStatus::Pending,
        };

        let event_id = match self.gateway.create_event(&self.calendar_id, new_event).await {
            Ok(id) => id,
            Err(err) => {
                error!("failed to create calendar event: {}", err);
                return BookingOutcome::Rejected(vec![Rejection::CreateFailed]);
            }
        };
        info!("created pending booking {} for {} - {}", event_id, dates.start, dates.end);

        let verification = if self.verify_after_write {
            self.verify(dates).await
        } else {
            Verification::Skipped
        };

        BookingOutcome::Accepted {
            event_id,
            verification,
        }
    }

    /// Re-lists the calendar and reports whether an event now covers the stay.
    async fn verify(&self, dates: StayDates) -> Verification {
        let tz = self.checker.time_zone();
        let time_min = day_start_utc(&tz, dates.start);
        let time_max = day_start_utc(&tz, dates.end_exclusive());

        match self
            .gateway
            .list_events(&self.calendar_id, time_min, Some(time_max), ListOptions::default())
            .await
        {
            Ok(events) if events.iter().any(|event| overlaps(event, dates)) => Verification::Found,
            Ok(_) => {
                warn!(
                    "booking for {} - {} not visible on calendar after write",
                    dates.start, dates.end
                );
                Verification::Missing
            }
            Err(err) => {
                warn!("post-write verification failed: {}", err);
                Verification::Failed(err.to_string())
            }
        }
    }
}

/// Day-level overlap between an event and the inclusive stay.
fn overlaps(event: &RemoteEvent, dates: StayDates) -> bool {
    match (event.start, event.end) {
        (Some(start), Some(end)) => start.date() <= dates.end && end.date() >= dates.start,
        _ => false,
    }
}
