// --- File: crates/propcoord_gcal/src/service.rs ---
//! Google Calendar implementation of [`CalendarGateway`].

use chrono::{DateTime, Utc};
use google_calendar3::api::{
    Event, EventDateTime, EventExtendedProperties, FreeBusyRequest, FreeBusyRequestItem,
};
use propcoord_common::services::{
    BookingStatus, BoxFuture, BusyInterval, CalendarGateway, CalendarId, EventPatch, EventTime,
    GatewayError, ListOptions, NewEvent, RemoteEvent, STATUS_PROPERTY,
};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::auth::{create_calendar_hub, AuthError, CredentialStore, HubType};

/// Google Calendar gateway.
pub struct GoogleCalendarGateway {
    calendar_hub: Arc<HubType>,
    credentials: Arc<CredentialStore>,
}

impl GoogleCalendarGateway {
    pub fn new(calendar_hub: Arc<HubType>, credentials: Arc<CredentialStore>) -> Self {
        Self {
            calendar_hub,
            credentials,
        }
    }

    /// Builds the hub once on top of `credentials`.
    pub async fn connect(credentials: Arc<CredentialStore>) -> Result<Self, AuthError> {
        let hub = create_calendar_hub(credentials.clone()).await?;
        Ok(Self::new(Arc::new(hub), credentials))
    }
}

/// Classifies an API failure from its rendered message.
///
/// `subject` names the event or calendar the call was about.
pub(crate) fn classify_api_error(message: &str, subject: &str) -> GatewayError {
    if message.contains("404") || message.contains("410") {
        GatewayError::NotFound(subject.to_string())
    } else if message.contains("401") {
        GatewayError::Unauthenticated
    } else {
        GatewayError::Remote(message.to_string())
    }
}

fn map_api_error(err: google_calendar3::Error, subject: &str) -> GatewayError {
    if let google_calendar3::Error::MissingToken(reason) = &err {
        debug!("no token for calendar call: {}", reason);
        return GatewayError::Unauthenticated;
    }
    let mapped = classify_api_error(&err.to_string(), subject);
    if let GatewayError::Remote(message) = &mapped {
        error!("Google Calendar call for {} failed: {}", subject, message);
    }
    mapped
}

pub(crate) fn event_time(value: &EventDateTime) -> Option<EventTime> {
    match (value.date_time, value.date) {
        (Some(dt), _) => Some(EventTime::DateTime(dt)),
        (None, Some(day)) => Some(EventTime::Date(day)),
        (None, None) => None,
    }
}

fn status_properties(status: BookingStatus) -> EventExtendedProperties {
    EventExtendedProperties {
        private: Some(HashMap::from([(
            STATUS_PROPERTY.to_string(),
            status.as_str().to_string(),
        )])),
        ..Default::default()
    }
}

/// Reads an API event. Events without an id are dropped.
pub(crate) fn to_remote_event(event: Event) -> Option<RemoteEvent> {
    let status_tag = event
        .extended_properties
        .as_ref()
        .and_then(|props| props.private.as_ref())
        .and_then(|private| private.get(STATUS_PROPERTY))
        .and_then(|raw| match raw.parse::<BookingStatus>() {
            Ok(status) => Some(status),
            Err(err) => {
                warn!("ignoring booking status tag: {}", err);
                None
            }
        });

    Some(RemoteEvent {
        id: event.id?,
        summary: event.summary,
        description: event.description,
        start: event.start.as_ref().and_then(event_time),
        end: event.end.as_ref().and_then(event_time),
        status_tag,
    })
}

pub(crate) fn to_google_event(event: &NewEvent) -> Event {
    Event {
        summary: Some(event.summary.clone()),
        description: Some(event.description.clone()),
        start: Some(EventDateTime {
            date: Some(event.start_date),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date: Some(event.end_date_padded),
            ..Default::default()
        }),
        extended_properties: Some(status_properties(event.status)),
        ..Default::default()
    }
}

pub(crate) fn to_google_patch(patch: &EventPatch) -> Event {
    Event {
        summary: patch.summary.clone(),
        description: patch.description.clone(),
        extended_properties: patch.status.map(status_properties),
        ..Default::default()
    }
}

impl CalendarGateway for GoogleCalendarGateway {
    fn is_authenticated(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move { self.credentials.is_authenticated().await })
    }

    fn query_free_busy(
        &self,
        calendar_id: &CalendarId,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, GatewayError> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let req = FreeBusyRequest {
                time_min: Some(time_min),
                time_max: Some(time_max),
                time_zone: Some("UTC".to_string()),
                items: Some(vec![FreeBusyRequestItem {
                    id: Some(calendar_id.clone()),
                    ..Default::default()
                }]),
                ..Default::default()
            };

            let (_response, freebusy_response) = calendar_hub
                .freebusy()
                .query(req)
                .doit()
                .await
                .map_err(|e| map_api_error(e, &calendar_id))?;

            // A calendar missing from the answer is not proof of an empty one
            let cal_info = freebusy_response
                .calendars
                .and_then(|mut calendars| calendars.remove(&calendar_id))
                .ok_or_else(|| {
                    GatewayError::Remote(format!("no free/busy data for {calendar_id}"))
                })?;

            if let Some(errors) = cal_info.errors.filter(|e| !e.is_empty()) {
                let reasons: Vec<String> = errors
                    .iter()
                    .map(|e| e.reason.clone().unwrap_or_else(|| "unknown".to_string()))
                    .collect();
                return Err(GatewayError::Remote(format!(
                    "free/busy errors for {calendar_id}: {}",
                    reasons.join(", ")
                )));
            }

            let mut busy_periods = Vec::new();
            for period in cal_info.busy.unwrap_or_default() {
                match (period.start, period.end) {
                    (Some(start), Some(end)) => busy_periods.push(BusyInterval { start, end }),
                    _ => warn!("Skipping busy period with missing start/end: {:?}", period),
                }
            }
            busy_periods.sort_by_key(|b| b.start);
            Ok(busy_periods)
        })
    }

    fn list_events(
        &self,
        calendar_id: &CalendarId,
        time_min: DateTime<Utc>,
        time_max: Option<DateTime<Utc>>,
        options: ListOptions,
    ) -> BoxFuture<'_, Vec<RemoteEvent>, GatewayError> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let mut request = calendar_hub
                .events()
                .list(&calendar_id)
                .time_min(time_min)
                .single_events(options.single_events);
            if let Some(time_max) = time_max {
                request = request.time_max(time_max);
            }
            if options.order_by_start_time {
                request = request.order_by("startTime");
            }
            if let Some(max) = options.max_results {
                request = request.max_results(max);
            }

            let (_, events_list) = request
                .doit()
                .await
                .map_err(|e| map_api_error(e, &calendar_id))?;

            Ok(events_list
                .items
                .unwrap_or_default()
                .into_iter()
                .filter_map(to_remote_event)
                .collect())
        })
    }

    fn create_event(
        &self,
        calendar_id: &CalendarId,
        event: NewEvent,
    ) -> BoxFuture<'_, String, GatewayError> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let (_response, created) = calendar_hub
                .events()
                .insert(to_google_event(&event), &calendar_id)
                .doit()
                .await
                .map_err(|e| map_api_error(e, &calendar_id))?;

            created
                .id
                .ok_or_else(|| GatewayError::Remote("created event has no id".to_string()))
        })
    }

    fn get_event(
        &self,
        calendar_id: &CalendarId,
        event_id: &str,
    ) -> BoxFuture<'_, RemoteEvent, GatewayError> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let (_response, event) = calendar_hub
                .events()
                .get(&calendar_id, &event_id)
                .doit()
                .await
                .map_err(|e| map_api_error(e, &event_id))?;

            // Deleted events can still be fetched by id
            if event.status.as_deref() == Some("cancelled") {
                return Err(GatewayError::NotFound(event_id));
            }
            to_remote_event(event).ok_or(GatewayError::NotFound(event_id))
        })
    }

    fn patch_event(
        &self,
        calendar_id: &CalendarId,
        event_id: &str,
        patch: EventPatch,
    ) -> BoxFuture<'_, (), GatewayError> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            calendar_hub
                .events()
                .patch(to_google_patch(&patch), &calendar_id, &event_id)
                .doit()
                .await
                .map_err(|e| map_api_error(e, &event_id))?;
            Ok(())
        })
    }

    fn delete_event(
        &self,
        calendar_id: &CalendarId,
        event_id: &str,
    ) -> BoxFuture<'_, (), GatewayError> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            calendar_hub
                .events()
                .delete(&calendar_id, &event_id)
                .doit()
                .await
                .map_err(|e| map_api_error(e, &event_id))?;
            Ok(())
        })
    }
}
