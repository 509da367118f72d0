//! In-memory [`CalendarGateway`] for tests and local runs without Google.
//!
//! Behaves like a single-account calendar service: all-day events block
//! free/busy over their days (UTC), every call is recorded, and individual
//! operations can be made to fail or to be slow.

use chrono::{DateTime, NaiveTime, Utc};
use propcoord_common::services::{
    BoxFuture, BusyInterval, CalendarGateway, CalendarId, EventPatch, EventTime,
    GatewayError, ListOptions, NewEvent, RemoteEvent,
};
use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FreeBusy,
    List,
    Create,
    Get,
    Patch,
    Delete,
}

/// A call as observed by the in-memory calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    QueryFreeBusy {
        calendar_id: CalendarId,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    },
    ListEvents {
        calendar_id: CalendarId,
        time_min: DateTime<Utc>,
        time_max: Option<DateTime<Utc>>,
    },
    CreateEvent {
        calendar_id: CalendarId,
        event: NewEvent,
    },
    GetEvent {
        calendar_id: CalendarId,
        event_id: String,
    },
    PatchEvent {
        calendar_id: CalendarId,
        event_id: String,
        patch: EventPatch,
    },
    DeleteEvent {
        calendar_id: CalendarId,
        event_id: String,
    },
}

impl GatewayCall {
    pub fn operation(&self) -> Operation {
        match self {
            GatewayCall::QueryFreeBusy { .. } => Operation::FreeBusy,
            GatewayCall::ListEvents { .. } => Operation::List,
            GatewayCall::CreateEvent { .. } => Operation::Create,
            GatewayCall::GetEvent { .. } => Operation::Get,
            GatewayCall::PatchEvent { .. } => Operation::Patch,
            GatewayCall::DeleteEvent { .. } => Operation::Delete,
        }
    }
}

#[derive(Default)]
struct MemoryState {
    events: BTreeMap<(CalendarId, String), RemoteEvent>,
    busy: Vec<(CalendarId, BusyInterval)>,
    calls: Vec<GatewayCall>,
    failing: HashSet<Operation>,
    next_id: u64,
}

pub struct InMemoryCalendar {
    state: Mutex<MemoryState>,
    authenticated: AtomicBool,
    latency: Option<Duration>,
}

impl Default for InMemoryCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCalendar {
    /// An empty, authenticated calendar.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            authenticated: AtomicBool::new(true),
            latency: None,
        }
    }

    /// Every call sleeps for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::SeqCst);
    }

    /// Makes every later call of `operation` fail with a remote error.
    pub fn fail_on(&self, operation: Operation) {
        self.lock().failing.insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.lock().failing.remove(&operation);
    }

    /// Adds a busy interval that is not backed by a listed event.
    pub fn add_busy(&self, calendar_id: &CalendarId, interval: BusyInterval) {
        self.lock().busy.push((calendar_id.clone(), interval));
    }

    /// Stores an event as if it had been written by someone else.
    pub fn insert_event(&self, calendar_id: &CalendarId, event: RemoteEvent) {
        self.lock()
            .events
            .insert((calendar_id.clone(), event.id.clone()), event);
    }

    pub fn event(&self, calendar_id: &CalendarId, event_id: &str) -> Option<RemoteEvent> {
        self.lock()
            .events
            .get(&(calendar_id.clone(), event_id.to_string()))
            .cloned()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    pub fn calls_of(&self, operation: Operation) -> Vec<GatewayCall> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .cloned()
            .collect()
    }

    pub fn created_events(&self) -> Vec<NewEvent> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                GatewayCall::CreateEvent { event, .. } => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn patches(&self) -> Vec<EventPatch> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                GatewayCall::PatchEvent { patch, .. } => Some(patch.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    /// Records `call` and applies the authentication and failure switches.
    fn enter(&self, call: GatewayCall) -> Result<MutexGuard<'_, MemoryState>, GatewayError> {
        if !self.authenticated.load(Ordering::SeqCst) {
            return Err(GatewayError::Unauthenticated);
        }
        let operation = call.operation();
        let mut state = self.lock();
        state.calls.push(call);
        if state.failing.contains(&operation) {
            return Err(GatewayError::Remote(format!("{operation:?} failed")));
        }
        Ok(state)
    }
}

fn instant(time: EventTime) -> DateTime<Utc> {
    match time {
        EventTime::Date(day) => day.and_time(NaiveTime::MIN).and_utc(),
        EventTime::DateTime(dt) => dt,
    }
}

fn event_span(event: &RemoteEvent) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    Some((instant(event.start?), instant(event.end?)))
}

impl CalendarGateway for InMemoryCalendar {
    fn is_authenticated(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move { self.authenticated.load(Ordering::SeqCst) })
    }

    fn query_free_busy(
        &self,
        calendar_id: &CalendarId,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, GatewayError> {
        let calendar_id = calendar_id.clone();
        Box::pin(async move {
            self.delay().await;
            let state = self
                .enter(GatewayCall::QueryFreeBusy {
                    calendar_id: calendar_id.clone(),
                    time_min,
                    time_max,
                })?;

            let from_events = state
                .events
                .iter()
                .filter(|((cal, _), _)| *cal == calendar_id)
                .filter_map(|(_, event)| event_span(event))
                .map(|(start, end)| BusyInterval { start, end });
            let extra = state
                .busy
                .iter()
                .filter(|(cal, _)| *cal == calendar_id)
                .map(|(_, interval)| *interval);

            let mut busy: Vec<BusyInterval> = from_events
                .chain(extra)
                .filter(|b| b.start < time_max && b.end > time_min)
                .collect();
            busy.sort_by_key(|b| b.start);
            Ok(busy)
        })
    }

    fn list_events(
        &self,
        calendar_id: &CalendarId,
        time_min: DateTime<Utc>,
        time_max: Option<DateTime<Utc>>,
        options: ListOptions,
    ) -> BoxFuture<'_, Vec<RemoteEvent>, GatewayError> {
        let calendar_id = calendar_id.clone();
        Box::pin(async move {
            self.delay().await;
            let state = self
                .enter(GatewayCall::ListEvents {
                    calendar_id: calendar_id.clone(),
                    time_min,
                    time_max,
                })?;

            let mut events: Vec<RemoteEvent> = state
                .events
                .iter()
                .filter(|((cal, _), _)| *cal == calendar_id)
                .map(|(_, event)| event)
                .filter(|event| {
                    event_span(event)
                        .map(|(start, end)| {
                            end > time_min && time_max.map_or(true, |max| start < max)
                        })
                        .unwrap_or(false)
                })
                .cloned()
                .collect();
            if options.order_by_start_time {
                events.sort_by_key(|event| event.start.map(instant));
            }
            if let Some(max) = options.max_results {
                events.truncate(max.max(0) as usize);
            }
            Ok(events)
        })
    }

    fn create_event(
        &self,
        calendar_id: &CalendarId,
        event: NewEvent,
    ) -> BoxFuture<'_, String, GatewayError> {
        let calendar_id = calendar_id.clone();
        Box::pin(async move {
            self.delay().await;
            let mut state = self
                .enter(GatewayCall::CreateEvent {
                    calendar_id: calendar_id.clone(),
                    event: event.clone(),
                })?;

            state.next_id += 1;
            let id = format!("mem-event-{}", state.next_id);
            let stored = RemoteEvent {
                id: id.clone(),
                summary: Some(event.summary),
                description: Some(event.description),
                start: Some(EventTime::Date(event.start_date)),
                end: Some(EventTime::Date(event.end_date_padded)),
                status_tag: Some(event.status),
            };
            state.events.insert((calendar_id, id.clone()), stored);
            Ok(id)
        })
    }

    fn get_event(
        &self,
        calendar_id: &CalendarId,
        event_id: &str,
    ) -> BoxFuture<'_, RemoteEvent, GatewayError> {
        let calendar_id = calendar_id.clone();
        let event_id = event_id.to_string();
        Box::pin(async move {
            self.delay().await;
            let state = self
                .enter(GatewayCall::GetEvent {
                    calendar_id: calendar_id.clone(),
                    event_id: event_id.clone(),
                })?;

            state
                .events
                .get(&(calendar_id, event_id.clone()))
                .cloned()
                .ok_or(GatewayError::NotFound(event_id))
        })
    }

    fn patch_event(
        &self,
        calendar_id: &CalendarId,
        event_id: &str,
        patch: EventPatch,
    ) -> BoxFuture<'_, (), GatewayError> {
        let calendar_id = calendar_id.clone();
        let event_id = event_id.to_string();
        Box::pin(async move {
            self.delay().await;
            let mut state = self
                .enter(GatewayCall::PatchEvent {
                    calendar_id: calendar_id.clone(),
                    event_id: event_id.clone(),
                    patch: patch.clone(),
                })?;

            let event = state
                .events
                .get_mut(&(calendar_id, event_id.clone()))
                .ok_or(GatewayError::NotFound(event_id))?;
            if let Some(summary) = patch.summary {
                event.summary = Some(summary);
            }
            if let Some(description) = patch.description {
                event.description = Some(description);
            }
            if let Some(status) = patch.status {
                event.status_tag = Some(status);
            }
            Ok(())
        })
    }

    fn delete_event(
        &self,
        calendar_id: &CalendarId,
        event_id: &str,
    ) -> BoxFuture<'_, (), GatewayError> {
        let calendar_id = calendar_id.clone();
        let event_id = event_id.to_string();
        Box::pin(async move {
            self.delay().await;
            let mut state = self
                .enter(GatewayCall::DeleteEvent {
                    calendar_id: calendar_id.clone(),
                    event_id: event_id.clone(),
                })?;

            state
                .events
                .remove(&(calendar_id, event_id.clone()))
                .map(|_| ())
                .ok_or(GatewayError::NotFound(event_id))
        })
    }
}
