// --- File: crates/propcoord_booking/src/availability.rs ---
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use propcoord_common::services::{CalendarGateway, CalendarId};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Decides whether a range of days is free on a calendar.
///
/// # Fail-closed
///
/// [`AvailabilityChecker::is_free`] answers `true` only when the remote
/// calendar positively reported an empty busy set for the range. A missing
/// credential, a gateway error and a call exceeding the timeout all answer
/// `false`: an unreachable calendar blocks the booking rather than risking a
/// double booking.
#[derive(Clone)]
pub struct AvailabilityChecker {
    gateway: Arc<dyn CalendarGateway>,
    time_zone: Tz,
    timeout: Duration,
}

impl AvailabilityChecker {
    pub fn new(gateway: Arc<dyn CalendarGateway>, time_zone: Tz, timeout: Duration) -> Self {
        Self {
            gateway,
            time_zone,
            timeout,
        }
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Query window for the days `[start, end)`.
    ///
    /// A single-day range (`start == end`) is widened to that whole day.
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let end = if end <= start {
            start.succ_opt().unwrap_or(start)
        } else {
            end
        };
        (
            day_start_utc(&self.time_zone, start),
            day_start_utc(&self.time_zone, end),
        )
    }

    /// Whether `[start, end)` has no busy interval on `calendar_id`. Never errors.
    pub async fn is_free(&self, calendar_id: &CalendarId, start: NaiveDate, end: NaiveDate) -> bool {
        if !self.gateway.is_authenticated().await {
            warn!("calendar not authenticated, treating {start}..{end} as busy");
            return false;
        }

        let (time_min, time_max) = self.window(start, end);
        let query = self.gateway.query_free_busy(calendar_id, time_min, time_max);

        match tokio::time::timeout(self.timeout, query).await {
            Ok(Ok(busy)) => {
                debug!(
                    "free/busy for {} in {} - {}: {} busy interval(s)",
                    calendar_id,
                    time_min,
                    time_max,
                    busy.len()
                );
                busy.is_empty()
            }
            Ok(Err(err)) => {
                warn!("free/busy query failed, treating range as busy: {}", err);
                false
            }
            Err(_) => {
                warn!(
                    "free/busy query exceeded {:?}, treating range as busy",
                    self.timeout
                );
                false
            }
        }
    }
}

/// Midnight of `day` in `tz`, as a UTC instant.
pub fn day_start_utc(tz: &Tz, day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}
