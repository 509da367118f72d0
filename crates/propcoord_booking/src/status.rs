//! Booking status as encoded on calendar events.
//!
//! New events carry the status twice: as a structured tag in the private
//! extended properties and as a summary prefix. The tag wins when present;
//! the prefix is the fallback for events written by hand or by older
//! deployments.

use propcoord_common::services::{BookingStatus, RemoteEvent};

pub const PENDING_PREFIX: &str = "PENDING ";
pub const CONFIRMED_PREFIX: &str = "CONFIRMED ";
pub const DECLINED_PREFIX: &str = "DECLINED ";

/// Summary of a freshly submitted booking.
pub fn booking_title(name: &str) -> String {
    format!("{PENDING_PREFIX}Booking: {}", name.trim())
}

pub fn booking_description(name: &str, email: &str) -> String {
    format!("Booking for {} ({})", name.trim(), email.trim())
}

/// Status from a summary prefix alone.
///
/// Summaries without a recognized prefix count as confirmed, which also
/// covers calendar entries that were never bookings.
pub fn status_from_summary(summary: Option<&str>) -> BookingStatus {
    match summary {
        Some(s) if s.starts_with("PENDING") => BookingStatus::Pending,
        Some(s) if s.starts_with("DECLINED") || s.starts_with("CANCELLED") => {
            BookingStatus::Declined
        }
        Some(s) if s.starts_with("CONFIRMED") => BookingStatus::Confirmed,
        _ => BookingStatus::Confirmed,
    }
}

pub fn derive_status(event: &RemoteEvent) -> BookingStatus {
    event
        .status_tag
        .unwrap_or_else(|| status_from_summary(event.summary.as_deref()))
}

/// Replaces a literal leading `"PENDING "` with `replacement`.
///
/// Any other summary is returned unchanged, so repeated transitions never
/// stack prefixes.
pub fn replace_pending_prefix(summary: &str, replacement: &str) -> String {
    match summary.strip_prefix(PENDING_PREFIX) {
        Some(rest) => format!("{replacement}{rest}"),
        None => summary.to_string(),
    }
}
