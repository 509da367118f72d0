#[cfg(test)]
mod tests {
    use crate::error::ReconcileError;
    use crate::memory::{InMemoryCalendar, Operation};
    use crate::reconciler::StatusReconciler;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use propcoord_common::services::{BookingStatus, CalendarId, EventTime, RemoteEvent};
    use std::sync::Arc;

    fn calendar() -> CalendarId {
        CalendarId::new("cabin@group.calendar.google.com")
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 10, 0, 0).unwrap()
    }

    fn event(id: &str, summary: Option<&str>, start_day: u32) -> RemoteEvent {
        RemoteEvent {
            id: id.to_string(),
            summary: summary.map(str::to_string),
            description: Some("Booking for Alice (a@x.com)".to_string()),
            start: Some(EventTime::Date(NaiveDate::from_ymd_opt(2024, 6, start_day).unwrap())),
            end: Some(EventTime::Date(
                NaiveDate::from_ymd_opt(2024, 6, start_day + 2).unwrap(),
            )),
            status_tag: None,
        }
    }

    fn setup() -> (Arc<InMemoryCalendar>, StatusReconciler) {
        let gateway = Arc::new(InMemoryCalendar::new());
        gateway.insert_event(&calendar(), event("e1", Some("PENDING Booking: Alice"), 1));
        let reconciler = StatusReconciler::new(gateway.clone(), calendar(), 90, 50);
        (gateway, reconciler)
    }

    #[tokio::test]
    async fn test_approve_rewrites_prefix_and_stamps_description() {
        let (gateway, reconciler) = setup();

        reconciler.approve_at("e1", now()).await.unwrap();

        let stored = gateway.event(&calendar(), "e1").unwrap();
        assert_eq!(stored.summary.as_deref(), Some("CONFIRMED Booking: Alice"));
        assert_eq!(
            stored.description.as_deref(),
            Some("Booking for Alice (a@x.com)\nApproved on 2024-05-20T10:00:00.000Z")
        );
        assert_eq!(stored.status_tag, Some(BookingStatus::Confirmed));
    }

    #[tokio::test]
    async fn test_approving_twice_appends_a_second_note() {
        let (gateway, reconciler) = setup();

        reconciler.approve_at("e1", now()).await.unwrap();
        reconciler
            .approve_at("e1", now() + Duration::hours(1))
            .await
            .unwrap();

        let stored = gateway.event(&calendar(), "e1").unwrap();
        assert_eq!(stored.summary.as_deref(), Some("CONFIRMED Booking: Alice"));
        assert_eq!(
            stored.description.unwrap().matches("Approved on").count(),
            2
        );
    }

    #[tokio::test]
    async fn test_reject_patches_then_removes() {
        let (gateway, reconciler) = setup();

        reconciler.reject_at("e1", now()).await.unwrap();

        let patches = gateway.patches();
        let last = patches.last().unwrap();
        assert_eq!(last.summary.as_deref(), Some("DECLINED Booking: Alice"));
        assert_eq!(last.status, Some(BookingStatus::Declined));
        assert!(last
            .description
            .as_deref()
            .unwrap()
            .ends_with("\nDeclined on 2024-05-20T10:00:00.000Z"));

        assert!(gateway.event(&calendar(), "e1").is_none());
        assert!(reconciler.list_bookings(now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_declined_event() {
        let (gateway, reconciler) = setup();
        gateway.fail_on(Operation::Delete);

        let err = reconciler.reject_at("e1", now()).await.unwrap_err();

        assert!(matches!(err, ReconcileError::DeclinedNotRemoved { ref event_id, .. } if event_id == "e1"));
        let stored = gateway.event(&calendar(), "e1").unwrap();
        assert_eq!(stored.summary.as_deref(), Some("DECLINED Booking: Alice"));
        assert_eq!(gateway.calls_of(Operation::Delete).len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_event_is_not_found() {
        let (gateway, reconciler) = setup();

        let err = reconciler.approve_at("missing", now()).await.unwrap_err();

        assert_eq!(err, ReconcileError::NotFound("missing".to_string()));
        assert!(gateway.calls_of(Operation::Patch).is_empty());
    }

    #[tokio::test]
    async fn test_read_and_write_failures_are_distinguished() {
        let (gateway, reconciler) = setup();

        gateway.fail_on(Operation::Get);
        assert!(matches!(
            reconciler.approve_at("e1", now()).await,
            Err(ReconcileError::RemoteReadFailure(_))
        ));

        gateway.recover(Operation::Get);
        gateway.fail_on(Operation::Patch);
        assert!(matches!(
            reconciler.reject_at("e1", now()).await,
            Err(ReconcileError::RemoteWriteFailure(_))
        ));
        assert!(gateway.calls_of(Operation::Delete).is_empty());
    }

    #[tokio::test]
    async fn test_unauthenticated_transition() {
        let (gateway, reconciler) = setup();
        gateway.set_authenticated(false);

        assert_eq!(
            reconciler.approve_at("e1", now()).await,
            Err(ReconcileError::Unauthenticated)
        );
    }

    #[tokio::test]
    async fn test_listing_derives_status() {
        let (gateway, reconciler) = setup();
        gateway.insert_event(&calendar(), event("e2", Some("Family weekend"), 10));
        gateway.insert_event(
            &calendar(),
            RemoteEvent {
                status_tag: Some(BookingStatus::Declined),
                ..event("e3", Some("PENDING Booking: Dan"), 20)
            },
        );
        gateway.insert_event(&calendar(), event("e4", None, 25));

        let bookings = reconciler.list_bookings(now()).await.unwrap();
        let status_of = |id: &str| {
            bookings
                .iter()
                .find(|b| b.event_id == id)
                .map(|b| b.status)
                .unwrap()
        };

        assert_eq!(bookings.len(), 4);
        assert_eq!(status_of("e1"), BookingStatus::Pending);
        // No recognized prefix and no tag lists as confirmed.
        assert_eq!(status_of("e2"), BookingStatus::Confirmed);
        assert_eq!(status_of("e3"), BookingStatus::Declined);
        assert_eq!(bookings[3].summary, "No title");
        assert_eq!(bookings[0].start.as_deref(), Some("2024-06-01"));
    }

    #[tokio::test]
    async fn test_listing_respects_window_and_limit() {
        let gateway = Arc::new(InMemoryCalendar::new());
        for d in 1..=5 {
            gateway.insert_event(&calendar(), event(&format!("e{d}"), Some("PENDING Booking: X"), d));
        }
        let reconciler = StatusReconciler::new(gateway.clone(), calendar(), 90, 3);

        let bookings = reconciler.list_bookings(now()).await.unwrap();
        assert_eq!(
            bookings.iter().map(|b| b.event_id.as_str()).collect::<Vec<_>>(),
            vec!["e1", "e2", "e3"]
        );

        let short = StatusReconciler::new(gateway, calendar(), 5, 50);
        assert!(short.list_bookings(now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_approve_after_partial_reject_is_refused() {
        let (gateway, reconciler) = setup();
        gateway.fail_on(Operation::Delete);
        assert!(reconciler.reject_at("e1", now()).await.is_err());
        gateway.recover(Operation::Delete);
        let patches_before = gateway.patches().len();

        let err = reconciler.approve_at("e1", now()).await.unwrap_err();

        assert_eq!(err, ReconcileError::AlreadyDeclined("e1".to_string()));
        assert_eq!(gateway.patches().len(), patches_before);
        let bookings = reconciler.list_bookings(now()).await.unwrap();
        assert_eq!(bookings[0].summary, "DECLINED Booking: Alice");
        assert_eq!(bookings[0].status, BookingStatus::Declined);
    }

    #[tokio::test]
    async fn test_approve_refuses_declined_prefix_without_tag() {
        let (gateway, reconciler) = setup();
        gateway.insert_event(&calendar(), event("e2", Some("DECLINED Booking: Bob"), 10));

        assert_eq!(
            reconciler.approve_at("e2", now()).await,
            Err(ReconcileError::AlreadyDeclined("e2".to_string()))
        );
        assert!(gateway.calls_of(Operation::Patch).is_empty());
    }

    #[tokio::test]
    async fn test_transitions_keep_untitled_events_untitled() {
        let (gateway, reconciler) = setup();
        gateway.insert_event(&calendar(), event("e2", None, 10));

        reconciler.approve_at("e2", now()).await.unwrap();

        let patch = gateway.patches().pop().unwrap();
        assert_eq!(patch.summary, None);
        assert_eq!(patch.status, Some(BookingStatus::Confirmed));
        let bookings = reconciler.list_bookings(now()).await.unwrap();
        let untitled = bookings.iter().find(|b| b.event_id == "e2").unwrap();
        assert_eq!(untitled.summary, "No title");
        assert_eq!(untitled.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_upcoming_events_reach_past_listing_window() {
        let (gateway, _) = setup();
        let far = RemoteEvent {
            start: Some(EventTime::Date(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap())),
            end: Some(EventTime::Date(NaiveDate::from_ymd_opt(2025, 8, 3).unwrap())),
            ..event("far", Some("PENDING Booking: Eve"), 1)
        };
        gateway.insert_event(&calendar(), far);
        let reconciler = StatusReconciler::new(gateway.clone(), calendar(), 30, 50);

        let upcoming = reconciler.upcoming_events(now()).await.unwrap();
        assert_eq!(
            upcoming.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["e1", "far"]
        );

        let bookings = reconciler.list_bookings(now()).await.unwrap();
        assert_eq!(bookings.len(), 1);
    }
}
