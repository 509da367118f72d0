#[cfg(test)]
mod tests {
    use crate::status::{
        booking_title, derive_status, replace_pending_prefix, status_from_summary,
        CONFIRMED_PREFIX, DECLINED_PREFIX, PENDING_PREFIX,
    };
    use proptest::prelude::*;
    use propcoord_common::services::{BookingStatus, RemoteEvent};

    fn status_strategy() -> impl Strategy<Value = BookingStatus> {
        prop_oneof![
            Just(BookingStatus::Pending),
            Just(BookingStatus::Confirmed),
            Just(BookingStatus::Declined),
        ]
    }

    proptest! {
        // A pending summary gets exactly one replacement prefix
        #[test]
        fn test_pending_prefix_is_replaced_once(rest in "[A-Za-z :]{0,40}") {
            let summary = format!("{PENDING_PREFIX}{rest}");

            let confirmed = replace_pending_prefix(&summary, CONFIRMED_PREFIX);
            prop_assert_eq!(&confirmed, &format!("{CONFIRMED_PREFIX}{rest}"));

            // A second transition leaves the summary alone
            let again = replace_pending_prefix(&confirmed, CONFIRMED_PREFIX);
            prop_assert_eq!(&again, &confirmed);
        }

        #[test]
        fn test_non_pending_summary_is_unchanged(summary in "[A-Za-z :]{0,40}") {
            prop_assume!(!summary.starts_with(PENDING_PREFIX));
            prop_assert_eq!(replace_pending_prefix(&summary, DECLINED_PREFIX), summary);
        }

        // Fresh bookings always read back as pending
        #[test]
        fn test_new_booking_title_is_pending(name in "[A-Za-z][A-Za-z ]{0,30}") {
            let title = booking_title(&name);
            prop_assert_eq!(status_from_summary(Some(&title)), BookingStatus::Pending);
            prop_assert!(title.ends_with(name.trim()));
        }

        #[test]
        fn test_status_tag_wins_over_prefix(
            tag in status_strategy(),
            summary in prop_oneof![
                Just("PENDING Booking: Alice".to_string()),
                Just("CONFIRMED Booking: Alice".to_string()),
                Just("DECLINED Booking: Alice".to_string()),
                "[a-z ]{0,20}",
            ],
        ) {
            let event = RemoteEvent {
                id: "e1".to_string(),
                summary: Some(summary),
                description: None,
                start: None,
                end: None,
                status_tag: Some(tag),
            };
            prop_assert_eq!(derive_status(&event), tag);
        }

        // Unprefixed summaries default to confirmed
        #[test]
        fn test_unprefixed_summary_is_confirmed(summary in "[a-z][a-z ]{0,30}") {
            prop_assert_eq!(status_from_summary(Some(&summary)), BookingStatus::Confirmed);
        }
    }

    #[test]
    fn test_prefix_table() {
        assert_eq!(status_from_summary(None), BookingStatus::Confirmed);
        assert_eq!(
            status_from_summary(Some("CANCELLED Booking: Bob")),
            BookingStatus::Declined
        );
        assert_eq!(
            status_from_summary(Some("DECLINED Booking: Bob")),
            BookingStatus::Declined
        );
        assert_eq!(
            status_from_summary(Some("CONFIRMED Booking: Bob")),
            BookingStatus::Confirmed
        );
    }
}
