#[cfg(test)]
mod tests {
    use crate::error::PropertyError;
    use crate::handlers::{outcome_status, BookingState};
    use crate::memory::InMemoryCalendar;
    use crate::models::{BookingOutcome, Rejection, Verification};
    use crate::validator::ValidationError;
    use axum::http::StatusCode;
    use propcoord_config::{AppConfig, BookingConfig, GcalConfig, PropertiesConfig, ServerConfig};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn config(active: &str, time_zone: Option<&str>) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            properties: PropertiesConfig {
                active: active.to_string(),
                calendars: HashMap::from([(
                    "cabin".to_string(),
                    "cabin@group.calendar.google.com".to_string(),
                )]),
            },
            gcal: GcalConfig {
                time_zone: time_zone.map(str::to_string),
                ..GcalConfig::default()
            },
            booking: BookingConfig::default(),
        }
    }

    #[test]
    fn test_outcome_status_codes() {
        let accepted = BookingOutcome::Accepted {
            event_id: "e1".to_string(),
            verification: Verification::Found,
        };
        assert_eq!(outcome_status(&accepted), StatusCode::CREATED);

        let invalid = BookingOutcome::Rejected(vec![Rejection::Invalid(
            ValidationError::InvalidRange,
        )]);
        assert_eq!(outcome_status(&invalid), StatusCode::UNPROCESSABLE_ENTITY);

        let busy = BookingOutcome::Rejected(vec![Rejection::DatesUnavailable]);
        assert_eq!(outcome_status(&busy), StatusCode::CONFLICT);

        let failed = BookingOutcome::Rejected(vec![Rejection::CreateFailed]);
        assert_eq!(outcome_status(&failed), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_state_resolves_active_property() {
        let state =
            BookingState::from_config(Arc::new(InMemoryCalendar::new()), &config("cabin", None))
                .unwrap();

        assert_eq!(state.property, "cabin");
        assert_eq!(state.calendar_id.as_str(), "cabin@group.calendar.google.com");
    }

    #[test]
    fn test_state_rejects_unknown_property() {
        let err = BookingState::from_config(Arc::new(InMemoryCalendar::new()), &config("villa", None))
            .err()
            .unwrap();

        assert_eq!(err, PropertyError::UnknownProperty("villa".to_string()));
    }

    #[test]
    fn test_state_rejects_unknown_time_zone() {
        let err = BookingState::from_config(
            Arc::new(InMemoryCalendar::new()),
            &config("cabin", Some("Mars/Olympus")),
        )
        .err()
        .unwrap();

        assert_eq!(err, PropertyError::InvalidTimeZone("Mars/Olympus".to_string()));
    }
}
