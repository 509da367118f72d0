// --- File: crates/services/propcoord_backend/src/gateway_factory.rs ---
//! Builds the long-lived services the routers share.
//!
//! One [`CredentialStore`] backs both the Google Calendar gateway and the
//! OAuth routes, so tokens stored by `/oauth2callback` are used by the next
//! calendar call without a restart.
use propcoord_booking::error::PropertyError;
use propcoord_booking::BookingState;
use propcoord_common::services::CalendarGateway;
use propcoord_config::AppConfig;
use propcoord_gcal::auth::AuthError;
use propcoord_gcal::{CredentialStore, GoogleCalendarGateway};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("calendar credentials: {0}")]
    Auth(#[from] AuthError),
    #[error("property setup: {0}")]
    Property(#[from] PropertyError),
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the router needs.
pub struct Services {
    pub booking: Arc<BookingState>,
    pub credentials: Arc<CredentialStore>,
}

impl Services {
    /// Wires the booking core on top of an already built gateway.
    pub fn with_gateway(
        gateway: Arc<dyn CalendarGateway>,
        credentials: Arc<CredentialStore>,
        config: &AppConfig,
    ) -> Result<Self, StartupError> {
        let booking = BookingState::from_config(gateway, config)?;
        Ok(Self {
            booking: Arc::new(booking),
            credentials,
        })
    }
}

pub async fn build_services(config: &AppConfig) -> Result<Services, StartupError> {
    let credentials = Arc::new(CredentialStore::from_config(&config.gcal).await?);
    let gateway = GoogleCalendarGateway::connect(credentials.clone()).await?;
    info!(
        "Google Calendar gateway ready (service account: {})",
        credentials.is_service_account()
    );

    Services::with_gateway(Arc::new(gateway), credentials, config)
}
