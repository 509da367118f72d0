use propcoord_common::error::{
    auth_required, config_error, conflict, external_service_error, not_found, CoordinatorError,
};
use propcoord_common::services::GatewayError;
use thiserror::Error;

const SERVICE_NAME: &str = "Google Calendar";

/// Failures of an owner approve/reject action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("no valid calendar credential")]
    Unauthenticated,
    #[error("booking {0} no longer exists")]
    NotFound(String),
    #[error("booking {0} was declined and cannot be approved")]
    AlreadyDeclined(String),
    #[error("failed to read booking: {0}")]
    RemoteReadFailure(String),
    #[error("failed to update booking: {0}")]
    RemoteWriteFailure(String),
    /// Patched to DECLINED, but the delete failed and the event is still on the calendar.
    #[error("booking {event_id} was marked declined but could not be removed: {reason}")]
    DeclinedNotRemoved { event_id: String, reason: String },
}

impl ReconcileError {
    /// Maps a gateway failure of the read step.
    pub(crate) fn on_read(event_id: &str, err: GatewayError) -> Self {
        match err {
            GatewayError::Unauthenticated => ReconcileError::Unauthenticated,
            GatewayError::NotFound(_) => ReconcileError::NotFound(event_id.to_string()),
            GatewayError::Remote(message) => ReconcileError::RemoteReadFailure(message),
        }
    }

    /// Maps a gateway failure of a write step.
    pub(crate) fn on_write(event_id: &str, err: GatewayError) -> Self {
        match err {
            GatewayError::Unauthenticated => ReconcileError::Unauthenticated,
            GatewayError::NotFound(_) => ReconcileError::NotFound(event_id.to_string()),
            GatewayError::Remote(message) => ReconcileError::RemoteWriteFailure(message),
        }
    }
}

impl From<ReconcileError> for CoordinatorError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Unauthenticated => auth_required(
                "Google authentication required. Connect the calendar account at /auth/google",
            ),
            ReconcileError::NotFound(_) => not_found(err),
            ReconcileError::AlreadyDeclined(_) => conflict(err),
            ReconcileError::RemoteReadFailure(_)
            | ReconcileError::RemoteWriteFailure(_)
            | ReconcileError::DeclinedNotRemoved { .. } => {
                external_service_error(SERVICE_NAME, err)
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("no calendar configured for property '{0}'")]
    UnknownProperty(String),
    #[error("invalid time zone '{0}'")]
    InvalidTimeZone(String),
}

impl From<PropertyError> for CoordinatorError {
    fn from(err: PropertyError) -> Self {
        config_error(err)
    }
}
