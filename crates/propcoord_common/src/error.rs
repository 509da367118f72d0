use std::fmt;
use thiserror::Error;

use crate::services::GatewayError;

/// The base error type surfaced by the coordinator's HTTP layer.
///
/// Crates convert their own errors into this one at the handler boundary.
#[derive(Error, Debug)]
pub enum CoordinatorError {
    /// User-correctable input problem
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No usable credential for the remote calendar
    #[error("Authentication required: {0}")]
    AuthError(String),

    /// The remote calendar failed or rejected the call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// The booking's state does not allow the action
    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for CoordinatorError {
    fn status_code(&self) -> u16 {
        match self {
            CoordinatorError::ValidationError(_) => 422,
            CoordinatorError::ConfigError(_) => 500,
            CoordinatorError::AuthError(_) => 401,
            CoordinatorError::ExternalServiceError { .. } => 502,
            CoordinatorError::ConflictError(_) => 409,
            CoordinatorError::NotFoundError(_) => 404,
            CoordinatorError::InternalError(_) => 500,
        }
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> CoordinatorError {
    CoordinatorError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> CoordinatorError {
    CoordinatorError::ValidationError(message.to_string())
}

pub fn auth_required<T: fmt::Display>(message: T) -> CoordinatorError {
    CoordinatorError::AuthError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> CoordinatorError {
    CoordinatorError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> CoordinatorError {
    CoordinatorError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> CoordinatorError {
    CoordinatorError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> CoordinatorError {
    CoordinatorError::InternalError(message.to_string())
}

impl From<GatewayError> for CoordinatorError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unauthenticated => auth_required(
                "Google authentication required. Connect the calendar account at /auth/google",
            ),
            GatewayError::NotFound(id) => not_found(format!("event {id}")),
            GatewayError::Remote(message) => external_service_error("Google Calendar", message),
        }
    }
}
