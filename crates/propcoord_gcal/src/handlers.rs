// File: crates/propcoord_gcal/src/handlers.rs
use axum::{
    extract::{Query, State},
    response::{Json, Redirect},
};
use propcoord_common::error::{auth_required, config_error, validation_error, CoordinatorError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::CredentialStore;

// Shared state of the consent routes
#[derive(Clone)]
pub struct OAuthState {
    pub credentials: Arc<CredentialStore>,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct OAuthCallbackQuery {
    /// Authorization code issued by Google
    pub code: Option<String>,
    /// Set by Google when consent was refused
    pub error: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OAuthCallbackResponse {
    pub success: bool,
    pub message: String,
}

/// Handler redirecting the owner to the Google consent screen.
#[axum::debug_handler]
pub async fn google_auth_handler(
    State(state): State<Arc<OAuthState>>,
) -> Result<Redirect, CoordinatorError> {
    let url = state
        .credentials
        .authorization_url()
        .ok_or_else(|| config_error("OAuth consent needs gcal.oauth instead of a service account"))?;
    info!("redirecting to Google consent screen");
    Ok(Redirect::to(&url))
}

/// Handler receiving the authorization code after consent.
#[axum::debug_handler]
pub async fn oauth_callback_handler(
    State(state): State<Arc<OAuthState>>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Json<OAuthCallbackResponse>, CoordinatorError> {
    if let Some(reason) = query.error {
        warn!("Google consent refused: {}", reason);
        return Err(auth_required(format!("Google consent was not granted: {reason}")));
    }
    let code = query
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| validation_error("missing authorization code"))?;

    state.credentials.exchange_code(&code).await?;

    Ok(Json(OAuthCallbackResponse {
        success: true,
        message: "Authentication successful! You can close this window.".to_string(),
    }))
}
