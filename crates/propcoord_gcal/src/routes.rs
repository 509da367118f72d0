// --- File: crates/propcoord_gcal/src/routes.rs ---

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::auth::CredentialStore;
use crate::handlers::{google_auth_handler, oauth_callback_handler, OAuthState};

/// Consent flow routes for connecting the Google account.
pub fn routes(credentials: Arc<CredentialStore>) -> Router {
    let state = Arc::new(OAuthState { credentials });

    Router::new()
        .route("/auth/google", get(google_auth_handler))
        .route("/oauth2callback", get(oauth_callback_handler))
        .with_state(state)
}
