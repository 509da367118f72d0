// File: crates/propcoord_gcal/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{OAuthCallbackQuery, OAuthCallbackResponse};

#[utoipa::path(
    get,
    path = "/auth/google",
    responses(
        (status = 303, description = "Redirect to the Google consent screen"),
        (status = 500, description = "OAuth consent not configured")
    ),
    tag = "Auth"
)]
fn doc_google_auth_handler() {}

#[utoipa::path(
    get,
    path = "/oauth2callback",
    params(OAuthCallbackQuery),
    responses(
        (status = 200, description = "Tokens stored", body = OAuthCallbackResponse,
         example = json!({
             "success": true,
             "message": "Authentication successful! You can close this window."
         })
        ),
        (status = 401, description = "Consent refused"),
        (status = 422, description = "Missing authorization code"),
        (status = 502, description = "Token exchange failed")
    ),
    tag = "Auth"
)]
fn doc_oauth_callback_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_google_auth_handler, doc_oauth_callback_handler),
    components(schemas(OAuthCallbackResponse)),
    tags(
        (name = "gcal", description = "Google account connection")
    )
)]
pub struct GcalAuthApiDoc;
