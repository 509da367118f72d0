// File: crates/propcoord_gcal/src/auth.rs
//! Credentials for the Google Calendar API.
//!
//! A [`CredentialStore`] is built once at startup and shared by the gateway
//! and the OAuth routes. It holds either a service-account authenticator or
//! the user tokens obtained through the consent flow.

use chrono::{DateTime, Duration, Utc};
use google_calendar3::{
    common::GetToken,
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    CalendarHub,
};
use propcoord_common::error::{
    auth_required, config_error, external_service_error, internal_error, CoordinatorError,
};
use propcoord_config::{GcalConfig, OAuthConfig};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
pub const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Access tokens this close to expiry are refreshed before use.
const EXPIRY_MARGIN_SECS: i64 = 60;

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("calendar credentials not configured: {0}")]
    NotConfigured(String),
    #[error("service account error: {0}")]
    ServiceAccount(String),
    #[error("token endpoint rejected the request: {0}")]
    TokenEndpoint(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid token data: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<AuthError> for CoordinatorError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotConfigured(_) => config_error(err),
            AuthError::ServiceAccount(_) => auth_required(err),
            AuthError::TokenEndpoint(_) | AuthError::Http(_) => {
                external_service_error("Google OAuth", err)
            }
            AuthError::Io(_) | AuthError::Json(_) => internal_error(err),
        }
    }
}

/// User tokens as persisted in `oauth.token_path`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OAuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuthTokens {
    /// Tokens without an expiry never count as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .map(|at| at - Duration::seconds(EXPIRY_MARGIN_SECS) <= now)
            .unwrap_or(false)
    }

    /// Builds the stored set from a token endpoint answer.
    ///
    /// Refresh answers usually omit the refresh token; the previous one is kept.
    pub fn from_response(
        response: TokenResponse,
        previous_refresh_token: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .filter(|t| !t.is_empty())
                .or(previous_refresh_token),
            expires_at: response
                .expires_in
                .filter(|secs| *secs > 0)
                .map(|secs| now + Duration::seconds(secs)),
        }
    }
}

/// Body of a successful token endpoint response.
#[derive(Deserialize, Debug, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

struct UserCredentials {
    config: OAuthConfig,
    tokens: RwLock<Option<OAuthTokens>>,
    http: reqwest::Client,
    token_endpoint: String,
}

impl UserCredentials {
    async fn request_tokens(&self, params: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let response = self
            .http
            .post(&self.token_endpoint)
            .form(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(AuthError::TokenEndpoint(format!("HTTP {status} - {body}")));
        }

        Ok(response.json::<TokenResponse>().await?)
    }

    async fn persist(&self, tokens: &OAuthTokens) -> Result<(), AuthError> {
        if let Some(path) = self.config.token_path.as_deref() {
            save_tokens(Path::new(path), tokens).await?;
        }
        Ok(())
    }
}

enum CredentialSource {
    ServiceAccount(Box<dyn GetToken>),
    OAuth(UserCredentials),
}

/// The process-wide calendar credential.
pub struct CredentialStore {
    source: CredentialSource,
}

impl CredentialStore {
    /// Service account when `key_path` is set, user OAuth otherwise.
    pub async fn from_config(config: &GcalConfig) -> Result<Self, AuthError> {
        if let Some(key_path) = config.key_path.as_deref() {
            return Self::service_account(key_path).await;
        }
        match &config.oauth {
            Some(oauth) => Self::oauth(oauth.clone()).await,
            None => Err(AuthError::NotConfigured(
                "set gcal.key_path or gcal.oauth".to_string(),
            )),
        }
    }

    pub async fn service_account(key_path: &str) -> Result<Self, AuthError> {
        let sa_key = read_service_account_key(Path::new(key_path)).await?;
        let auth = ServiceAccountAuthenticator::builder(sa_key)
            .build()
            .await?;

        info!("using service account credentials from {}", key_path);
        Ok(Self {
            source: CredentialSource::ServiceAccount(Box::new(auth)),
        })
    }

    /// User OAuth credentials, loading previously stored tokens if the file exists.
    pub async fn oauth(config: OAuthConfig) -> Result<Self, AuthError> {
        let tokens = match config.token_path.as_deref() {
            Some(path) => load_tokens(Path::new(path)).await?,
            None => None,
        };
        if tokens.is_none() {
            info!("no stored Google tokens, connect the account at /auth/google");
        }
        Ok(Self::oauth_with_tokens(config, tokens))
    }

    pub fn oauth_with_tokens(config: OAuthConfig, tokens: Option<OAuthTokens>) -> Self {
        Self {
            source: CredentialSource::OAuth(UserCredentials {
                config,
                tokens: RwLock::new(tokens),
                http: reqwest::Client::new(),
                token_endpoint: TOKEN_ENDPOINT.to_string(),
            }),
        }
    }

    /// Points token exchange and refresh at another endpoint.
    pub fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        if let CredentialSource::OAuth(user) = &mut self.source {
            user.token_endpoint = endpoint.into();
        }
        self
    }

    pub fn is_service_account(&self) -> bool {
        matches!(self.source, CredentialSource::ServiceAccount(_))
    }

    pub async fn is_authenticated(&self) -> bool {
        match &self.source {
            CredentialSource::ServiceAccount(_) => true,
            CredentialSource::OAuth(user) => user.tokens.read().await.is_some(),
        }
    }

    pub async fn tokens(&self) -> Option<OAuthTokens> {
        match &self.source {
            CredentialSource::ServiceAccount(_) => None,
            CredentialSource::OAuth(user) => user.tokens.read().await.clone(),
        }
    }

    /// A bearer token for the calendar scope, refreshing it when expired.
    ///
    /// `None` means no usable credential is held.
    pub async fn access_token(&self) -> Result<Option<String>, AuthError> {
        let user = match &self.source {
            CredentialSource::ServiceAccount(auth) => {
                return auth
                    .get_token(&[CALENDAR_SCOPE])
                    .await
                    .map_err(|e| AuthError::ServiceAccount(e.to_string()));
            }
            CredentialSource::OAuth(user) => user,
        };

        if let Some(tokens) = user.tokens.read().await.as_ref() {
            if !tokens.is_expired(Utc::now()) {
                return Ok(Some(tokens.access_token.clone()));
            }
        }

        let mut slot = user.tokens.write().await;
        let Some(current) = (*slot).clone() else {
            return Ok(None);
        };
        // Another request may have refreshed while we waited for the lock
        if !current.is_expired(Utc::now()) {
            return Ok(Some(current.access_token));
        }
        let Some(refresh_token) = current.refresh_token.clone() else {
            warn!("Google access token expired and no refresh token is stored");
            return Ok(None);
        };

        debug!("refreshing Google access token");
        let response = user
            .request_tokens(&[
                ("client_id", user.config.client_id.as_str()),
                ("client_secret", user.config.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .await?;
        let refreshed = OAuthTokens::from_response(response, Some(refresh_token), Utc::now());

        user.persist(&refreshed).await?;
        let access_token = refreshed.access_token.clone();
        *slot = Some(refreshed);
        Ok(Some(access_token))
    }

    /// Consent URL requesting offline access to the calendar scope.
    pub fn authorization_url(&self) -> Option<String> {
        let CredentialSource::OAuth(user) = &self.source else {
            return None;
        };
        let query = serde_urlencoded::to_string([
            ("client_id", user.config.client_id.as_str()),
            ("redirect_uri", user.config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", CALENDAR_SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ])
        .ok()?;
        Some(format!("{AUTH_ENDPOINT}?{query}"))
    }

    /// Trades an authorization code for tokens and stores them.
    pub async fn exchange_code(&self, code: &str) -> Result<(), AuthError> {
        let CredentialSource::OAuth(user) = &self.source else {
            return Err(AuthError::NotConfigured(
                "OAuth consent is not used with a service account".to_string(),
            ));
        };

        let response = user
            .request_tokens(&[
                ("code", code),
                ("client_id", user.config.client_id.as_str()),
                ("client_secret", user.config.client_secret.as_str()),
                ("redirect_uri", user.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .await?;

        let previous = self.tokens().await.and_then(|t| t.refresh_token);
        self.store_tokens(OAuthTokens::from_response(response, previous, Utc::now()))
            .await
    }

    /// Replaces the held user tokens and writes them to the token file if configured.
    pub async fn store_tokens(&self, tokens: OAuthTokens) -> Result<(), AuthError> {
        let CredentialSource::OAuth(user) = &self.source else {
            return Err(AuthError::NotConfigured(
                "OAuth tokens cannot be stored for a service account".to_string(),
            ));
        };

        user.persist(&tokens).await?;
        *user.tokens.write().await = Some(tokens);
        info!("Google account connected");
        Ok(())
    }
}

/// Reads a token file; a missing file means no tokens yet.
pub async fn load_tokens(path: &Path) -> Result<Option<OAuthTokens>, AuthError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub async fn save_tokens(path: &Path, tokens: &OAuthTokens) -> Result<(), AuthError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp: PathBuf = path.with_extension("tmp");
    tokio::fs::write(&tmp, serde_json::to_vec_pretty(tokens)?).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Hands the store's bearer token to the calendar hub.
#[derive(Clone)]
pub struct CredentialToken(pub Arc<CredentialStore>);

impl GetToken for CredentialToken {
    fn get_token<'a>(
        &'a self,
        _scopes: &'a [&str],
    ) -> Pin<
        Box<
            dyn Future<Output = Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>>
                + Send
                + 'a,
        >,
    > {
        Box::pin(async move {
            match self.0.access_token().await? {
                Some(token) => Ok(Some(token)),
                None => Err("no Google credential, connect the account at /auth/google".into()),
            }
        })
    }
}

pub async fn create_calendar_hub(credentials: Arc<CredentialStore>) -> Result<HubType, AuthError> {
    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    // Create client without specifying body type
    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(CalendarHub::new(client, CredentialToken(credentials)))
}
