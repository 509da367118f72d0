// --- File: crates/propcoord_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- OAuth (user consent) Config ---
// client_secret is normally "secret_from_env" and resolved from GCAL_OAUTH_CLIENT_SECRET.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Where obtained tokens are persisted between restarts. Optional.
    #[serde(default)]
    pub token_path: Option<String>,
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    /// Service account key file. Takes precedence over `oauth` when set.
    #[serde(default)]
    pub key_path: Option<String>,
    #[serde(default)]
    pub oauth: Option<OAuthConfig>,
    /// IANA zone used to turn booking days into instants, e.g. "Europe/Zurich".
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

// --- Property -> calendar mapping ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PropertiesConfig {
    /// Key of the property served by this instance.
    pub active: String,
    #[serde(default)]
    pub calendars: HashMap<String, String>,
}

// --- Booking behaviour ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingConfig {
    #[serde(default = "default_listing_window_days")]
    pub listing_window_days: i64,
    #[serde(default = "default_listing_max_results")]
    pub listing_max_results: i32,
    #[serde(default = "default_verify_after_write")]
    pub verify_after_write: bool,
}

fn default_listing_window_days() -> i64 {
    90
}

fn default_listing_max_results() -> i32 {
    50
}

fn default_verify_after_write() -> bool {
    true
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            listing_window_days: default_listing_window_days(),
            listing_max_results: default_listing_max_results(),
            verify_after_write: default_verify_after_write(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,
    pub properties: PropertiesConfig,

    #[serde(default)]
    pub gcal: GcalConfig,
    #[serde(default)]
    pub booking: BookingConfig,
}
