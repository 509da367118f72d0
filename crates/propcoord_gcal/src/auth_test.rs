#[cfg(test)]
mod tests {
    use crate::auth::{
        load_tokens, save_tokens, AuthError, CredentialStore, OAuthTokens, TokenResponse,
        AUTH_ENDPOINT,
    };
    use chrono::{Duration, TimeZone, Utc};
    use propcoord_config::{GcalConfig, OAuthConfig};

    fn oauth_config(token_path: Option<String>) -> OAuthConfig {
        OAuthConfig {
            client_id: "client-123.apps.googleusercontent.com".to_string(),
            client_secret: "shh".to_string(),
            redirect_uri: "http://localhost:3000/oauth2callback".to_string(),
            token_path,
        }
    }

    fn tokens(expires_in_secs: Option<i64>) -> OAuthTokens {
        OAuthTokens {
            access_token: "ya29.access".to_string(),
            refresh_token: Some("1//refresh".to_string()),
            expires_at: expires_in_secs.map(|s| Utc::now() + Duration::seconds(s)),
        }
    }

    #[test]
    fn test_expiry_uses_safety_margin() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut t = tokens(None);

        assert!(!t.is_expired(now));
        t.expires_at = Some(now + Duration::seconds(30));
        assert!(t.is_expired(now));
        t.expires_at = Some(now + Duration::minutes(10));
        assert!(!t.is_expired(now));
    }

    #[test]
    fn test_refresh_response_keeps_previous_refresh_token() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let response = TokenResponse {
            access_token: "new".to_string(),
            expires_in: Some(3599),
            refresh_token: None,
        };

        let t = OAuthTokens::from_response(response, Some("old-refresh".to_string()), now);

        assert_eq!(t.access_token, "new");
        assert_eq!(t.refresh_token.as_deref(), Some("old-refresh"));
        assert_eq!(t.expires_at, Some(now + Duration::seconds(3599)));
    }

    #[test]
    fn test_authorization_url_requests_offline_calendar_access() {
        let store = CredentialStore::oauth_with_tokens(oauth_config(None), None);
        let url = store.authorization_url().unwrap();

        assert!(url.starts_with(AUTH_ENDPOINT));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("client_id=client-123.apps.googleusercontent.com"));
        assert!(url.contains("scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fcalendar"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Foauth2callback"));
    }

    #[tokio::test]
    async fn test_no_tokens_means_unauthenticated() {
        let store = CredentialStore::oauth_with_tokens(oauth_config(None), None);

        assert!(!store.is_authenticated().await);
        assert_eq!(store.access_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_valid_token_is_returned_without_refresh() {
        let store = CredentialStore::oauth_with_tokens(oauth_config(None), Some(tokens(Some(3600))))
            // Any refresh attempt would fail against this endpoint
            .with_token_endpoint("http://127.0.0.1:9/token");

        assert!(store.is_authenticated().await);
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("ya29.access"));
    }

    #[tokio::test]
    async fn test_expired_token_without_refresh_token_is_unusable() {
        let mut expired = tokens(Some(-10));
        expired.refresh_token = None;
        let store = CredentialStore::oauth_with_tokens(oauth_config(None), Some(expired));

        assert_eq!(store.access_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_refresh_is_an_error() {
        let store = CredentialStore::oauth_with_tokens(oauth_config(None), Some(tokens(Some(-10))))
            .with_token_endpoint("http://127.0.0.1:9/token");

        assert!(matches!(store.access_token().await, Err(AuthError::Http(_))));
    }

    #[tokio::test]
    async fn test_stored_tokens_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets").join("token.json");
        let config = oauth_config(Some(path.to_string_lossy().into_owned()));

        let first = CredentialStore::oauth(config.clone()).await.unwrap();
        assert!(!first.is_authenticated().await);
        first.store_tokens(tokens(Some(3600))).await.unwrap();

        let second = CredentialStore::oauth(config).await.unwrap();
        assert!(second.is_authenticated().await);
        assert_eq!(second.tokens().await, first.tokens().await);
    }

    #[tokio::test]
    async fn test_load_tokens_of_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");

        assert!(load_tokens(&path).await.unwrap().is_none());
        save_tokens(&path, &tokens(None)).await.unwrap();
        assert_eq!(load_tokens(&path).await.unwrap(), Some(tokens(None)));
    }

    #[tokio::test]
    async fn test_corrupt_token_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        assert!(matches!(load_tokens(&path).await, Err(AuthError::Json(_))));
    }

    #[tokio::test]
    async fn test_missing_credentials_config_is_rejected() {
        let result = CredentialStore::from_config(&GcalConfig::default()).await;
        assert!(matches!(result, Err(AuthError::NotConfigured(_))));
    }
}
