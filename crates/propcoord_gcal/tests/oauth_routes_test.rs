use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use propcoord_config::OAuthConfig;
use propcoord_gcal::auth::AUTH_ENDPOINT;
use propcoord_gcal::{routes, CredentialStore};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> axum::Router {
    let config = OAuthConfig {
        client_id: "client-123".to_string(),
        client_secret: "shh".to_string(),
        redirect_uri: "http://localhost:3000/oauth2callback".to_string(),
        token_path: None,
    };
    let store = CredentialStore::oauth_with_tokens(config, None)
        .with_token_endpoint("http://127.0.0.1:9/token");
    routes(Arc::new(store))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_auth_google_redirects_to_consent() {
    let response = app().oneshot(get("/auth/google")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with(AUTH_ENDPOINT));
    assert!(location.contains("access_type=offline"));
}

#[tokio::test]
async fn test_refused_consent_is_unauthorized() {
    let response = app()
        .oneshot(get("/oauth2callback?error=access_denied"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("access_denied"));
}

#[tokio::test]
async fn test_callback_without_code_is_rejected() {
    let response = app().oneshot(get("/oauth2callback")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unreachable_token_endpoint_is_bad_gateway() {
    let response = app()
        .oneshot(get("/oauth2callback?code=4%2Fabc"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
