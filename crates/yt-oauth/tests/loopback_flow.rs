use axum::{Form, Json, Router, extract::State, http::StatusCode, routing::post};
use std::collections::HashMap;
use std::time::Duration;
use yt_oauth::{OAuthConfig, OAuthError, OOB_REDIRECT_URI, start_auth_flow_on_port};

async fn token_handler(
    State(expected_redirect): State<String>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let well_formed = form.get("code").map(String::as_str) == Some("loopback-code")
        && form.get("redirect_uri") == Some(&expected_redirect)
        && form.get("code_verifier").is_some_and(|v| v.len() == 64);

    if well_formed {
        (
            StatusCode::OK,
            Json(serde_json::json!({
                "access_token": "ya29.loopback",
                "refresh_token": "1//refresh",
                "expires_in": 3599,
                "token_type": "Bearer"
            })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "invalid_grant"})),
        )
    }
}

async fn spawn_token_endpoint(callback_port: u16) -> String {
    let expected_redirect = format!("http://localhost:{}/oauth2callback", callback_port);
    let app = Router::new()
        .route("/token", post(token_handler))
        .with_state(expected_redirect);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}/token", addr)
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn config(token_uri: String) -> OAuthConfig {
    OAuthConfig {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
        token_uri,
        redirect_uri: OOB_REDIRECT_URI.to_string(),
        scopes: vec!["https://www.googleapis.com/auth/yt-analytics.readonly".to_string()],
        allow_insecure_transport: true,
    }
}

/// Hit the callback like a browser would, waiting for the server to come up
async fn visit_callback(port: u16, query: &str) -> String {
    let url = format!("http://127.0.0.1:{}/oauth2callback?{}", port, query);
    for _ in 0..100 {
        if let Ok(response) = reqwest::get(&url).await {
            return response.text().await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("callback server never came up on port {port}");
}

#[tokio::test]
async fn callback_code_is_exchanged_for_token() {
    let port = free_port();
    let cfg = config(spawn_token_endpoint(port).await);
    let flow = tokio::spawn(async move { start_auth_flow_on_port(&cfg, port).await });

    let page = visit_callback(port, "code=loopback-code&scope=openid").await;
    let token = flow.await.unwrap().unwrap();

    assert!(page.contains("Authorization Successful!"));
    assert_eq!(token.access_token, "ya29.loopback");
    assert_eq!(token.refresh_token.as_deref(), Some("1//refresh"));
}

#[tokio::test]
async fn callback_error_is_denied() {
    let port = free_port();
    let cfg = config(spawn_token_endpoint(port).await);
    let flow = tokio::spawn(async move { start_auth_flow_on_port(&cfg, port).await });

    let page = visit_callback(port, "error=access_denied").await;
    let err = flow.await.unwrap().unwrap_err();

    assert!(page.contains("Authorization Failed"));
    assert!(page.contains("access_denied"));
    match err {
        OAuthError::Denied(reason) => assert_eq!(reason, "access_denied"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn callback_without_code_is_denied() {
    let port = free_port();
    let cfg = config(spawn_token_endpoint(port).await);
    let flow = tokio::spawn(async move { start_auth_flow_on_port(&cfg, port).await });

    let page = visit_callback(port, "state=xyz").await;
    let err = flow.await.unwrap().unwrap_err();

    assert!(page.contains("No code received"));
    assert!(matches!(err, OAuthError::Denied(_)));
}

#[tokio::test]
async fn plain_http_token_endpoint_is_refused_before_listening() {
    let port = free_port();
    let mut cfg = config("http://127.0.0.1:9/token".to_string());
    cfg.allow_insecure_transport = false;

    let err = start_auth_flow_on_port(&cfg, port).await.unwrap_err();

    assert!(matches!(err, OAuthError::InsecureTransport(_)));
    assert!(std::net::TcpListener::bind(("127.0.0.1", port)).is_ok());
}
