use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

mod error;
mod secret;

pub use error::OAuthError;
pub use secret::ClientSecret;

/// Default OAuth callback port for the loopback flow
pub const OAUTH_CALLBACK_PORT: u16 = 8080;

/// Redirect URI that makes Google display the code for manual copy-paste
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// How long the loopback flow waits for the browser to come back
const CALLBACK_TIMEOUT_SECS: u64 = 300;

/// OAuth 2.0 token information
#[derive(Debug, Clone)]
pub struct OAuthToken {
    /// Access token for API requests
    pub access_token: String,
    /// Refresh token, only issued on the first consent for a client
    pub refresh_token: Option<String>,
    /// Token type (usually "Bearer")
    pub token_type: String,
    /// Lifetime of the access token in seconds
    pub expires_in: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    token_type: Option<String>,
    #[serde(default)]
    expires_in: u64,
}

/// OAuth configuration for one consent flow
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Consent page the user is sent to
    pub auth_uri: String,
    /// Endpoint that trades an authorization code for tokens
    pub token_uri: String,
    /// Redirect URI registered for the client
    pub redirect_uri: String,
    /// OAuth scopes, sent space-separated
    pub scopes: Vec<String>,
    /// Permit plain-HTTP token endpoints
    pub allow_insecure_transport: bool,
}

impl OAuthConfig {
    /// Build a configuration from a client secret descriptor and the requested scopes.
    ///
    /// The redirect URI is the descriptor's first entry, or the out-of-band
    /// URI when the descriptor lists none.
    pub fn from_secret(secret: &ClientSecret, scopes: &[String]) -> Self {
        Self {
            client_id: secret.client_id.clone(),
            client_secret: secret.client_secret.clone(),
            auth_uri: secret.auth_uri.clone(),
            token_uri: secret.token_uri.clone(),
            redirect_uri: secret
                .redirect_uris
                .first()
                .cloned()
                .unwrap_or_else(|| OOB_REDIRECT_URI.to_string()),
            scopes: scopes.to_vec(),
            allow_insecure_transport: false,
        }
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    pub fn with_insecure_transport(mut self, allow: bool) -> Self {
        self.allow_insecure_transport = allow;
        self
    }

    fn ensure_secure(&self, url: &str) -> Result<(), OAuthError> {
        if self.allow_insecure_transport || url.starts_with("https://") {
            Ok(())
        } else {
            Err(OAuthError::InsecureTransport(url.to_string()))
        }
    }
}

/// Generate PKCE verifier and challenge
pub fn generate_pkce() -> (String, String) {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use rand::Rng;
    use rand::distributions::Alphanumeric;
    use sha2::{Digest, Sha256};

    let verifier: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();

    // challenge = base64url(SHA256(verifier))
    let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));

    (verifier, challenge)
}

/// Generate the consent URL, returning it together with the PKCE verifier
pub fn generate_auth_url(config: &OAuthConfig) -> (String, String) {
    let (verifier, challenge) = generate_pkce();
    let separator = if config.auth_uri.contains('?') { '&' } else { '?' };

    let auth_url = format!(
        "{}{}\
        client_id={}&\
        redirect_uri={}&\
        response_type=code&\
        scope={}&\
        code_challenge={}&\
        code_challenge_method=S256&\
        access_type=offline",
        config.auth_uri,
        separator,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(&config.redirect_uri),
        urlencoding::encode(&config.scopes.join(" ")),
        urlencoding::encode(&challenge),
    );

    (auth_url, verifier)
}

/// Exchange authorization code for tokens
pub async fn exchange_code(
    config: &OAuthConfig,
    code: &str,
    verifier: &str,
) -> Result<OAuthToken, OAuthError> {
    config.ensure_secure(&config.token_uri)?;
    tracing::debug!(token_uri = %config.token_uri, "exchanging authorization code");

    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("code", code),
        ("code_verifier", verifier),
        ("grant_type", "authorization_code"),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];

    let response = reqwest::Client::new()
        .post(&config.token_uri)
        .form(&params)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await?;
        return Err(OAuthError::TokenEndpoint { status, body });
    }

    let token: TokenResponse = response.json().await?;
    tracing::info!(expires_in = token.expires_in, "obtained OAuth access token");

    Ok(OAuthToken {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        token_type: token.token_type.unwrap_or_else(|| "Bearer".to_string()),
        expires_in: token.expires_in,
    })
}

fn print_consent_banner(auth_url: &str) {
    eprintln!("\n=================================================");
    eprintln!("OAuth 2.0 Authorization Required");
    eprintln!("=================================================");
    eprintln!("\nPlease visit the following URL to authorize the application:\n");
    eprintln!("{}\n", auth_url);
}

/// Run the console flow: show the consent URL, then read the code the user pastes back.
///
/// `input` is normally a buffered stdin; any async reader works.
pub async fn run_console_flow<R>(
    config: &OAuthConfig,
    mut input: R,
) -> Result<OAuthToken, OAuthError>
where
    R: AsyncBufRead + Unpin,
{
    config.ensure_secure(&config.token_uri)?;
    let (auth_url, verifier) = generate_auth_url(config);

    print_consent_banner(&auth_url);
    eprint!("Enter the authorization code: ");

    let mut line = String::new();
    input.read_line(&mut line).await?;
    let code = line.trim();
    if code.is_empty() {
        return Err(OAuthError::MissingCode);
    }

    exchange_code(config, code, &verifier).await
}

/// Run the loopback flow: serve a local callback endpoint and wait for the browser redirect
pub async fn start_auth_flow(config: &OAuthConfig) -> Result<OAuthToken, OAuthError> {
    start_auth_flow_on_port(config, OAUTH_CALLBACK_PORT).await
}

/// Loopback flow with the callback server on `port`
pub async fn start_auth_flow_on_port(
    config: &OAuthConfig,
    port: u16,
) -> Result<OAuthToken, OAuthError> {
    use axum::{Router, extract::Query, response::Html, routing::get};
    use std::sync::Arc;
    use tokio::sync::{Mutex, oneshot};

    config.ensure_secure(&config.token_uri)?;
    let config = config.clone().with_redirect_uri(format!(
        "http://localhost:{}/oauth2callback",
        port
    ));
    let (auth_url, verifier) = generate_auth_url(&config);

    print_consent_banner(&auth_url);
    eprintln!("Waiting for authorization...");
    eprintln!("=================================================\n");

    #[derive(Deserialize)]
    struct AuthCallback {
        code: Option<String>,
        error: Option<String>,
    }

    // First callback wins; later hits only see the HTML page
    let (sender, receiver) = oneshot::channel::<Result<String, String>>();
    let sender = Arc::new(Mutex::new(Some(sender)));

    let callback_handler = move |Query(params): Query<AuthCallback>| {
        let sender = sender.clone();
        async move {
            let (outcome, page) = match (params.code, params.error) {
                (_, Some(error)) => (
                    Err(error.clone()),
                    format!(
                        "<html><body><h1>Authorization Failed</h1><p>Error: {}</p>\
                        <p>You can close this window.</p></body></html>",
                        error
                    ),
                ),
                (Some(code), None) => (
                    Ok(code),
                    "<html><body><h1>Authorization Successful!</h1>\
                    <p>You can close this window and return to the application.</p></body></html>"
                        .to_string(),
                ),
                (None, None) => (
                    Err("no code received".to_string()),
                    "<html><body><h1>Authorization Failed</h1><p>No code received</p></body></html>"
                        .to_string(),
                ),
            };

            if let Some(sender) = sender.lock().await.take() {
                let _ = sender.send(outcome);
            }
            Html(page)
        }
    };

    let app = Router::new().route("/oauth2callback", get(callback_handler));

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    let outcome = tokio::time::timeout(
        tokio::time::Duration::from_secs(CALLBACK_TIMEOUT_SECS),
        receiver,
    )
    .await;
    server_handle.abort();

    let code = match outcome {
        Err(_) => return Err(OAuthError::Timeout(CALLBACK_TIMEOUT_SECS)),
        Ok(Err(_)) => return Err(OAuthError::CallbackClosed),
        Ok(Ok(Err(error))) => return Err(OAuthError::Denied(error)),
        Ok(Ok(Ok(code))) => code,
    };

    exchange_code(&config, &code, &verifier).await
}
