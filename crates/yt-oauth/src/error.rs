use thiserror::Error;

/// Errors raised while acquiring an OAuth 2.0 credential
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Failed to read client secret file '{path}': {source}")]
    SecretRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse client secret file '{path}': {source}")]
    SecretParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Client secret descriptor has neither an 'installed' nor a 'web' section")]
    SecretShape,

    #[error("Refusing to contact '{0}' over plain HTTP (set OAUTH_INSECURE_TRANSPORT to allow it)")]
    InsecureTransport(String),

    #[error("Failed to exchange authorization code (status {status}): {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("Authorization was denied: {0}")]
    Denied(String),

    #[error("No authorization code was entered")]
    MissingCode,

    #[error("OAuth authorization timeout ({0} seconds)")]
    Timeout(u64),

    #[error("OAuth callback server stopped before receiving a code")]
    CallbackClosed,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
