use serde::Deserialize;
use std::path::Path;

use crate::OAuthError;

/// Client credentials as downloaded from the Google Cloud console
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Consent page URL
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    /// Token exchange URL
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// Redirect URIs registered for the client, in console order
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

#[derive(Deserialize)]
struct SecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ClientSecret {
    /// Load a client secret descriptor from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OAuthError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| OAuthError::SecretRead {
            path: path.display().to_string(),
            source,
        })?;
        let file: SecretFile =
            serde_json::from_str(&content).map_err(|source| OAuthError::SecretParse {
                path: path.display().to_string(),
                source,
            })?;
        file.installed.or(file.web).ok_or(OAuthError::SecretShape)
    }
}
