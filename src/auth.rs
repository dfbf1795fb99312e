use async_trait::async_trait;
use clap::ValueEnum;
use yt_analytics_client::AnalyticsClient;
use yt_oauth::{ClientSecret, OAuthConfig};

use crate::config::AppConfig;
use crate::error::ReportError;

/// Produces an analytics client bound to a user credential
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn authenticate(
        &self,
        secret: &ClientSecret,
        scopes: &[String],
    ) -> Result<AnalyticsClient, ReportError>;
}

/// How the user hands the authorization code back to us
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AuthFlow {
    /// Paste the code shown by Google into the terminal
    #[default]
    Console,
    /// Let the browser redirect to a local callback server
    Loopback,
}

/// Asks the user for consent on every run
pub struct InteractiveProvider {
    flow: AuthFlow,
    api_address: String,
    allow_insecure_transport: bool,
}

impl InteractiveProvider {
    pub fn new(config: &AppConfig, flow: AuthFlow) -> Self {
        Self {
            flow,
            api_address: config.api_address.clone(),
            allow_insecure_transport: config.allow_insecure_transport,
        }
    }
}

#[async_trait]
impl CredentialProvider for InteractiveProvider {
    async fn authenticate(
        &self,
        secret: &ClientSecret,
        scopes: &[String],
    ) -> Result<AnalyticsClient, ReportError> {
        let oauth = OAuthConfig::from_secret(secret, scopes)
            .with_insecure_transport(self.allow_insecure_transport);
        tracing::debug!(flow = ?self.flow, client_id = %oauth.client_id, "starting OAuth consent");

        let token = match self.flow {
            AuthFlow::Console => {
                let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                yt_oauth::run_console_flow(&oauth, stdin).await?
            }
            AuthFlow::Loopback => yt_oauth::start_auth_flow(&oauth).await?,
        };

        Ok(AnalyticsClient::new(
            self.api_address.clone(),
            token.access_token,
        ))
    }
}
