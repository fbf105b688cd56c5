pub mod fixtures;

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::domain::review::ProviderResponse;
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::ReviewProvider;

#[derive(Debug, Clone)]
pub struct HostawayCredentials {
    pub account_id: String,
    pub api_key: String,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

/// Hostaway reviews API client.
///
/// Without credentials it serves the bundled fixtures. With credentials it
/// calls the live API and, when `fallback_to_fixtures` is set, substitutes the
/// fixtures for an empty or failed response.
#[derive(Clone)]
pub struct HostawayClient {
    client: Client,
    base_url: String,
    credentials: Option<HostawayCredentials>,
    fallback_to_fixtures: bool,
}

impl HostawayClient {
    pub fn new(
        base_url: String,
        credentials: Option<HostawayCredentials>,
        timeout: Duration,
        fallback_to_fixtures: bool,
    ) -> Result<Self, RepositoryError> {
        let client = Client::builder()
            .user_agent("ReviewsDashboard/1.0")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            fallback_to_fixtures,
        })
    }

    #[tracing::instrument(skip(self, credentials), fields(account_id = %credentials.account_id))]
    async fn access_token(&self, credentials: &HostawayCredentials) -> Result<String, RepositoryError> {
        let url = format!("{}/accessTokens", self.base_url);
        let token: AccessTokenResponse = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.account_id.as_str()),
                ("client_secret", credentials.api_key.as_str()),
                ("scope", "general"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!("hostaway access token acquired");
        Ok(token.access_token)
    }

    async fn fetch_live(&self, credentials: &HostawayCredentials) -> Result<ProviderResponse, RepositoryError> {
        let token = self.access_token(credentials).await?;
        let url = format!("{}/reviews", self.base_url);

        let response: ProviderResponse = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!(count = response.result.len(), success = response.is_success(), "hostaway reviews fetched");
        Ok(response)
    }

    fn fallback(&self, reason: &str, failure: ProviderResponse) -> ProviderResponse {
        if !self.fallback_to_fixtures {
            return failure;
        }

        metrics::counter!("reviews_provider_fallback_total", "reason" => reason.to_string()).increment(1);
        tracing::warn!(reason, "serving bundled review fixtures");
        fixtures::mock_response()
    }
}

impl ReviewProvider for HostawayClient {
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_reviews(&self) -> ProviderResponse {
        let Some(credentials) = &self.credentials else {
            tracing::debug!("no hostaway credentials configured, serving bundled fixtures");
            return fixtures::mock_response();
        };

        match self.fetch_live(credentials).await {
            Ok(response) if !response.is_success() => {
                tracing::warn!(message = ?response.message, "hostaway returned an error envelope");
                self.fallback("error", response)
            }
            Ok(response) if response.result.is_empty() => self.fallback("empty", response),
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "hostaway request failed");
                self.fallback("unreachable", ProviderResponse::error(e.to_string()))
            }
        }
    }
}
