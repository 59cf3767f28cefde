//! Softpoint directory HTTP client.

use crate::error::SoftpointError;
use crate::types::*;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Softpoint sandbox API client.
///
/// The API key is stored using `SecretString` to prevent accidental
/// exposure in logs or debug output.
#[derive(Clone)]
pub struct SoftpointClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    corporate_id: u32,
}

impl SoftpointClient {
    /// Create a new Softpoint client.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        corporate_id: u32,
        timeout: Duration,
    ) -> Result<Self, SoftpointError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: SecretString::new(api_key.into()),
            corporate_id,
        })
    }

    /// Get the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request an access token for the configured corporate id.
    #[instrument(skip(self))]
    pub async fn fetch_token(&self) -> Result<AccessToken, SoftpointError> {
        let response = self
            .client
            .post(format!("{}/access_token", self.base_url))
            .query(&[("corporate_id", self.corporate_id)])
            .header("Api-Key", self.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let token_response = self.handle_response::<TokenResponse>(response).await?;
        Ok(AccessToken::new(token_response.access_token))
    }

    /// Fetch the country catalog.
    ///
    /// The endpoint is served without authentication. An empty catalog
    /// parses fine but is reported as an error so the caller never ends
    /// up with a silently unusable form.
    #[instrument(skip(self))]
    pub async fn fetch_countries(&self) -> Result<Catalog, SoftpointError> {
        let response = self
            .client
            .get(format!("{}/challenges/countries", self.base_url))
            .send()
            .await?;

        let catalog = self.handle_response::<Catalog>(response).await?;

        if catalog.is_empty() {
            warn!("Country catalog came back empty");
            return Err(SoftpointError::EmptyCatalog);
        }

        debug!("Fetched {} countries", catalog.len());
        Ok(catalog)
    }

    /// Submit a two-factor verification request.
    ///
    /// The `Authorization` header carries the bare token value; the
    /// provider does not use a `Bearer` scheme.
    #[instrument(skip(self, token, request), fields(country_id = %request.country_id))]
    pub async fn submit_two_factor(
        &self,
        token: &AccessToken,
        request: &VerificationRequest,
    ) -> Result<serde_json::Value, SoftpointError> {
        let response = self
            .client
            .post(format!("{}/challenges/two_factor_auth", self.base_url))
            .header("Authorization", token.expose())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle HTTP response, converting errors appropriately.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, SoftpointError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            debug!("Response body: {}", truncate_for_log(&body));
            serde_json::from_str(&body).map_err(SoftpointError::from)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract error information from failed response.
    async fn extract_error(&self, response: reqwest::Response) -> SoftpointError {
        let status = response.status();

        match status {
            StatusCode::UNAUTHORIZED => {
                warn!("Authentication failed");
                SoftpointError::Unauthorized
            }
            _ => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".into());
                SoftpointError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }
}

/// Truncate a response body for logging. Country names are full of
/// multibyte characters, so the cut must land on a char boundary.
fn truncate_for_log(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
