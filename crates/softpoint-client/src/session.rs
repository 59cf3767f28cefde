//! Scoped enrollment session holding the token and catalog.

use crate::client::SoftpointClient;
use crate::error::SoftpointError;
use crate::types::{AccessToken, Catalog, VerificationRequest};
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

/// Session context for one enrollment: the access token and country
/// catalog, loaded together and dropped together.
///
/// Both startup fetches are joined before the session exists, so a
/// submission can never run with an unresolved token.
pub struct EnrollmentSession {
    client: SoftpointClient,
    token: AccessToken,
    catalog: Catalog,
    established_at: DateTime<Utc>,
}

impl EnrollmentSession {
    /// Establish a session by fetching the access token and the country
    /// catalog concurrently. Fails if either fetch fails.
    #[instrument(skip(client))]
    pub async fn establish(client: SoftpointClient) -> Result<Self, SoftpointError> {
        let (token, catalog) = tokio::try_join!(client.fetch_token(), client.fetch_countries())?;

        info!("Enrollment session established ({} countries)", catalog.len());

        Ok(Self {
            client,
            token,
            catalog,
            established_at: Utc::now(),
        })
    }

    /// The loaded country catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// When the session was established.
    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }

    /// Submit a verification request with the session's token.
    #[instrument(skip(self, request), fields(country_id = %request.country_id))]
    pub async fn submit_verification(
        &self,
        request: &VerificationRequest,
    ) -> Result<serde_json::Value, SoftpointError> {
        self.client.submit_two_factor(&self.token, request).await
    }

    /// End the session, dropping the token and catalog.
    ///
    /// The token's backing `SecretString` is zeroized on drop.
    pub fn clear(self) {
        info!("Enrollment session cleared");
        drop(self);
    }
}
