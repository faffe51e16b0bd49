use crate::errors::AppError;
use crate::models::{
    EnrichRequest, EnrichResponse, EnrichmentResult, NormalizedAddress, NormalizedName,
    RequestAddress,
};
use reqwest::Client;
use std::time::Duration;

/// Production endpoint of the contact enrichment service.
pub const DEFAULT_ENRICH_BASE_URL: &str = "https://devapi.endato.com";

/// Default search-type tag sent alongside the credential headers.
pub const DEFAULT_SEARCH_TYPE: &str = "DevAPIContactEnrich";

/// Caller-supplied credentials passed through to the remote service.
///
/// Not validated locally: an invalid pair simply comes back as a response
/// with no person data, which reads as "no match".
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub key_name: String,
    pub key_password: String,
    pub search_type: String,
}

/// Client for the remote Contact/Enrich endpoint.
///
/// One POST per contact; no retries, no caching. The base URL is a
/// constructor input so tests can point the client at a mock server.
pub struct EnrichmentClient {
    client: Client,
    base_url: String,
    credentials: ApiCredentials,
}

impl EnrichmentClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: ApiCredentials,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create enrichment client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            credentials,
        })
    }

    /// Looks up one contact and extracts the enrichment fields.
    ///
    /// A well-formed response without usable person data returns an
    /// all-absent [`EnrichmentResult`]. Transport failures, non-2xx statuses,
    /// and unparseable bodies are errors; the batch layer decides whether
    /// they abort the run or mark the row unmatched.
    pub async fn enrich(
        &self,
        name: &NormalizedName,
        address: &NormalizedAddress,
    ) -> Result<EnrichmentResult, AppError> {
        let url = format!("{}/Contact/Enrich", self.base_url);

        let payload = EnrichRequest {
            first_name: name.first.clone(),
            middle_name: name.middle.clone(),
            last_name: name.last.clone(),
            address: RequestAddress {
                address_line1: address.address_line1.clone(),
                address_line2: address.address_line2.clone(),
            },
        };

        tracing::debug!(
            "Contact enrich lookup for '{} {}'",
            name.first.as_deref().unwrap_or(""),
            name.last.as_deref().unwrap_or("")
        );

        let response = self
            .client
            .post(&url)
            .header("accept", "application/json")
            .header("galaxy-ap-name", &self.credentials.key_name)
            .header("galaxy-ap-password", &self.credentials.key_password)
            .header("galaxy-search-type", &self.credentials.search_type)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Contact enrich request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Contact enrich returned error {}: {}", status, error_text);
            return Err(AppError::ExternalApiError(format!(
                "Contact enrich returned status {}: {}",
                status, error_text
            )));
        }

        let decoded: EnrichResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse enrich response: {}", e))
        })?;

        Ok(EnrichmentResult::from_response(decoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let credentials = ApiCredentials {
            key_name: "name".to_string(),
            key_password: "password".to_string(),
            search_type: DEFAULT_SEARCH_TYPE.to_string(),
        };
        let client = EnrichmentClient::new(DEFAULT_ENRICH_BASE_URL, credentials);
        assert!(client.is_ok());
    }
}
