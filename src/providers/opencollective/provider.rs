use log::info;

use crate::auth::ApiKey;
use crate::error::Result;
use crate::funding::{AccountPage, FundingStatPoint};
use crate::providers::FundingSource;

use super::client::{ClientSettings, OpenCollectiveClient};

/// Open Collective funding source.
///
/// Wraps the GraphQL client and exposes it through [`FundingSource`] so the
/// batch runner can drive it.
pub struct OpenCollectiveProvider {
    pub client: OpenCollectiveClient,
}

impl OpenCollectiveProvider {
    /// Creates a provider with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(settings: &ClientSettings, api_key: ApiKey) -> Result<Self> {
        Ok(Self::with_client(OpenCollectiveClient::new(settings, api_key)?))
    }

    /// Creates a provider with the key read from `OPENCOLLECTIVE_API_KEY`.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error if the variable is missing.
    pub fn from_env(settings: &ClientSettings) -> Result<Self> {
        Ok(Self::with_client(OpenCollectiveClient::from_env(settings)?))
    }

    fn with_client(client: OpenCollectiveClient) -> Self {
        info!("Using Open Collective endpoint: {}", client.graphql_url);
        Self { client }
    }
}

impl FundingSource for OpenCollectiveProvider {
    fn name(&self) -> &'static str {
        "Open Collective"
    }

    async fn list_accounts(&self, offset: usize) -> Result<AccountPage> {
        self.client.list_accounts(offset).await
    }

    async fn get_funding_stats(&self, slug: &str) -> Result<Option<Vec<FundingStatPoint>>> {
        self.client.get_funding_stats(slug).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FunderError;

    #[test]
    fn test_provider_name() {
        let provider =
            OpenCollectiveProvider::new(&ClientSettings::default(), ApiKey::parse("key").unwrap()).unwrap();
        assert_eq!(provider.name(), "Open Collective");
        assert_eq!(
            provider.client.graphql_url.as_str(),
            "https://api.opencollective.com/graphql/v2"
        );
    }

    #[test]
    fn test_provider_rejects_bad_url() {
        let settings = ClientSettings {
            api_url: "::".to_string(),
            ..ClientSettings::default()
        };
        let result = OpenCollectiveProvider::new(&settings, ApiKey::parse("key").unwrap());
        assert!(matches!(result, Err(FunderError::Config(_))));
    }
}
