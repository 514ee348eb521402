use graphql_client::QueryBody;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::auth::ApiKey;
use crate::error::{FunderError, Result};
use crate::providers::opencollective::types::GraphQLEnvelope;

pub const DEFAULT_API_URL: &str = "https://api.opencollective.com/graphql/v2";
pub(super) const PAGE_SIZE: usize = 100;

const API_KEY_HEADER: &str = "api-key";
const USER_AGENT: &str = concat!("funderfinder/", env!("CARGO_PKG_VERSION"));

/// Bounded exponential backoff for transient source errors.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub multiplier: u32,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_secs(15),
            multiplier: 2,
            max_delay: Duration::from_secs(300),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (zero-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(retry);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }
}

/// Outcome of a single round trip.
enum Attempt<T> {
    Done(T),
    Retry(String),
}

pub struct OpenCollectiveClient {
    client: Client,
    pub graphql_url: Url,
    api_key: ApiKey,
    retry: RetryPolicy,
}

impl OpenCollectiveClient {
    pub fn new(settings: &ClientSettings, api_key: ApiKey) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| FunderError::Config(format!("Failed to create HTTP client: {e}")))?;

        let graphql_url = Url::parse(&settings.api_url)
            .map_err(|e| FunderError::Config(format!("Invalid API URL: {e}")))?;

        Ok(Self {
            client,
            graphql_url,
            api_key,
            retry: settings.retry.clone(),
        })
    }

    /// Builds a client with the key taken from `OPENCOLLECTIVE_API_KEY`.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error when the variable is not set.
    pub fn from_env(settings: &ClientSettings) -> Result<Self> {
        Self::new(settings, ApiKey::from_env()?)
    }

    /// Attaches the API key. Every query goes through here.
    pub fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(API_KEY_HEADER, self.api_key.as_str())
    }

    /// Execute a GraphQL request, retrying transient failures with backoff.
    ///
    /// GraphQL `errors` are not retried: a not-found message becomes
    /// [`FunderError::NotFound`], anything else [`FunderError::GraphQL`].
    pub(super) async fn execute_graphql_request<V, T>(&self, body: &QueryBody<V>) -> Result<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let mut retry_count = 0;
        loop {
            let reason = match self.send_once(body).await? {
                Attempt::Done(data) => return Ok(data),
                Attempt::Retry(reason) => reason,
            };

            if retry_count >= self.retry.max_retries {
                return Err(FunderError::TransientSource {
                    attempts: retry_count + 1,
                    message: reason,
                });
            }

            let delay = self.retry.delay_for(retry_count);
            warn!(
                "{} failed ({reason}), retrying in {}s ({}/{})...",
                body.operation_name,
                delay.as_secs(),
                retry_count + 1,
                self.retry.max_retries
            );
            tokio::time::sleep(delay).await;
            retry_count += 1;
        }
    }

    async fn send_once<V, T>(&self, body: &QueryBody<V>) -> Result<Attempt<T>>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let request = self.auth_request(self.client.post(self.graphql_url.clone()).json(body));

        let response = match request.send().await {
            Ok(resp) => resp,
            Err(e) if e.is_connect() || e.is_timeout() => {
                return Ok(Attempt::Retry(format!("network error: {e}")));
            }
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Ok(Attempt::Retry(format!("HTTP status {status}")));
        }

        let text = response.text().await?;
        if !status.is_success() {
            return Err(FunderError::Api {
                status: status.as_u16(),
                message: error_body_message(&text),
            });
        }

        let envelope: GraphQLEnvelope<T> = serde_json::from_str(&text)?;

        if let Some(error) = envelope.error {
            return Ok(Attempt::Retry(describe_error(&error)));
        }

        if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            let joined = messages.join(", ");
            if messages.iter().any(|m| is_not_found(m)) {
                debug!("{} reported not found: {joined}", body.operation_name);
                return Err(FunderError::NotFound(joined));
            }
            return Err(FunderError::GraphQL {
                query: body.operation_name.to_string(),
                errors: joined,
            });
        }

        envelope
            .data
            .map(Attempt::Done)
            .ok_or(FunderError::NoResponseData)
    }
}

fn describe_error(error: &serde_json::Value) -> String {
    match error {
        serde_json::Value::String(message) => message.clone(),
        serde_json::Value::Object(fields) => fields
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| error.to_string(), ToString::to_string),
        other => other.to_string(),
    }
}

/// Message of a rejected request: the `error` field when the body carries
/// one, the raw body otherwise.
fn error_body_message(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|body| body.get("error").map(describe_error))
        .unwrap_or_else(|| text.to_string())
}

/// Whether a GraphQL error message says the entity does not exist.
fn is_not_found(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("not found")
        || message.contains("no such")
        || (message.starts_with("no ") && message.contains(" found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_retry_delay_grows_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(15));
        assert_eq!(policy.delay_for(1), Duration::from_secs(30));
        assert_eq!(policy.delay_for(2), Duration::from_secs(60));
        assert_eq!(policy.delay_for(5), Duration::from_secs(300));
        assert_eq!(policy.delay_for(40), Duration::from_secs(300));
    }

    #[test]
    fn test_is_not_found() {
        assert!(is_not_found("No collective found with slug nope"));
        assert!(is_not_found("Account Not Found"));
        assert!(is_not_found("No such collective"));
        assert!(!is_not_found("Rate limit exceeded"));
        assert!(!is_not_found("Cannot query field \"foo\""));
    }

    #[test]
    fn test_describe_error() {
        assert_eq!(describe_error(&json!("boom")), "boom");
        assert_eq!(describe_error(&json!({ "message": "slow down" })), "slow down");
        assert_eq!(describe_error(&json!({ "code": 42 })), "{\"code\":42}");
    }

    #[test]
    fn test_error_body_message() {
        assert_eq!(
            error_body_message(r#"{"error":{"code":401,"message":"Invalid personal token"}}"#),
            "Invalid personal token"
        );
        assert_eq!(error_body_message("Forbidden"), "Forbidden");
    }

    #[test]
    fn test_invalid_api_url_is_config_error() {
        let settings = ClientSettings {
            api_url: "not a url".to_string(),
            ..ClientSettings::default()
        };
        let result = OpenCollectiveClient::new(&settings, ApiKey::parse("key").unwrap());
        assert!(matches!(result, Err(FunderError::Config(_))));
    }
}

#[cfg(test)]
pub(super) fn test_settings(server_url: &str) -> ClientSettings {
    ClientSettings {
        api_url: format!("{server_url}/graphql/v2"),
        retry: RetryPolicy {
            max_retries: 2,
            initial_delay: Duration::ZERO,
            multiplier: 2,
            max_delay: Duration::ZERO,
        },
        ..ClientSettings::default()
    }
}

#[cfg(test)]
pub(super) fn test_client(server_url: &str) -> OpenCollectiveClient {
    OpenCollectiveClient::new(&test_settings(server_url), ApiKey::parse("test-key").unwrap())
        .unwrap()
}
