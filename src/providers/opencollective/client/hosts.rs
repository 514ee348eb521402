use graphql_client::QueryBody;

use super::core::{OpenCollectiveClient, PAGE_SIZE};
use crate::error::Result;
use crate::providers::opencollective::types::HostVariables;

const HOSTED_QUERY: &str = include_str!("queries/hosted_collectives.graphql");

impl OpenCollectiveClient {
    /// Lists collectives hosted by the fiscal host `slug`.
    ///
    /// The decoded `data` object is returned as-is.
    pub async fn list_host_projects(&self, slug: &str) -> Result<serde_json::Value> {
        let request_body = QueryBody {
            variables: HostVariables {
                slug: slug.to_string(),
                limit: PAGE_SIZE,
            },
            query: HOSTED_QUERY,
            operation_name: "HostedCollectives",
        };

        self.execute_graphql_request(&request_body).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::core::test_client;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_host_projects_is_authenticated_and_raw() {
        let mut server = Server::new_async().await;
        let data = json!({
            "accounts": {
                "totalCount": 1,
                "nodes": [{ "id": "h1", "slug": "babel", "name": "Babel", "type": "COLLECTIVE" }]
            }
        });
        let mock = server
            .mock("POST", "/graphql/v2")
            .match_header("api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "operationName": "HostedCollectives",
                "variables": { "slug": "opensource" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "data": data }).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let raw = client.list_host_projects("opensource").await.unwrap();

        assert_eq!(raw, data);
        mock.assert_async().await;
    }
}
