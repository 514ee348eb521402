use graphql_client::QueryBody;
use log::debug;

use super::core::{OpenCollectiveClient, PAGE_SIZE};
use crate::error::Result;
use crate::funding::AccountPage;
use crate::providers::opencollective::types::{AccountsData, PageVariables};

const ACCOUNTS_QUERY: &str = include_str!("queries/accounts.graphql");

impl OpenCollectiveClient {
    /// Fetches one page of collectives starting at `offset`.
    ///
    /// Pages hold at most 100 accounts. Callers paginate by advancing `offset`
    /// by the number of nodes actually returned until `total_count` is reached.
    pub async fn list_accounts(&self, offset: usize) -> Result<AccountPage> {
        let request_body = QueryBody {
            variables: PageVariables {
                limit: PAGE_SIZE,
                offset,
            },
            query: ACCOUNTS_QUERY,
            operation_name: "Accounts",
        };

        let data: AccountsData = self.execute_graphql_request(&request_body).await?;
        let page = AccountPage::from(data.accounts);

        debug!(
            "Fetched {} accounts at offset {offset} (total {})",
            page.nodes.len(),
            page.total_count
        );

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::super::core::test_client;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_accounts_sends_offset_and_page_size() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql/v2")
            .match_header("api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "operationName": "Accounts",
                "variables": { "limit": 100, "offset": 200 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "data": {
                        "accounts": {
                            "totalCount": 201,
                            "nodes": [
                                { "id": "x1", "slug": "last-one", "type": "COLLECTIVE", "stats": { "contributorsCount": 3 } }
                            ]
                        }
                    }
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let page = client.list_accounts(200).await.unwrap();

        assert_eq!(page.total_count, 201);
        assert_eq!(page.nodes.len(), 1);
        assert_eq!(page.nodes[0].slug, "last-one");
        assert_eq!(page.nodes[0].contributor_count, Some(3));
        mock.assert_async().await;
    }
}
