use serde::{Deserialize, Serialize};

use crate::funding::{AccountNode, AccountPage};

/// Top-level Open Collective response.
///
/// `errors` carries GraphQL-level failures (e.g. unknown slug). `error`
/// (singular) is what the platform returns for transient, non-GraphQL
/// failures such as rate limiting.
#[derive(Debug, Deserialize)]
pub struct GraphQLEnvelope<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<graphql_client::Error>>,
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingVariables {
    pub slug: String,
    pub date_from: String,
    pub date_to: String,
}

#[derive(Debug, Serialize)]
pub struct PageVariables {
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize)]
pub struct HostVariables {
    pub slug: String,
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct CollectiveFundingData {
    pub collective: Option<CollectiveFunding>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectiveFunding {
    #[serde(default)]
    pub total_financial_contributors: u64,
    pub stats: Option<CollectiveStats>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectiveStats {
    pub total_amount_received: Option<Amount>,
}

#[derive(Debug, Deserialize)]
pub struct Amount {
    pub currency: Option<String>,
    pub value: Option<f64>,
}

impl CollectiveFunding {
    pub fn amount_received(&self) -> Option<&Amount> {
        self.stats.as_ref()?.total_amount_received.as_ref()
    }
}

#[derive(Debug, Deserialize)]
pub struct AccountsData {
    pub accounts: AccountCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCollection {
    pub total_count: usize,
    #[serde(default)]
    pub nodes: Vec<AccountRecord>,
}

#[derive(Debug, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub stats: Option<AccountStats>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub contributors_count: Option<u64>,
}

impl From<AccountCollection> for AccountPage {
    fn from(collection: AccountCollection) -> Self {
        Self {
            total_count: collection.total_count,
            nodes: collection
                .nodes
                .into_iter()
                .map(|record| AccountNode {
                    contributor_count: record.stats.and_then(|s| s.contributors_count),
                    id: record.id,
                    slug: record.slug,
                    kind: record.kind,
                })
                .collect(),
        }
    }
}
