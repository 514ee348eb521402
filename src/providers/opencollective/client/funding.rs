use graphql_client::QueryBody;
use log::{debug, info};

use super::core::OpenCollectiveClient;
use crate::dates::{current_date_windows, DateWindow};
use crate::error::{FunderError, Result};
use crate::funding::FundingStatPoint;
use crate::providers::opencollective::types::{CollectiveFundingData, FundingVariables};

const FUNDING_QUERY: &str = include_str!("queries/collective_funding.graphql");

impl OpenCollectiveClient {
    /// Retrieves funding statistics for a collective over the last five years.
    ///
    /// See <https://graphql-docs-v2.opencollective.com/queries/collective>.
    ///
    /// # Arguments
    /// * `slug` - Collective slug (e.g. `babel` for `https://opencollective.com/babel`)
    ///
    /// # Returns
    /// * `Ok(None)` - The collective does not exist or has no financial contributors
    /// * `Ok(Some(points))` - One point per window that returned a collective
    pub async fn get_funding_stats(&self, slug: &str) -> Result<Option<Vec<FundingStatPoint>>> {
        self.get_funding_stats_in(slug, &current_date_windows())
            .await
    }

    /// Same as [`Self::get_funding_stats`] over explicit windows.
    ///
    /// Windows are queried one at a time, in order. A not-found error or a
    /// collective without financial contributors stops the walk early.
    pub async fn get_funding_stats_in(
        &self,
        slug: &str,
        windows: &[DateWindow],
    ) -> Result<Option<Vec<FundingStatPoint>>> {
        if windows.is_empty() {
            debug!("No date windows to query for {slug}");
            return Ok(None);
        }

        let mut points = Vec::with_capacity(windows.len());

        for window in windows {
            let request_body = QueryBody {
                variables: FundingVariables {
                    slug: slug.to_string(),
                    date_from: window.from_param(),
                    date_to: window.to_param(),
                },
                query: FUNDING_QUERY,
                operation_name: "CollectiveFundingStats",
            };

            let data: CollectiveFundingData = match self.execute_graphql_request(&request_body).await
            {
                Ok(data) => data,
                Err(FunderError::NotFound(message)) => {
                    info!("Collective {slug} not found: {message}");
                    return Ok(None);
                }
                Err(e) => return Err(e),
            };

            let Some(collective) = data.collective else {
                debug!(
                    "No collective returned for {slug} in {} - {}",
                    window.from_param(),
                    window.to_param()
                );
                continue;
            };

            if collective.total_financial_contributors == 0 {
                info!("Collective {slug} has no financial contributors");
                return Ok(None);
            }

            let amount = collective.amount_received();
            if let Some(currency) = amount.and_then(|a| a.currency.as_deref()) {
                if currency != "USD" {
                    debug!("Amount for {slug} reported in {currency}");
                }
            }

            points.push(FundingStatPoint::new(
                window,
                collective.total_financial_contributors,
                amount.and_then(|a| a.value).unwrap_or(0.0),
            ));
        }

        Ok(Some(points))
    }
}
