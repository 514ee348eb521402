use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::dates::{serialize_timestamp, DateWindow};

/// Funding totals for one date window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingStatPoint {
    pub num_contributors: u64,
    pub amount_usd: f64,
    #[serde(serialize_with = "serialize_timestamp")]
    pub date_from: DateTime<Utc>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub date_to: DateTime<Utc>,
}

impl FundingStatPoint {
    pub fn new(window: &DateWindow, num_contributors: u64, amount_usd: f64) -> Self {
        Self {
            num_contributors,
            amount_usd: amount_usd.max(0.0),
            date_from: window.from,
            date_to: window.to,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountNode {
    pub id: String,
    pub slug: String,
    pub kind: String,
    pub contributor_count: Option<u64>,
}

/// One page of the platform's account listing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountPage {
    pub total_count: usize,
    pub nodes: Vec<AccountNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlugError {
    pub error: String,
    pub slug: String,
}

/// Outcome of a batch run: every processed slug lands in exactly one bucket.
#[derive(Debug, Default, Serialize)]
pub struct ResultSet {
    pub funded: IndexMap<String, Vec<FundingStatPoint>>,
    pub unfunded: Vec<String>,
    pub errored: Vec<SlugError>,
}

impl ResultSet {
    pub fn record_funded(&mut self, slug: &str, stats: Vec<FundingStatPoint>) {
        self.funded.insert(slug.to_string(), stats);
    }

    pub fn record_unfunded(&mut self, slug: &str) {
        self.unfunded.push(slug.to_string());
    }

    pub fn record_error(&mut self, slug: &str, error: impl ToString) {
        self.errored.push(SlugError {
            error: error.to_string(),
            slug: slug.to_string(),
        });
    }

    pub fn total(&self) -> usize {
        self.funded.len() + self.unfunded.len() + self.errored.len()
    }
}

/// Result of looking up a single project.
#[derive(Debug, Serialize)]
pub struct FundingReport {
    pub source: String,
    pub project: String,
    pub owner: String,
    pub slug: String,
    pub is_funded: bool,
    pub retrieved_at: DateTime<Utc>,
    pub stats: Vec<FundingStatPoint>,
}

impl FundingReport {
    pub fn total_amount_usd(&self) -> f64 {
        self.stats.iter().map(|s| s.amount_usd).sum()
    }

    pub fn max_contributors(&self) -> u64 {
        self.stats
            .iter()
            .map(|s| s.num_contributors)
            .max()
            .unwrap_or(0)
    }
}
