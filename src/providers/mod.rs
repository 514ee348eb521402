pub mod opencollective;

use chrono::Utc;

use crate::error::Result;
use crate::funding::{AccountPage, FundingReport, FundingStatPoint};
use crate::slug::{owner_and_repo, resolve_owner, resolve_slug};

pub use opencollective::OpenCollectiveProvider;

/// A platform that can report funding for collectives.
///
/// Calls are awaited one at a time; implementations need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait FundingSource {
    /// Human-readable source name, recorded on every report.
    fn name(&self) -> &'static str;

    /// One page of registered collectives starting at `offset`.
    async fn list_accounts(&self, offset: usize) -> Result<AccountPage>;

    /// Per-window funding stats, or `None` when the slug has no funding data.
    async fn get_funding_stats(&self, slug: &str) -> Result<Option<Vec<FundingStatPoint>>>;

    /// Looks up a single project given a slug, `owner/repo`, or GitHub URL.
    async fn run(&self, project: &str) -> Result<FundingReport> {
        let slug = resolve_slug(project);
        let stats = self.get_funding_stats(&slug).await?.unwrap_or_default();

        Ok(FundingReport {
            source: self.name().to_string(),
            project: owner_and_repo(project),
            owner: resolve_owner(project),
            is_funded: !stats.is_empty(),
            slug,
            retrieved_at: Utc::now(),
            stats,
        })
    }
}
