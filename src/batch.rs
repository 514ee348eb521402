//! Batch runs over every collective on the platform.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indicatif::ProgressBar;
use log::{debug, info, warn};
use serde::Serialize;

use crate::error::Result;
use crate::funding::ResultSet;
use crate::providers::FundingSource;

pub const PROJECTS_FILE: &str = "projects.json";
pub const STATLESS_FILE: &str = "statless_projects.json";
pub const ERRORS_FILE: &str = "errors.json";
pub const SLUGS_FILE: &str = "collective_slugs.json";

/// Lists the slug of every collective registered with `source`.
///
/// Pages are requested from offset 0, advancing by the number of nodes each
/// page actually returned, until `total_count` slugs have been seen.
pub async fn collect_collective_slugs<S: FundingSource>(source: &S) -> Result<Vec<String>> {
    let mut slugs = Vec::new();
    let mut offset = 0;
    let mut with_contributors = 0;

    loop {
        let page = source.list_accounts(offset).await?;
        let fetched = page.nodes.len();
        for node in page.nodes {
            debug!("{} {} ({})", node.kind, node.slug, node.id);
            if node.contributor_count.is_some_and(|count| count > 0) {
                with_contributors += 1;
            }
            slugs.push(node.slug);
        }
        offset += fetched;

        debug!("Listed {offset}/{} collectives", page.total_count);

        if offset >= page.total_count {
            break;
        }
        if fetched == 0 {
            warn!(
                "Empty page at offset {offset} before reaching {} collectives, stopping",
                page.total_count
            );
            break;
        }
    }

    info!(
        "Found {} collectives on {} ({with_contributors} with contributors)",
        slugs.len(),
        source.name()
    );
    Ok(slugs)
}

/// Fetches funding stats for every slug and sorts them into a [`ResultSet`].
///
/// A failure for one slug is recorded in `errored` and never stops the run.
pub async fn get_project_stats<S: FundingSource>(
    source: &S,
    slugs: &[String],
    progress: &ProgressBar,
) -> ResultSet {
    let mut results = ResultSet::default();
    let mut seen = HashSet::with_capacity(slugs.len());

    for slug in slugs {
        progress.set_message(slug.clone());

        if !seen.insert(slug.as_str()) {
            debug!("Skipping duplicate slug {slug}");
            progress.inc(1);
            continue;
        }

        info!("Finding stats for {slug}");
        match source.get_funding_stats(slug).await {
            Ok(Some(stats)) => {
                debug!("Stats found for {slug}");
                results.record_funded(slug, stats);
            }
            Ok(None) => {
                debug!("No stats for {slug}");
                results.record_unfunded(slug);
            }
            Err(e) => {
                warn!("Failed to get stats for {slug}: {e}");
                results.record_error(slug, e);
            }
        }

        progress.inc(1);
    }

    results
}

fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    fs::write(path, json)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Writes the three result artifacts into `dir`.
pub fn write_results(results: &ResultSet, dir: &Path, pretty: bool) -> Result<()> {
    fs::create_dir_all(dir)?;
    write_json_file(&dir.join(PROJECTS_FILE), &results.funded, pretty)?;
    write_json_file(&dir.join(STATLESS_FILE), &results.unfunded, pretty)?;
    write_json_file(&dir.join(ERRORS_FILE), &results.errored, pretty)?;
    info!("Results written to: {}", dir.display());
    Ok(())
}

pub fn write_slugs(path: &Path, slugs: &[String], pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_json_file(path, slugs, pretty)
}

pub fn read_slugs(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
