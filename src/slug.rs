//! Project identifier handling.
//!
//! Identifiers come in as a bare slug (`babel`), a GitHub-style
//! `owner/repo` pair, or a full URL. Open Collective slugs are matched
//! against the repository name component.

fn segments(identifier: &str) -> Vec<&str> {
    identifier.trim().trim_end_matches('/').split('/').collect()
}

/// Extracts the repo name (last path segment) from an identifier or URL.
///
/// `georgetown-cset/funder-finder` and
/// `https://github.com/georgetown-cset/funder-finder` both give `funder-finder`.
pub fn resolve_slug(identifier: &str) -> String {
    segments(identifier)
        .last()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Extracts the owner (user or organization) from an identifier or URL.
///
/// An identifier without any `/` is already an owner name.
pub fn resolve_owner(identifier: &str) -> String {
    let parts = segments(identifier);
    if parts.len() < 2 {
        return identifier.trim().to_string();
    }
    parts[parts.len() - 2].trim().to_string()
}

/// Rebuilds `owner/repo` from the last two segments of a URL.
pub fn owner_and_repo(url: &str) -> String {
    let parts = segments(url);
    let tail = parts.len().saturating_sub(2);
    parts[tail..].join("/")
}
