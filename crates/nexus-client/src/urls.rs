//! Endpoint URL helpers

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

static REPOSITORY_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://[^/]+)/repository/([^/]+)$").expect("Invalid repository URL regex")
});

/// Split a repository URL into the instance base URL and repository name.
///
/// Accepts `http(s)://host[:port]/repository/<name>` with an optional
/// trailing slash.
///
/// # Examples
///
/// ```
/// use nexus_client::split_repository_url;
///
/// let (base, name) = split_repository_url("https://nexus.example.com:8443/repository/raw-hosted/").unwrap();
/// assert_eq!(base, "https://nexus.example.com:8443");
/// assert_eq!(name, "raw-hosted");
/// ```
pub fn split_repository_url(url: &str) -> Result<(String, String)> {
    if url.is_empty() {
        return Err(Error::EmptyArgument { what: "Repository URL" });
    }

    let trimmed = url.trim_end_matches('/');
    let captures = REPOSITORY_URL
        .captures(trimmed)
        .ok_or_else(|| Error::InvalidRepositoryUrl { url: url.to_string() })?;

    Ok((captures[1].to_string(), captures[2].to_string()))
}

/// Component upload endpoint for a repository.
pub fn build_upload_url(base_url: &str, repository: &str) -> Result<String> {
    if base_url.is_empty() {
        return Err(Error::EmptyArgument { what: "Base URL" });
    }
    if repository.is_empty() {
        return Err(Error::EmptyArgument { what: "Repository name" });
    }
    Ok(format!(
        "{}/service/rest/v1/components?repository={repository}",
        base_url.trim_end_matches('/')
    ))
}
