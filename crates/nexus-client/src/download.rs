//! Distributable download
//!
//! Resolves the archive URL for a Nexus release and stores it locally.
//! Candidate file names are probed with HEAD requests, since the naming
//! scheme of the published archives has changed between releases.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::transport::{Method, Request, Transport};
use crate::{Error, Result};

pub const DEFAULT_DOWNLOAD_BASE: &str = "https://download.sonatype.com/nexus/3/";
pub const LATEST_RELEASE_URL: &str = "https://api.github.com/repos/sonatype/nexus-public/releases/latest";
pub const DEFAULT_ARCH: &str = "x86-64";

const RELEASE_PREFIX: &str = "release-";
const ARCHIVE_SUFFIX: &str = ".tar.gz";
const USER_AGENT: &str = concat!("nexus-config/", env!("CARGO_PKG_VERSION"));

static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+-\d+$").expect("Invalid version regex"));

static ARCHIVE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"nexus-.*?(\d+\.\d+\.\d+-\d+)").expect("Invalid archive version regex"));

/// Whether `version` looks like `3.78.0-14`.
pub fn is_valid_version(version: &str) -> bool {
    VERSION.is_match(version)
}

#[derive(Debug, Deserialize)]
struct Release {
    name: Option<String>,
}

/// Latest published version, from the GitHub releases API.
pub fn latest_version<T: Transport>(transport: &T) -> Result<String> {
    let request = Request::get(LATEST_RELEASE_URL)
        .header("Accept", "application/json")
        .header("User-Agent", USER_AGENT);
    let response = transport.send(&request)?;
    if response.status != 200 {
        return Err(Error::Status {
            operation: "fetch latest version",
            status: response.status,
            message: response.text(),
        });
    }

    let release: Release = response.json("release")?;
    let name = release
        .name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::InvalidArguments("No release found in API response".into()))?;
    let version = name.strip_prefix(RELEASE_PREFIX).unwrap_or(&name).to_string();

    if !is_valid_version(&version) {
        return Err(Error::InvalidVersion { version });
    }
    tracing::debug!(version, "Resolved latest version");
    Ok(version)
}

fn arch_variants(arch: &str) -> Vec<&str> {
    let alternate = match arch {
        "x86-64" => Some("x86_64"),
        "x86_64" => Some("x86-64"),
        "aarch64" => Some("aarch_64"),
        "aarch_64" => Some("aarch64"),
        _ => None,
    };
    std::iter::once(arch).chain(alternate).collect()
}

/// Archive names that may exist for a release, most specific first.
pub fn package_names(version: &str, arch: Option<&str>, java_version: Option<&str>) -> Vec<String> {
    let mut names = Vec::new();

    if let Some(arch) = arch {
        for arch in arch_variants(arch) {
            names.extend([
                format!("nexus-{version}-linux-{arch}.tar.gz"),
                format!("nexus-{version}-{arch}-linux.tar.gz"),
                format!("nexus-{arch}-linux-{version}.tar.gz"),
                format!("nexus-linux-{arch}-{version}.tar.gz"),
                format!("nexus-unix-{arch}-{version}.tar.gz"),
                format!("nexus-{arch}-unix-{version}.tar.gz"),
            ]);
        }
    }

    if let Some(java) = java_version {
        names.extend([
            format!("nexus-unix-{version}-{java}.tar.gz"),
            format!("nexus-linux-{version}-{java}.tar.gz"),
            format!("nexus-{version}-unix-{java}.tar.gz"),
            format!("nexus-{version}-linux-{java}.tar.gz"),
        ]);
    }

    names.extend([
        format!("nexus-{version}-unix.tar.gz"),
        format!("nexus-{version}-linux.tar.gz"),
        format!("nexus-unix-{version}.tar.gz"),
        format!("nexus-linux-{version}.tar.gz"),
    ]);
    names
}

/// Whether a HEAD request for `url` succeeds; transport failures count as no.
fn url_exists<T: Transport>(transport: &T, url: &str) -> bool {
    match transport.send(&Request::head(url).header("User-Agent", USER_AGENT)) {
        Ok(response) => response.is_success(),
        Err(err) => {
            tracing::debug!(url, error = %err, "Candidate not reachable");
            false
        }
    }
}

/// Candidate URLs under `base_url` that answer a HEAD request.
pub fn valid_download_urls<T: Transport>(
    transport: &T,
    version: &str,
    arch: Option<&str>,
    java_version: Option<&str>,
    base_url: &str,
) -> Result<Vec<String>> {
    if !is_valid_version(version) {
        return Err(Error::InvalidVersion {
            version: version.to_string(),
        });
    }

    let urls: Vec<String> = package_names(version, arch, java_version)
        .into_iter()
        .map(|name| format!("{base_url}{name}"))
        .filter(|url| url_exists(transport, url))
        .collect();

    if urls.is_empty() {
        return Err(Error::NoDownloadCandidates {
            version: version.to_string(),
        });
    }
    Ok(urls)
}

/// Pick one URL from the validated candidates.
///
/// Patterns are tried in order: architecture-specific, then
/// `nexus-<v>-(linux|unix)`, then `nexus-(linux|unix)-<v>`, then
/// `nexus-<v>-*-(linux|unix)`. The first pattern with matches decides, and
/// more than one match is an error.
pub fn select_download_url(valid_urls: &[String], version: &str, arch: Option<&str>) -> Result<String> {
    let escaped = regex::escape(version);
    let mut patterns = Vec::with_capacity(4);
    if let Some(arch) = arch {
        patterns.push(format!(r"nexus-{}-.*?{escaped}\.tar\.gz$", regex::escape(arch)));
    }
    patterns.push(format!(r"nexus-{escaped}-(linux|unix)\.tar\.gz$"));
    patterns.push(format!(r"nexus-(linux|unix)-{escaped}\.tar\.gz$"));
    patterns.push(format!(r"nexus-{escaped}-.*?-(linux|unix)\.tar\.gz$"));

    for pattern in patterns {
        let regex = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
        let matches: Vec<&String> = valid_urls.iter().filter(|url| regex.is_match(url)).collect();
        match matches.as_slice() {
            [] => continue,
            [only] => return Ok((*only).clone()),
            _ => {
                return Err(Error::AmbiguousDownload {
                    pattern,
                    matches: matches.iter().map(|url| (*url).clone()).collect(),
                });
            }
        }
    }

    match valid_urls {
        [only] => Ok(only.clone()),
        _ => Err(Error::NoDownloadCandidates {
            version: version.to_string(),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadState {
    Latest,
    Present,
}

/// What to download and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSpec {
    pub state: DownloadState,
    pub version: Option<String>,
    pub arch: Option<String>,
    /// Either a direct `.tar.gz` URL or a base URL to probe
    pub url: Option<String>,
    pub dest: PathBuf,
    pub timeout: Duration,
}

impl DownloadSpec {
    pub fn new(state: DownloadState, dest: impl Into<PathBuf>) -> Self {
        Self {
            state,
            version: None,
            arch: Some(DEFAULT_ARCH.to_string()),
            url: None,
            dest: dest.into(),
            timeout: Duration::from_secs(120),
        }
    }

    fn is_direct_url(&self) -> bool {
        self.url
            .as_deref()
            .is_some_and(|url| url.to_lowercase().ends_with(ARCHIVE_SUFFIX))
    }

    /// Check parameter combinations, reporting the first violation.
    pub fn validate(&self) -> Result<()> {
        let direct = self.is_direct_url();
        let has_version = self.version.as_deref().is_some_and(|v| !v.is_empty());

        if self.url.is_some() && self.state != DownloadState::Present {
            return Err(Error::InvalidArguments(
                "URL can only be used when state is 'present'".into(),
            ));
        }
        if self.url.is_some() && !direct && !has_version {
            return Err(Error::InvalidArguments(
                "Version must be provided when using a custom URL that doesn't point directly to a .tar.gz file"
                    .into(),
            ));
        }
        if self.state == DownloadState::Present && !has_version && !direct {
            return Err(Error::InvalidArguments(
                "When state is 'present', the 'version' parameter must be provided unless URL points directly to a .tar.gz file."
                    .into(),
            ));
        }
        Ok(())
    }
}

/// The archive URL and the version it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    pub url: String,
    pub version: String,
}

/// Work out which archive to download.
pub fn resolve_download<T: Transport>(transport: &T, spec: &DownloadSpec) -> Result<ResolvedDownload> {
    spec.validate()?;
    let arch = spec.arch.as_deref();

    if let Some(url) = spec.url.as_deref() {
        if spec.is_direct_url() {
            if !url_exists(transport, url) {
                return Err(Error::InvalidArguments(format!("The provided URL {url} is not accessible")));
            }
            let version = ARCHIVE_VERSION
                .captures(file_name(url))
                .map(|captures| captures[1].to_string())
                .unwrap_or_else(|| "custom".to_string());
            return Ok(ResolvedDownload {
                url: url.to_string(),
                version,
            });
        }

        let version = spec.version.clone().unwrap_or_default();
        let base_url = format!("{}/", url.trim_end_matches('/'));
        let urls = valid_download_urls(transport, &version, arch, None, &base_url)?;
        let url = match urls.as_slice() {
            [only] => only.clone(),
            _ => select_download_url(&urls, &version, arch)?,
        };
        return Ok(ResolvedDownload { url, version });
    }

    let version = match spec.state {
        DownloadState::Present => spec.version.clone().unwrap_or_default(),
        DownloadState::Latest => latest_version(transport)?,
    };
    let urls = valid_download_urls(transport, &version, arch, None, DEFAULT_DOWNLOAD_BASE)?;
    let url = select_download_url(&urls, &version, arch)?;
    Ok(ResolvedDownload { url, version })
}

fn file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Local path for a downloaded URL: `<dest>/<last url segment>`.
pub fn destination_path(url: &str, dest: &Path) -> PathBuf {
    dest.join(file_name(url))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOutcome {
    pub changed: bool,
    pub download_url: String,
    pub version: String,
    pub destination: PathBuf,
    pub status_code: Option<u16>,
    #[serde(rename = "msg")]
    pub message: String,
}

/// Resolve and download the archive unless it is already present.
pub fn download<T: Transport>(transport: &T, spec: &DownloadSpec, check_mode: bool) -> Result<DownloadOutcome> {
    let ResolvedDownload { url, version } = resolve_download(transport, spec)?;
    let destination = destination_path(&url, &spec.dest);

    let mut outcome = DownloadOutcome {
        changed: false,
        download_url: url,
        version,
        destination,
        status_code: None,
        message: String::new(),
    };

    if outcome.destination.exists() {
        outcome.status_code = Some(200);
        outcome.message = "File already exists".into();
        return Ok(outcome);
    }
    if check_mode {
        outcome.changed = true;
        outcome.message = "File would be downloaded, if not in check mode".into();
        return Ok(outcome);
    }

    fs::create_dir_all(&spec.dest).map_err(|e| Error::io(&spec.dest, e))?;

    let request = Request::new(Method::Get, outcome.download_url.as_str())
        .header("User-Agent", USER_AGENT)
        .timeout(spec.timeout);
    let response = transport.send(&request)?;
    if response.status != 200 {
        return Err(Error::Status {
            operation: "download file",
            status: response.status,
            message: response.text(),
        });
    }

    fs::write(&outcome.destination, &response.body).map_err(|e| Error::io(&outcome.destination, e))?;
    tracing::info!(url = %outcome.download_url, destination = ?outcome.destination, "Downloaded archive");

    outcome.changed = true;
    outcome.status_code = Some(response.status);
    outcome.message = "File downloaded successfully".into();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("3.78.0-14", true)]
    #[case("3.0.0-1", true)]
    #[case("3.78.0", false)]
    #[case("v3.78.0-14", false)]
    #[case("3.78.0-14-unix", false)]
    #[case("", false)]
    fn test_is_valid_version(#[case] version: &str, #[case] valid: bool) {
        assert_eq!(is_valid_version(version), valid);
    }

    #[test]
    fn test_package_names_order() {
        let names = package_names("3.78.0-14", Some("aarch64"), None);
        assert_eq!(names.len(), 16);
        assert_eq!(names[0], "nexus-3.78.0-14-linux-aarch64.tar.gz");
        assert_eq!(names[6], "nexus-3.78.0-14-linux-aarch_64.tar.gz");
        assert_eq!(&names[12..], &[
            "nexus-3.78.0-14-unix.tar.gz",
            "nexus-3.78.0-14-linux.tar.gz",
            "nexus-unix-3.78.0-14.tar.gz",
            "nexus-linux-3.78.0-14.tar.gz",
        ]);
    }

    #[test]
    fn test_package_names_java_variant() {
        let names = package_names("3.61.0-02", None, Some("java11"));
        assert_eq!(names[0], "nexus-unix-3.61.0-02-java11.tar.gz");
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_select_prefers_arch() {
        let urls = vec![
            format!("{DEFAULT_DOWNLOAD_BASE}nexus-3.78.0-14-unix.tar.gz"),
            format!("{DEFAULT_DOWNLOAD_BASE}nexus-x86-64-linux-3.78.0-14.tar.gz"),
        ];
        assert_eq!(select_download_url(&urls, "3.78.0-14", Some("x86-64")).unwrap(), urls[1]);
    }

    #[test]
    fn test_select_falls_back_to_standard_package() {
        let urls = vec![
            format!("{DEFAULT_DOWNLOAD_BASE}nexus-3.61.0-02-unix.tar.gz"),
            format!("{DEFAULT_DOWNLOAD_BASE}nexus-unix-3.61.0-02.tar.gz"),
        ];
        assert_eq!(select_download_url(&urls, "3.61.0-02", Some("x86-64")).unwrap(), urls[0]);
    }

    #[test]
    fn test_select_ambiguous() {
        let urls = vec![
            format!("{DEFAULT_DOWNLOAD_BASE}nexus-3.61.0-02-unix.tar.gz"),
            format!("{DEFAULT_DOWNLOAD_BASE}nexus-3.61.0-02-linux.tar.gz"),
        ];
        let err = select_download_url(&urls, "3.61.0-02", None).unwrap_err();
        assert!(matches!(err, Error::AmbiguousDownload { ref matches, .. } if matches.len() == 2));
    }

    #[test]
    fn test_select_single_unmatched_candidate() {
        let urls = vec!["https://mirror/nexus-3.61.0-02-unix-java11.tar.gz".to_string()];
        assert_eq!(select_download_url(&urls, "3.61.0-02", None).unwrap(), urls[0]);
    }

    #[rstest]
    #[case(DownloadState::Latest, None, Some("https://mirror/nexus.tar.gz"), "URL can only be used")]
    #[case(DownloadState::Present, None, Some("https://mirror/files"), "Version must be provided")]
    #[case(DownloadState::Present, None, None, "the 'version' parameter must be provided")]
    fn test_validate_rejects(
        #[case] state: DownloadState,
        #[case] version: Option<&str>,
        #[case] url: Option<&str>,
        #[case] message: &str,
    ) {
        let mut spec = DownloadSpec::new(state, "/tmp");
        spec.version = version.map(String::from);
        spec.url = url.map(String::from);
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains(message), "{err}");
    }

    #[test]
    fn test_validate_accepts_direct_url_without_version() {
        let mut spec = DownloadSpec::new(DownloadState::Present, "/tmp");
        spec.url = Some("https://mirror/NEXUS-3.78.0-14-UNIX.TAR.GZ".into());
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_destination_path() {
        assert_eq!(
            destination_path("https://mirror/dir/nexus-3.78.0-14-unix.tar.gz", Path::new("/opt/dl")),
            PathBuf::from("/opt/dl/nexus-3.78.0-14-unix.tar.gz")
        );
    }
}
