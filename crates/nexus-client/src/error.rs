//! Error types for nexus-client

use std::path::PathBuf;

/// Result type for nexus-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in nexus-client operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "Invalid repository URL '{url}'. Expected: http(s)://hostname[:port]/repository/repo-name"
    )]
    InvalidRepositoryUrl { url: String },

    #[error("{what} cannot be empty")]
    EmptyArgument { what: &'static str },

    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("Disabling TLS certificate validation is not supported")]
    InsecureTransport,

    /// The server answered with a status the operation does not accept
    #[error("Failed to {operation}: HTTP {status} - {message}")]
    Status {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("Failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid version format: {version}")]
    InvalidVersion { version: String },

    #[error("No valid download URLs found for version {version}")]
    NoDownloadCandidates { version: String },

    #[error("Multiple matches found for pattern {pattern}: {}", .matches.join(", "))]
    AmbiguousDownload { pattern: String, matches: Vec<String> },

    #[error("{0}")]
    InvalidArguments(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(what: &'static str, source: serde_json::Error) -> Self {
        Self::Parse { what, source }
    }
}
