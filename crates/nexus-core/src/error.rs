//! Error types for nexus-core

use std::fmt;
use std::path::PathBuf;

/// Result type for nexus-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Authentication scheme inferred from the credential fields of a proxy
/// repository's `httpClient.authentication` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `username` + `password`
    Username,
    /// `username` + `password` + `ntlmHost` + `ntlmDomain`
    Ntlm,
}

impl AuthScheme {
    /// Value written to `httpClient.authentication.type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Username => "username",
            AuthScheme::Ntlm => "ntlm",
        }
    }

    /// Fields that must all be present for this scheme.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            AuthScheme::Username => &["username", "password"],
            AuthScheme::Ntlm => &["username", "password", "ntlmHost", "ntlmDomain"],
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthScheme::Username => write!(f, "username"),
            AuthScheme::Ntlm => write!(f, "NTLM"),
        }
    }
}

/// The specific reason a single repository record failed to normalize.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationCause {
    /// Credentials present but a companion field is missing
    #[error("incomplete {scheme} authentication settings (missing: {})", .missing.join(", "))]
    IncompleteAuthentication {
        scheme: AuthScheme,
        missing: Vec<String>,
    },

    /// A schema-declared required field is absent after normalization
    #[error("missing required field: {field}")]
    MissingRequiredField { field: String },

    /// Any other failure, such as a record that is not a mapping
    #[error("{message}")]
    Unexpected { message: String },
}

/// Errors that can occur in nexus-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No schema registered for the (type, format) pair
    #[error("No schema defined for repository type '{repo_type}' and format '{repo_format}'")]
    SchemaNotFound {
        repo_type: String,
        repo_format: String,
    },

    /// A repository record could not be normalized
    #[error("normalization failed for repository '{repository}': {cause}")]
    Normalization {
        repository: String,
        #[source]
        cause: NormalizationCause,
    },

    /// Input matched neither the API nor the legacy shape
    #[error("Unsupported format for {kind}: {message}")]
    UnrecognizedShape { kind: &'static str, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The normalization cause, if this is a per-record failure.
    pub fn cause(&self) -> Option<&NormalizationCause> {
        match self {
            Error::Normalization { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// The repository name a per-record failure was raised for.
    pub fn repository(&self) -> Option<&str> {
        match self {
            Error::Normalization { repository, .. } => Some(repository),
            _ => None,
        }
    }
}
