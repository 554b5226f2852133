//! Error types for nexus-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from nexus-core
    #[error(transparent)]
    Core(#[from] nexus_core::Error),

    /// Error from nexus-client
    #[error(transparent)]
    Client(#[from] nexus_client::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_display() {
        assert_eq!(CliError::user("2 of 3 repositories failed").to_string(), "2 of 3 repositories failed");
    }

    #[test]
    fn test_library_errors_are_transparent() {
        let error: CliError = nexus_client::Error::InsecureTransport.into();
        assert_eq!(error.to_string(), nexus_client::Error::InsecureTransport.to_string());
    }
}
