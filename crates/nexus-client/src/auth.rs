//! Request headers and basic authentication

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Basic-auth credentials; either half may be missing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The `Authorization` value, when both username and password are non-empty.
    pub fn basic_authorization(&self) -> Option<String> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(format!("Basic {}", STANDARD.encode(format!("{username}:{password}"))))
            }
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .finish()
    }
}

/// Default headers for an API call.
///
/// JSON in both directions, or `multipart/form-data` for uploads, plus basic
/// authentication when the credentials are complete.
pub fn auth_headers(credentials: &Credentials, for_upload: bool) -> Vec<(String, String)> {
    let content_type = if for_upload {
        "multipart/form-data"
    } else {
        "application/json"
    };

    let mut headers = vec![
        ("accept".to_string(), "application/json".to_string()),
        ("Content-Type".to_string(), content_type.to_string()),
    ];
    if let Some(authorization) = credentials.basic_authorization() {
        headers.push(("Authorization".to_string(), authorization));
    }
    headers
}
