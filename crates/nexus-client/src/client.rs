//! Repository manager REST client

use std::time::Duration;

use serde::Deserialize;

use crate::auth::{Credentials, auth_headers};
use crate::cache::RepositorySettings;
use crate::transport::{DEFAULT_TIMEOUT, Method, Request, Response, Transport};
use crate::{Error, Result};

const REPOSITORIES_PATH: &str = "/service/rest/v1/repositories";
const REPOSITORY_SETTINGS_PATH: &str = "/service/rest/v1/repositorySettings";

/// Format and type of a repository as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryDetails {
    pub format: Option<String>,
    #[serde(rename = "type")]
    pub repo_type: Option<String>,
}

/// Client bound to one repository manager instance.
///
/// Every request carries the JSON headers and, when the credentials are
/// complete, basic authentication.
#[derive(Debug, Clone)]
pub struct NexusClient<T> {
    base_url: String,
    credentials: Credentials,
    transport: T,
    timeout: Duration,
}

impl<T: Transport> NexusClient<T> {
    pub fn new(base_url: impl Into<String>, credentials: Credentials, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            credentials,
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A request for `path` with the default headers.
    pub(crate) fn request(&self, method: Method, path: &str) -> Request {
        Request::new(method, self.url(path))
            .headers(auth_headers(&self.credentials, false))
            .timeout(self.timeout)
    }

    pub(crate) fn send(&self, request: &Request) -> Result<Response> {
        self.transport.send(request)
    }

    /// Send `request` and require one of the `accepted` statuses.
    pub(crate) fn send_expecting(
        &self,
        operation: &'static str,
        request: &Request,
        accepted: &[u16],
    ) -> Result<Response> {
        let response = self.send(request)?;
        if accepted.contains(&response.status) {
            Ok(response)
        } else {
            Err(Error::Status {
                operation,
                status: response.status,
                message: response.text(),
            })
        }
    }

    /// Format and type of the named repository.
    pub fn repository_details(&self, name: &str) -> Result<RepositoryDetails> {
        let request = self.request(Method::Get, &format!("{REPOSITORIES_PATH}/{name}"));
        self.send_expecting("get repository details", &request, &[200])?
            .json("repository details")
    }

    /// Settings of every repository on the instance.
    pub fn repository_settings(&self) -> Result<Vec<RepositorySettings>> {
        let request = self.request(Method::Get, REPOSITORY_SETTINGS_PATH);
        self.send_expecting("list repository settings", &request, &[200])?
            .json("repository settings")
    }
}
