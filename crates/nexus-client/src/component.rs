//! Raw component upload, lookup and deletion

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::auth::auth_headers;
use crate::client::{NexusClient, RepositoryDetails};
use crate::transport::{Method, Request, Transport};
use crate::urls::build_upload_url;
use crate::{Error, Result};

const SEARCH_ASSETS_PATH: &str = "/service/rest/v1/search/assets";
const COMPONENTS_PATH: &str = "/service/rest/v1/components";
const BOUNDARY: &str = "nexus-upload-boundary";

#[derive(Debug, Deserialize)]
struct AssetPage {
    #[serde(default)]
    items: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    id: Option<String>,
    path: Option<String>,
}

/// Repository path of an asset: `/<dest>/<name>` with `dest` trimmed of slashes.
pub fn asset_path(name: &str, dest: &str) -> String {
    format!("/{}/{name}", dest.trim_matches('/'))
}

/// Multipart body for a raw upload.
fn multipart_body(name: &str, dest: &str, content: &[u8]) -> Vec<u8> {
    let head = [
        format!("--{BOUNDARY}"),
        "Content-Disposition: form-data; name=\"raw.directory\"".to_string(),
        String::new(),
        dest.trim_matches('/').to_string(),
        format!("--{BOUNDARY}"),
        "Content-Disposition: form-data; name=\"raw.asset1.filename\"".to_string(),
        String::new(),
        name.to_string(),
        format!("--{BOUNDARY}"),
        format!("Content-Disposition: form-data; name=\"raw.asset1\"; filename=\"{name}\""),
        "Content-Type: application/octet-stream".to_string(),
        String::new(),
    ]
    .join("\r\n");

    let mut body = Vec::with_capacity(head.len() + content.len() + BOUNDARY.len() + 8);
    body.extend_from_slice(head.as_bytes());
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

impl<T: Transport> NexusClient<T> {
    /// Find the asset stored at `/<dest>/<name>` in `repository`.
    pub fn find_component(&self, repository: &str, name: &str, dest: &str) -> Result<Option<String>> {
        let full_path = asset_path(name, dest);
        let query = format!("repository={repository}&name={full_path}&sort=version&direction=desc");
        let request = self.request(Method::Get, &format!("{SEARCH_ASSETS_PATH}?{query}"));

        let page: AssetPage = self
            .send_expecting("search for component", &request, &[200])?
            .json("asset search results")?;

        Ok(page
            .items
            .into_iter()
            .find(|asset| asset.path.as_deref() == Some(full_path.as_str()))
            .and_then(|asset| asset.id))
    }

    pub fn delete_component(&self, component_id: &str) -> Result<()> {
        let request = self.request(Method::Delete, &format!("{COMPONENTS_PATH}/{component_id}"));
        self.send_expecting("delete component", &request, &[200, 204])?;
        Ok(())
    }

    /// Upload `content` as `<dest>/<name>` to a raw repository.
    ///
    /// Returns the response status.
    pub fn upload_raw_component(&self, repository: &str, name: &str, dest: &str, content: &[u8]) -> Result<u16> {
        let url = build_upload_url(self.base_url(), repository)?;
        let body = multipart_body(name, dest, content);

        let request = Request::new(Method::Post, url)
            .headers(auth_headers(self.credentials(), true))
            .header("Content-Type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .header("Content-Length", body.len().to_string())
            .timeout(self.timeout())
            .body(body);

        let response = self.send_expecting("upload component", &request, &[200, 201, 204])?;
        Ok(response.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    #[default]
    Present,
    Absent,
}

/// Desired state of one raw component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    pub repository: String,
    pub name: String,
    pub dest: String,
    /// Local file to upload; required when `state` is present
    pub source: Option<PathBuf>,
    pub state: ComponentState,
}

/// Result of reconciling a raw component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentOutcome {
    pub changed: bool,
    pub exists: bool,
    #[serde(rename = "msg")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Bring a raw component to its desired state.
///
/// | state   | exists | action                       |
/// |---------|--------|------------------------------|
/// | present | yes    | none                         |
/// | present | no     | upload                       |
/// | absent  | no     | none                         |
/// | absent  | yes    | delete                       |
///
/// In check mode the outcome reports what would change without mutating.
pub fn reconcile_raw_component<T: Transport>(
    client: &NexusClient<T>,
    spec: &ComponentSpec,
    check_mode: bool,
) -> Result<ComponentOutcome> {
    let RepositoryDetails { format, repo_type } = client.repository_details(&spec.repository)?;
    let component_id = client.find_component(&spec.repository, &spec.name, &spec.dest)?;

    let mut outcome = ComponentOutcome {
        exists: component_id.is_some(),
        component_id: component_id.clone(),
        repository_format: format,
        repository_type: repo_type,
        ..ComponentOutcome::default()
    };

    match (spec.state, component_id) {
        (ComponentState::Present, Some(_)) => {
            outcome.message = "Component already exists in repository".into();
        }
        (ComponentState::Present, None) => {
            let source = spec
                .source
                .as_ref()
                .ok_or_else(|| Error::InvalidArguments("A source file is required when state is 'present'".into()))?;
            if check_mode {
                outcome.changed = true;
                outcome.message = "Component would be uploaded (check mode)".into();
                return Ok(outcome);
            }

            let content = fs::read(source).map_err(|e| Error::io(source, e))?;
            outcome.upload_url = Some(build_upload_url(client.base_url(), &spec.repository)?);
            let status = client.upload_raw_component(&spec.repository, &spec.name, &spec.dest, &content)?;
            tracing::info!(repository = %spec.repository, name = %spec.name, "Uploaded component");

            outcome.changed = true;
            outcome.status_code = Some(status);
            outcome.message = "Component upload successful".into();
        }
        (ComponentState::Absent, None) => {
            outcome.message = "Component does not exist in repository".into();
        }
        (ComponentState::Absent, Some(id)) => {
            outcome.changed = true;
            if check_mode {
                outcome.message = "Component would have been deleted (if not in check mode)".into();
                return Ok(outcome);
            }

            client.delete_component(&id)?;
            tracing::info!(repository = %spec.repository, component_id = %id, "Deleted component");
            outcome.message = "Component deleted successfully".into();
        }
    }

    Ok(outcome)
}
