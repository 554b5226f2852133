//! Node identity and system information

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::NexusClient;
use crate::transport::{Method, Transport};
use crate::Result;

const NODE_PATH: &str = "/service/rest/v1/system/node";
const SYSTEM_INFORMATION_PATH: &str = "/service/rest/beta/system/information";
const UNKNOWN: &str = "unknown";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeBody {
    node_id: Option<String>,
}

/// Node id plus the version and edition advertised in the `Server` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeStatus {
    pub node_id: Option<String>,
    pub version: String,
    pub edition: String,
}

/// Aggregated information about one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeInfo {
    pub node_id: Option<String>,
    pub version: String,
    pub edition: String,
    /// Per system-information section, the entry for this node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

/// Version and edition from a header like `Nexus/3.78.0-14 (OSS)`.
///
/// Either part is `"unknown"` when missing.
pub fn parse_server_header(header: &str) -> (String, String) {
    let Some((_, rest)) = header.split_once("Nexus/") else {
        return (UNKNOWN.to_string(), UNKNOWN.to_string());
    };

    let version = rest.split(' ').next().unwrap_or(UNKNOWN).to_string();
    let edition = header
        .find('(')
        .map(|start| header[start + 1..].trim_end_matches(')').to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());

    (version, edition)
}

impl<T: Transport> NexusClient<T> {
    pub fn node_info(&self) -> Result<NodeStatus> {
        let request = self.request(Method::Get, NODE_PATH);
        let response = self.send_expecting("get node ID", &request, &[200])?;
        let body: NodeBody = response.json("node status")?;
        let (version, edition) = parse_server_header(response.header("Server").unwrap_or(""));

        Ok(NodeStatus {
            node_id: body.node_id,
            version,
            edition,
        })
    }

    /// Full system information from the beta endpoint.
    ///
    /// Any failure yields `None`; the endpoint is optional.
    pub fn system_information(&self) -> Option<Map<String, Value>> {
        let request = self.request(Method::Get, SYSTEM_INFORMATION_PATH);
        match self.send(&request) {
            Ok(response) if response.is_success() => response.json("system information").ok(),
            Ok(response) => {
                tracing::debug!(status = response.status, "System information unavailable");
                None
            }
            Err(err) => {
                tracing::debug!(error = %err, "System information unavailable");
                None
            }
        }
    }
}

/// Select the entries of each section keyed by `node_id`.
fn node_details(node_id: &str, system_information: &Map<String, Value>) -> Map<String, Value> {
    system_information
        .iter()
        .filter_map(|(section, data)| {
            data.get(node_id)
                .map(|entry| (section.clone(), entry.clone()))
        })
        .collect()
}

/// Node status plus this node's share of the system information.
pub fn gather_node_info<T: Transport>(client: &NexusClient<T>) -> Result<NodeInfo> {
    let status = client.node_info()?;
    let details = client
        .system_information()
        .filter(|information| !information.is_empty())
        .map(|information| match &status.node_id {
            Some(node_id) => node_details(node_id, &information),
            None => Map::new(),
        });

    Ok(NodeInfo {
        node_id: status.node_id,
        version: status.version,
        edition: status.edition,
        details,
    })
}
