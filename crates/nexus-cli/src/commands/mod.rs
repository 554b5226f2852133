//! Command implementations for nexus-config

pub mod component;
pub mod download;
pub mod node;
pub mod normalize;
pub mod tokens;

pub use component::{run_component_delete, run_component_upload};
pub use download::{DownloadArgs, run_download};
pub use node::run_node_info;
pub use normalize::run_normalize;
pub use tokens::run_tokens;

use std::time::Duration;

use nexus_client::{Credentials, NexusClient, UreqTransport};
use serde::Serialize;

use crate::cli::{AuthArgs, ConnectionArgs};
use crate::error::Result;

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn credentials(auth: &AuthArgs) -> Credentials {
    Credentials {
        username: auth.username.clone(),
        password: auth.password.clone(),
    }
}

pub(crate) fn client(base_url: &str, auth: &AuthArgs) -> Result<NexusClient<UreqTransport>> {
    let transport = UreqTransport::new(!auth.insecure)?;
    Ok(NexusClient::new(base_url, credentials(auth), transport).with_timeout(Duration::from_secs(auth.timeout)))
}

pub(crate) fn connect(connection: &ConnectionArgs) -> Result<NexusClient<UreqTransport>> {
    client(&connection.url, &connection.auth)
}
