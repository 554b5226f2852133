//! Node info command implementation

use nexus_client::gather_node_info;

use crate::cli::ConnectionArgs;
use crate::commands::{connect, print_json};
use crate::error::Result;

/// Run the node-info command
pub fn run_node_info(connection: &ConnectionArgs) -> Result<()> {
    let client = connect(connection)?;
    print_json(&gather_node_info(&client)?)
}
