//! Component command implementation

use std::path::PathBuf;

use nexus_client::{ComponentSpec, ComponentState, reconcile_raw_component, split_repository_url};

use crate::cli::ComponentArgs;
use crate::commands::{client, print_json};
use crate::error::Result;

/// Run the component upload command
pub fn run_component_upload(target: &ComponentArgs, src: PathBuf) -> Result<()> {
    run(target, ComponentState::Present, Some(src))
}

/// Run the component delete command
pub fn run_component_delete(target: &ComponentArgs) -> Result<()> {
    run(target, ComponentState::Absent, None)
}

fn run(target: &ComponentArgs, state: ComponentState, source: Option<PathBuf>) -> Result<()> {
    let (base_url, spec) = component_spec(target, state, source)?;
    let client = client(&base_url, &target.auth)?;

    let outcome = reconcile_raw_component(&client, &spec, target.check)?;
    print_json(&outcome)
}

/// The instance base URL and the component to reconcile.
fn component_spec(
    target: &ComponentArgs,
    state: ComponentState,
    source: Option<PathBuf>,
) -> Result<(String, ComponentSpec)> {
    let (base_url, repository) = split_repository_url(&target.repository)?;
    let spec = ComponentSpec {
        repository,
        name: target.name.clone(),
        dest: target.dest.clone(),
        source,
        state,
    };
    Ok((base_url, spec))
}
