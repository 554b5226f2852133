//! Download command implementation

use std::path::PathBuf;
use std::time::Duration;

use nexus_client::{DownloadSpec, DownloadState, UreqTransport, download};

use crate::cli::DownloadStateArg;
use crate::commands::print_json;
use crate::error::Result;

/// Arguments of the download command
#[derive(Debug, Clone)]
pub struct DownloadArgs {
    pub state: DownloadStateArg,
    pub version: Option<String>,
    pub arch: String,
    pub url: Option<String>,
    pub dest: PathBuf,
    pub timeout: u64,
    pub insecure: bool,
    pub check: bool,
}

impl DownloadArgs {
    fn spec(&self) -> DownloadSpec {
        let state = match self.state {
            DownloadStateArg::Latest => DownloadState::Latest,
            DownloadStateArg::Present => DownloadState::Present,
        };

        let mut spec = DownloadSpec::new(state, self.dest.clone());
        spec.version = self.version.clone().filter(|version| !version.is_empty());
        spec.arch = Some(self.arch.clone());
        spec.url = self.url.clone();
        spec.timeout = Duration::from_secs(self.timeout);
        spec
    }
}

/// Run the download command
pub fn run_download(args: DownloadArgs) -> Result<()> {
    let spec = args.spec();
    // Reject bad combinations before building a transport.
    spec.validate()?;

    let transport = UreqTransport::new(!args.insecure)?;
    let outcome = download::download(&transport, &spec, args.check)?;
    print_json(&outcome)
}
