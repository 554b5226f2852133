//! REST operations against a Nexus Repository Manager instance
//!
//! All calls go through the [`Transport`] trait; [`UreqTransport`] is the
//! blocking implementation used by the CLI, and tests substitute a scripted
//! transport.
//!
//! - [`reconcile_raw_component`]: idempotent upload or deletion of a raw asset
//! - [`reconcile_user_tokens`]: user token capability settings
//! - [`gather_node_info`]: node id, version, edition and system details
//! - [`RepositoryCache`]: time-bounded repository settings lookup
//! - [`download::download`]: resolve and fetch a release archive

pub mod auth;
pub mod cache;
pub mod client;
pub mod component;
pub mod download;
pub mod error;
pub mod node;
pub mod tokens;
pub mod transport;
pub mod urls;

pub use auth::{Credentials, auth_headers};
pub use cache::{Clock, RepositoryCache, RepositorySettings, RepositorySource, SystemClock};
pub use client::{NexusClient, RepositoryDetails};
pub use component::{ComponentOutcome, ComponentSpec, ComponentState, reconcile_raw_component};
pub use download::{DownloadOutcome, DownloadSpec, DownloadState};
pub use error::{Error, Result};
pub use node::{NodeInfo, NodeStatus, gather_node_info};
pub use tokens::{TokenOutcome, TokenState, UserTokenSettings, reconcile_user_tokens};
pub use transport::{Method, Request, Response, Transport, UreqTransport};
pub use urls::{build_upload_url, split_repository_url};
