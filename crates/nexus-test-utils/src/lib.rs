//! Shared test utilities for the nexus-config workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`transport`]: [`MockTransport`] with scripted responses and a request log
//! - [`clock`]: [`ManualClock`] for cache expiry tests
//! - [`fixtures`]: schema registries and a temporary workspace for input files

pub mod clock;
pub mod fixtures;
pub mod transport;

pub use clock::ManualClock;
pub use fixtures::{TestWorkspace, schema_registry};
pub use transport::{MockTransport, empty_response, json_response};
