//! Configuration normalization for Nexus Repository Manager
//!
//! Reconciles the legacy role-variable dialect and the REST API dialect of a
//! repository manager's configuration into the single shape accepted by its
//! configuration endpoints.
//!
//! - **Path access**: dot-delimited get/set/remove over nested JSON mappings
//! - **Recursive merge**: layered defaults with source-wins leaf semantics
//! - **Schema registry**: global, type-scoped and format-scoped defaults plus
//!   legacy field remapping, keyed by repository (type, format)
//! - **Repository normalization**: defaults, remapping, caller data,
//!   authentication-type inference, validation and legacy cleanup
//! - **Filters**: realms, anonymous access, users, content selectors, LDAP
//!   connections and cleanup policies
//!
//! # Example
//!
//! ```
//! use nexus_core::{SchemaRegistry, normalize_repositories};
//! use serde_json::json;
//!
//! let registry: SchemaRegistry = serde_json::from_value(json!({
//!     "format_defaults": {"maven": {"storage": {"blobStoreName": "default"}}},
//!     "legacy_field_map": {"blob_store": "storage.blobStoreName"},
//!     "schemas": {"hosted": {"maven": {"required_fields": ["name"]}}}
//! }))
//! .unwrap();
//!
//! let records = vec![json!({"name": "releases", "blob_store": "fast"})];
//! let normalized = normalize_repositories(&records, "hosted", "maven", &registry).unwrap();
//! assert_eq!(normalized[0]["storage"]["blobStoreName"], "fast");
//! assert!(normalized[0].get("blob_store").is_none());
//! ```

pub mod dialect;
pub mod error;
pub mod filters;
pub mod merge;
pub mod normalize;
pub mod path;
pub mod schema;
pub mod store;

pub use dialect::RepositoryDialect;
pub use error::{AuthScheme, Error, NormalizationCause, Result};
pub use merge::merge_values;
pub use normalize::{Normalizer, normalize_repositories};
pub use schema::{LegacyTarget, RepositorySchema, ResolvedSchema, SchemaRegistry};
pub use store::ConfigStore;
