//! Schema registry for repository normalization
//!
//! A registry bundles the default mappings and legacy field mappings for
//! every supported repository (type, format) pair. It is usually loaded from
//! a TOML, JSON or YAML file:
//!
//! ```yaml
//! global_defaults:
//!   online: true
//! type_defaults:
//!   proxy:
//!     httpClient: { blocked: false, autoBlock: true, authentication: null }
//! format_defaults:
//!   maven:
//!     storage: { blobStoreName: default }
//! legacy_field_map:
//!   blob_store: storage.blobStoreName
//!   version_policy:
//!     maven: { proxy: maven.versionPolicy, hosted: maven.versionPolicy }
//! schemas:
//!   proxy:
//!     maven: { required_fields: [name, proxy.remoteUrl] }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::ConfigStore;
use crate::{Error, Result};

/// Where a legacy field lands in the API dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyTarget {
    /// A fixed dot-path, e.g. `storage.blobStoreName`
    Path(String),
    /// A dot-path that depends on the repository, keyed by format then type
    Contextual(BTreeMap<String, BTreeMap<String, String>>),
}

impl LegacyTarget {
    /// Resolve the concrete target path for a repository format and type.
    ///
    /// Returns `None` for a contextual target that defines no path for the
    /// combination.
    pub fn resolve(&self, repo_format: &str, repo_type: &str) -> Option<&str> {
        match self {
            LegacyTarget::Path(path) => Some(path),
            LegacyTarget::Contextual(by_format) => by_format
                .get(repo_format)
                .and_then(|by_type| by_type.get(repo_type))
                .map(String::as_str),
        }
    }
}

/// Per-(type, format) schema entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySchema {
    /// Dot-paths that must resolve to a non-null value after normalization
    pub required_fields: Vec<String>,

    /// Legacy mappings for this pair only; entries override the registry-wide
    /// `legacy_field_map`
    pub field_map: BTreeMap<String, LegacyTarget>,
}

/// Every default and legacy mapping known for repository normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaRegistry {
    /// Applied to every repository
    pub global_defaults: Map<String, Value>,

    /// Keyed by repository type (`proxy`, `hosted`, `group`)
    pub type_defaults: BTreeMap<String, Map<String, Value>>,

    /// Keyed by repository format (`maven`, `docker`, `raw`, ...)
    pub format_defaults: BTreeMap<String, Map<String, Value>>,

    /// Legacy dot-path to API target
    pub legacy_field_map: BTreeMap<String, LegacyTarget>,

    /// Registered pairs, keyed by type then format
    pub schemas: BTreeMap<String, BTreeMap<String, RepositorySchema>>,
}

impl SchemaRegistry {
    /// Load a registry from a `.toml`, `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        ConfigStore::new().load(path.as_ref())
    }

    /// Build a registry from an in-memory JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Check whether a (type, format) pair is registered.
    pub fn contains(&self, repo_type: &str, repo_format: &str) -> bool {
        self.schemas
            .get(repo_type)
            .is_some_and(|formats| formats.contains_key(repo_format))
    }

    /// Resolve the schema for a repository type and format.
    ///
    /// Fails with [`Error::SchemaNotFound`] when the pair is not registered;
    /// no partial substitution from other pairs takes place.
    pub fn resolve<'a>(&'a self, repo_type: &'a str, repo_format: &'a str) -> Result<ResolvedSchema<'a>> {
        let schema = self
            .schemas
            .get(repo_type)
            .and_then(|formats| formats.get(repo_format))
            .ok_or_else(|| Error::SchemaNotFound {
                repo_type: repo_type.to_string(),
                repo_format: repo_format.to_string(),
            })?;

        let mut legacy_field_map: BTreeMap<&'a str, &'a LegacyTarget> = self
            .legacy_field_map
            .iter()
            .map(|(key, target)| (key.as_str(), target))
            .collect();
        for (key, target) in &schema.field_map {
            legacy_field_map.insert(key.as_str(), target);
        }

        Ok(ResolvedSchema {
            repo_type,
            repo_format,
            global_defaults: &self.global_defaults,
            type_defaults: self.type_defaults.get(repo_type),
            format_defaults: self.format_defaults.get(repo_format),
            legacy_field_map,
            required_fields: &schema.required_fields,
        })
    }
}

/// The schema bundle governing one (type, format) combination.
#[derive(Debug, Clone)]
pub struct ResolvedSchema<'a> {
    pub repo_type: &'a str,
    pub repo_format: &'a str,
    pub global_defaults: &'a Map<String, Value>,
    pub type_defaults: Option<&'a Map<String, Value>>,
    pub format_defaults: Option<&'a Map<String, Value>>,
    pub legacy_field_map: BTreeMap<&'a str, &'a LegacyTarget>,
    pub required_fields: &'a [String],
}

impl ResolvedSchema<'_> {
    /// Type defaults as a JSON value (empty mapping for an unknown type).
    pub fn type_defaults_value(&self) -> Value {
        Value::Object(self.type_defaults.cloned().unwrap_or_default())
    }

    /// Format defaults as a JSON value (empty mapping for an unknown format).
    pub fn format_defaults_value(&self) -> Value {
        Value::Object(self.format_defaults.cloned().unwrap_or_default())
    }

    /// Concrete target paths of every legacy key for this pair.
    ///
    /// Contextual targets without an entry for this pair are omitted.
    pub fn resolved_targets(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.legacy_field_map.iter().filter_map(move |(legacy_key, target)| {
            target
                .resolve(self.repo_format, self.repo_type)
                .map(|path| (*legacy_key, path))
        })
    }
}
