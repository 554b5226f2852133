//! Repository record dialect detection

use std::fmt;

use serde_json::Value;

use crate::path;
use crate::schema::ResolvedSchema;

/// The configuration dialect a repository record is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryDialect {
    /// Canonical nested shape accepted by the REST API
    Api,
    /// Role-variable shape carrying at least one legacy key
    Legacy,
}

impl RepositoryDialect {
    /// Classify `record` against the legacy keys of `schema`.
    ///
    /// A record is legacy as soon as one legacy key resolves to a non-null
    /// value. Keys that map onto themselves are canonical and do not count.
    pub fn detect(record: &Value, schema: &ResolvedSchema<'_>) -> Self {
        let has_legacy_key = schema.legacy_field_map.iter().any(|(legacy_key, target)| {
            target.resolve(schema.repo_format, schema.repo_type) != Some(*legacy_key)
                && path::get_present(record, legacy_key).is_some()
        });

        if has_legacy_key {
            RepositoryDialect::Legacy
        } else {
            RepositoryDialect::Api
        }
    }
}

impl fmt::Display for RepositoryDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryDialect::Api => write!(f, "api"),
            RepositoryDialect::Legacy => write!(f, "legacy"),
        }
    }
}
