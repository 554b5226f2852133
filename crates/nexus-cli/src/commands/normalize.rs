//! Normalize command implementation

use std::path::Path;

use colored::Colorize;
use nexus_core::filters::{
    normalize_anonymous_access, normalize_cleanup_policies, normalize_content_selectors, normalize_ldap_connections,
    normalize_local_users, normalize_security_realms,
};
use nexus_core::{ConfigStore, Normalizer, SchemaRegistry};
use serde_json::{Map, Value};

use crate::cli::NormalizeTarget;
use crate::commands::print_json;
use crate::error::{CliError, Result};

/// Run the normalize command
pub fn run_normalize(target: NormalizeTarget) -> Result<()> {
    let output = normalize(&target)?;
    print_json(&output)
}

/// The normalized JSON for `target`.
pub fn normalize(target: &NormalizeTarget) -> Result<Value> {
    let store = ConfigStore::new();

    let output = match target {
        NormalizeTarget::Repositories {
            schema,
            repo_type,
            repo_format,
            collect_errors,
            records,
        } => {
            let registry = SchemaRegistry::load(schema)?;
            let records: Vec<Value> = store.load(records)?;
            let normalizer = Normalizer::for_repository(&registry, repo_type, repo_format)?;
            let normalized = if *collect_errors {
                collect(&normalizer, &records)?
            } else {
                normalizer.normalize_all(&records)?
            };
            Value::Array(normalized)
        }
        NormalizeTarget::Realms { mappings, value } => {
            let mappings: Map<String, Value> = store.load(mappings)?;
            let value: Value = store.load(value)?;
            let realms = normalize_security_realms(&value, &mappings)?;
            Value::from(realms)
        }
        NormalizeTarget::AnonymousAccess { file } => normalize_anonymous_access(&store.load(file)?)?,
        NormalizeTarget::Users { file } => Value::Array(normalize_local_users(&load_list(&store, file)?)?),
        NormalizeTarget::Selectors { file } => Value::Array(normalize_content_selectors(&load_list(&store, file)?)?),
        NormalizeTarget::Ldap { file } => Value::Array(normalize_ldap_connections(&load_list(&store, file)?)?),
        NormalizeTarget::CleanupPolicies { file } => {
            Value::Array(normalize_cleanup_policies(&load_list(&store, file)?)?)
        }
    };

    Ok(output)
}

fn load_list(store: &ConfigStore, path: &Path) -> Result<Vec<Value>> {
    Ok(store.load(path)?)
}

/// Normalize every record, reporting each failure on stderr.
///
/// Fails after all records were tried if any of them failed.
fn collect(normalizer: &Normalizer<'_>, records: &[Value]) -> Result<Vec<Value>> {
    let mut normalized = Vec::with_capacity(records.len());
    let mut failures = 0;

    for outcome in normalizer.normalize_each(records) {
        match outcome {
            Ok(record) => normalized.push(record),
            Err(e) => {
                eprintln!("{}: {}", "error".red().bold(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(CliError::user(format!(
            "{failures} of {} repositories failed to normalize",
            records.len()
        )));
    }
    Ok(normalized)
}
