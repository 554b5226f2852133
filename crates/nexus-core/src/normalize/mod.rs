//! Repository record normalization
//!
//! Turns one raw repository record (legacy or API dialect) into the API
//! dialect. The layers are applied in a fixed order, each step feeding the
//! next:
//!
//! 1. Seed with a copy of the global defaults
//! 2. Merge the type defaults
//! 3. Merge the format defaults
//! 4. Remap legacy fields read from the caller record
//! 5. Merge the caller record
//! 6. Infer `httpClient.authentication.type` (proxy only)
//! 7. Revert an empty authentication block to `null` (proxy only)
//! 8. Strip legacy keys
//!
//! Required fields are validated on the final record.

mod auth;

use std::collections::BTreeSet;

use serde_json::Value;

use crate::dialect::RepositoryDialect;
use crate::error::NormalizationCause;
use crate::merge::merge_values;
use crate::schema::{ResolvedSchema, SchemaRegistry};
use crate::{Error, Result, path};

const PROXY_TYPE: &str = "proxy";
const UNKNOWN_REPOSITORY: &str = "unknown";

/// Normalizes repository records against one resolved schema.
///
/// The schema's default mappings are only ever read; every record gets its
/// own deep copies, so records in a batch never share nested values.
#[derive(Debug, Clone)]
pub struct Normalizer<'a> {
    schema: ResolvedSchema<'a>,
}

impl<'a> Normalizer<'a> {
    pub fn new(schema: ResolvedSchema<'a>) -> Self {
        Self { schema }
    }

    /// Resolve the schema for `repo_type`/`repo_format` and build a normalizer.
    pub fn for_repository(registry: &'a SchemaRegistry, repo_type: &'a str, repo_format: &'a str) -> Result<Self> {
        Ok(Self::new(registry.resolve(repo_type, repo_format)?))
    }

    pub fn schema(&self) -> &ResolvedSchema<'a> {
        &self.schema
    }

    /// Normalize a single repository record.
    ///
    /// The record is never modified. Failures are reported as
    /// [`Error::Normalization`] carrying the record's `name`.
    pub fn normalize(&self, record: &Value) -> Result<Value> {
        let repository = repository_name(record);
        let fail = |cause| Error::Normalization {
            repository: repository.clone(),
            cause,
        };

        tracing::debug!(
            repository = %repository,
            repo_type = self.schema.repo_type,
            repo_format = self.schema.repo_format,
            dialect = %RepositoryDialect::detect(record, &self.schema),
            "Normalizing repository"
        );

        let mut normalized = self.merge_layers(record).map_err(fail)?;
        self.strip_legacy_keys(&mut normalized);
        self.validate_required(&normalized).map_err(fail)?;

        Ok(normalized)
    }

    /// Normalize every record, stopping at the first failure.
    ///
    /// Output order matches input order.
    pub fn normalize_all(&self, records: &[Value]) -> Result<Vec<Value>> {
        records.iter().map(|record| self.normalize(record)).collect()
    }

    /// Normalize every record, collecting each outcome independently.
    pub fn normalize_each(&self, records: &[Value]) -> Vec<Result<Value>> {
        records.iter().map(|record| self.normalize(record)).collect()
    }

    /// Steps 1 to 7.
    fn merge_layers(&self, record: &Value) -> std::result::Result<Value, NormalizationCause> {
        if !record.is_object() {
            return Err(NormalizationCause::Unexpected {
                message: format!("expected a mapping, found {}", value_kind(record)),
            });
        }

        let type_defaults = self.schema.type_defaults_value();

        let mut normalized = Value::Object(self.schema.global_defaults.clone());
        merge_values(&mut normalized, &type_defaults);
        merge_values(&mut normalized, &self.schema.format_defaults_value());
        self.remap_legacy_fields(record, &mut normalized);
        merge_values(&mut normalized, record);

        if self.schema.repo_type == PROXY_TYPE {
            auth::infer_authentication_type(&mut normalized)?;
            auth::revert_empty_authentication(&mut normalized, &type_defaults);
        }

        Ok(normalized)
    }

    fn remap_legacy_fields(&self, record: &Value, normalized: &mut Value) {
        for (legacy_key, target) in &self.schema.legacy_field_map {
            let Some(value) = path::get_present(record, legacy_key) else {
                continue;
            };

            match target.resolve(self.schema.repo_format, self.schema.repo_type) {
                Some(target_path) => {
                    tracing::debug!(legacy_key, target_path, "Remapping legacy field");
                    path::set(normalized, target_path, value.clone());
                }
                None => {
                    // Not an error: the key has no meaning for this pair.
                    tracing::warn!(
                        legacy_key,
                        repo_format = self.schema.repo_format,
                        repo_type = self.schema.repo_type,
                        "No target defined for legacy field; dropping it"
                    );
                }
            }
        }
    }

    /// Step 8: remove every legacy key from wherever it sits.
    ///
    /// A legacy key that is also the target path for this pair is canonical
    /// and kept.
    fn strip_legacy_keys(&self, normalized: &mut Value) {
        let targets: BTreeSet<&str> = self.schema.resolved_targets().map(|(_, target)| target).collect();

        for legacy_key in self.schema.legacy_field_map.keys() {
            if targets.contains(legacy_key) {
                continue;
            }
            path::remove(normalized, legacy_key);
        }
    }

    fn validate_required(&self, normalized: &Value) -> std::result::Result<(), NormalizationCause> {
        match self
            .schema
            .required_fields
            .iter()
            .find(|field| path::get_present(normalized, field).is_none())
        {
            Some(field) => Err(NormalizationCause::MissingRequiredField { field: field.clone() }),
            None => Ok(()),
        }
    }
}

/// Normalize a batch of repository records of one type and format.
///
/// The schema is resolved before any record is touched, so an unregistered
/// pair fails with [`Error::SchemaNotFound`] even for an empty batch. The
/// first failing record aborts the batch.
pub fn normalize_repositories(
    records: &[Value],
    repo_type: &str,
    repo_format: &str,
    registry: &SchemaRegistry,
) -> Result<Vec<Value>> {
    let normalizer = Normalizer::for_repository(registry, repo_type, repo_format)?;
    normalizer.normalize_all(records)
}

/// The record's declared `name`, or `"unknown"`.
fn repository_name(record: &Value) -> String {
    record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_REPOSITORY)
        .to_string()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
