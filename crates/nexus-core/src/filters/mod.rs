//! Filters for the simpler configuration sections
//!
//! Each section accepts either the API dialect or the legacy role-variable
//! dialect. Inputs are decoded at the boundary into an untagged enum that
//! tries the API shape first and the legacy shape second; anything else is
//! rejected with [`Error::UnrecognizedShape`].

pub mod anonymous;
pub mod cleanup;
pub mod ldap;
pub mod realms;
pub mod selectors;
pub mod users;

pub use anonymous::normalize_anonymous_access;
pub use cleanup::{normalize_cleanup_policies, normalize_cleanup_policy};
pub use ldap::normalize_ldap_connections;
pub use realms::normalize_security_realms;
pub use selectors::normalize_content_selectors;
pub use users::normalize_local_users;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Decode `value` into `T`, reporting a shape mismatch for `kind`.
pub(crate) fn decode<T: DeserializeOwned>(kind: &'static str, value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| Error::UnrecognizedShape {
        kind,
        message: e.to_string(),
    })
}

/// Whether a value counts as empty: null, `""`, `[]` or `{}`.
pub(crate) fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Drop top-level entries whose value is empty.
pub(crate) fn strip_empty(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter().filter(|(_, value)| !is_empty_value(value)).collect()
}
