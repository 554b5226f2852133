//! Dot-delimited path access over nested JSON mappings
//!
//! Repository records, defaults and legacy field targets all address nested
//! values with dot-separated keys such as `httpClient.authentication.type`.
//! Segments are object keys only; sequences are treated as leaf values.
//!
//! # Examples
//!
//! ```
//! use nexus_core::path::{get, set};
//! use serde_json::json;
//!
//! let mut record = json!({"storage": {"blobStoreName": "default"}});
//! assert_eq!(get(&record, "storage.blobStoreName"), Some(&json!("default")));
//!
//! set(&mut record, "httpClient.authentication.username", json!("bob"));
//! assert_eq!(record["httpClient"]["authentication"]["username"], "bob");
//! ```

use serde_json::{Map, Value};

/// Split a dotted path into its key segments.
///
/// Returns `None` when any segment is empty (`""`, `".a"`, `"a..b"`), since
/// such a path cannot address a mapping key.
///
/// # Examples
///
/// ```
/// use nexus_core::path::segments;
///
/// assert_eq!(segments("proxy.remoteUrl"), Some(vec!["proxy", "remoteUrl"]));
/// assert_eq!(segments(".remoteUrl"), None);
/// ```
pub fn segments(path: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.iter().any(|part| part.is_empty()) {
        return None;
    }
    Some(parts)
}

/// Get the value at `path`.
///
/// Returns `None` the moment a segment is missing or the value being
/// traversed is not a mapping. An explicit `null` is returned as
/// `Some(&Value::Null)`; use [`get_present`] to treat it as absent.
///
/// # Examples
///
/// ```
/// use nexus_core::path::get;
/// use serde_json::json;
///
/// let value = json!({"maven": {"versionPolicy": "RELEASE"}, "online": true});
/// assert_eq!(get(&value, "maven.versionPolicy"), Some(&json!("RELEASE")));
/// assert_eq!(get(&value, "online.nested"), None);
/// assert_eq!(get(&value, "maven.missing"), None);
/// ```
pub fn get<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = data;
    for key in segments(path)? {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}

/// Get the value at `path`, treating an explicit `null` as absent.
pub fn get_present<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    get(data, path).filter(|value| !value.is_null())
}

/// Get the value at `path`, or `default` when it cannot be resolved.
pub fn get_or<'a>(data: &'a Value, path: &str, default: &'a Value) -> &'a Value {
    get(data, path).unwrap_or(default)
}

/// Set `value` at `path`, creating intermediate mappings as needed.
///
/// Any intermediate segment that is missing or holds a non-mapping value
/// (including `null`) is replaced by an empty mapping. A path without a dot
/// assigns directly at the top level. Returns `data` for chaining.
///
/// # Examples
///
/// ```
/// use nexus_core::path::set;
/// use serde_json::json;
///
/// let mut value = json!({"httpClient": {"authentication": null}});
/// set(&mut value, "httpClient.authentication.username", json!("bob"));
/// assert_eq!(value, json!({"httpClient": {"authentication": {"username": "bob"}}}));
/// ```
pub fn set<'a>(data: &'a mut Value, path: &str, value: Value) -> &'a mut Value {
    let Some(keys) = segments(path) else {
        tracing::debug!(path, "Ignoring set on malformed path");
        return data;
    };
    let Some((last, parents)) = keys.split_last() else {
        return data;
    };

    let mut current = ensure_object(data);
    for key in parents {
        let entry = current
            .entry((*key).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = ensure_object(entry);
    }
    current.insert((*last).to_string(), value);

    data
}

/// Remove the value at `path` from its parent mapping.
///
/// Returns the removed value if the path existed, `None` otherwise.
///
/// # Examples
///
/// ```
/// use nexus_core::path::{get, remove};
/// use serde_json::json;
///
/// let mut value = json!({"storage": {"blob_store": "fast", "blobStoreName": "fast"}});
/// assert_eq!(remove(&mut value, "storage.blob_store"), Some(json!("fast")));
/// assert_eq!(get(&value, "storage.blob_store"), None);
/// ```
pub fn remove(data: &mut Value, path: &str) -> Option<Value> {
    let keys = segments(path)?;
    let (last, parents) = keys.split_last()?;

    let mut current = data;
    for key in parents {
        current = current.as_object_mut()?.get_mut(*key)?;
    }
    current.as_object_mut()?.remove(*last)
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        if !value.is_null() {
            tracing::debug!(replaced = %value, "Replacing non-mapping value with a mapping");
        }
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}
