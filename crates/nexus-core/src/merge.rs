//! Recursive merge of nested JSON mappings
//!
//! Defaults are layered global < type < format < remapped legacy values <
//! caller data. Each layer is merged into the accumulated result with
//! [`merge_values`], so the later layer wins every leaf conflict while
//! sibling keys of shared nested mappings survive.

use serde_json::Value;

/// Recursively merge `source` into `destination`.
///
/// If both values are mappings, every key of `source` is merged into
/// `destination`, recursing where both sides hold a mapping at that key.
/// Otherwise `source` replaces `destination` (scalars, sequences and `null`
/// are leaves).
///
/// # Examples
///
/// ```
/// use nexus_core::merge_values;
/// use serde_json::json;
///
/// let mut destination = json!({"storage": {"blobStoreName": "default", "strictContentTypeValidation": true}});
/// merge_values(&mut destination, &json!({"storage": {"blobStoreName": "fast"}}));
/// assert_eq!(
///     destination,
///     json!({"storage": {"blobStoreName": "fast", "strictContentTypeValidation": true}})
/// );
/// ```
pub fn merge_values(destination: &mut Value, source: &Value) {
    match (destination, source) {
        (Value::Object(destination_map), Value::Object(source_map)) => {
            for (key, source_value) in source_map {
                if let Some(destination_value) = destination_map.get_mut(key) {
                    merge_values(destination_value, source_value);
                } else {
                    destination_map.insert(key.clone(), source_value.clone());
                }
            }
        }
        (destination, source) => {
            *destination = source.clone();
        }
    }
}

/// Return a copy of `base` with `overlay` merged on top.
pub fn merged(base: &Value, overlay: &Value) -> Value {
    let mut result = base.clone();
    merge_values(&mut result, overlay);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_merge_objects_recursively() {
        let mut base = json!({
            "a": 1,
            "b": { "x": 10, "y": 20 }
        });
        let other = json!({
            "b": { "y": 25, "z": 30 },
            "c": 3
        });

        merge_values(&mut base, &other);

        assert_eq!(base, json!({"a": 1, "b": {"x": 10, "y": 25, "z": 30}, "c": 3}));
    }

    #[test]
    fn test_merge_null_source_replaces_mapping() {
        let mut base = json!({"httpClient": {"authentication": {"type": "username"}}});
        merge_values(&mut base, &json!({"httpClient": {"authentication": null}}));
        assert_eq!(base, json!({"httpClient": {"authentication": null}}));
    }

    #[test]
    fn test_merge_mapping_over_null() {
        let mut base = json!({"httpClient": {"authentication": null}});
        merge_values(
            &mut base,
            &json!({"httpClient": {"authentication": {"username": "u"}}}),
        );
        assert_eq!(base["httpClient"]["authentication"]["username"], "u");
    }

    #[test]
    fn test_merge_sequences_are_leaves() {
        let mut base = json!({"group": {"memberNames": ["a", "b"]}});
        merge_values(&mut base, &json!({"group": {"memberNames": ["c"]}}));
        assert_eq!(base["group"]["memberNames"], json!(["c"]));
    }

    #[test]
    fn test_merged_leaves_inputs_untouched() {
        let base = json!({"online": true});
        let overlay = json!({"online": false});
        let result = merged(&base, &overlay);
        assert_eq!(result["online"], false);
        assert_eq!(base["online"], true);
    }
}
