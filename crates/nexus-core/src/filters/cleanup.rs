//! Cleanup policies
//!
//! Older configurations nest criteria under `criteria` (or put `regexKey` and
//! `isPrerelease` at the top level); the API wants flat `criteria*` keys.

use serde_json::{Map, Value};

use crate::{Error, Result};

const CRITERIA: &str = "criteria";
const REGEX_KEY: &str = "regexKey";
const PRERELEASE_KEY: &str = "isPrerelease";

/// API key for a nested criterion.
fn criteria_key(key: &str) -> String {
    match key {
        REGEX_KEY => "criteriaAssetRegex".to_string(),
        PRERELEASE_KEY => "criteriaReleaseType".to_string(),
        _ => {
            let mut chars = key.chars();
            match chars.next() {
                Some(first) => format!("{CRITERIA}{}{}", first.to_uppercase(), chars.as_str()),
                None => CRITERIA.to_string(),
            }
        }
    }
}

fn unrecognized(message: String) -> Error {
    Error::UnrecognizedShape { kind: "cleanup policy", message }
}

/// Flatten one cleanup policy.
///
/// # Examples
///
/// ```
/// use nexus_core::filters::normalize_cleanup_policy;
/// use serde_json::json;
///
/// let policy = normalize_cleanup_policy(&json!({
///     "name": "stale",
///     "criteria": {"lastDownloaded": 30, "regexKey": ".*-SNAPSHOT.*"}
/// }))
/// .unwrap();
/// assert_eq!(policy["criteriaLastDownloaded"], 30);
/// assert_eq!(policy["criteriaAssetRegex"], ".*-SNAPSHOT.*");
/// assert!(policy.get("criteria").is_none());
/// ```
pub fn normalize_cleanup_policy(policy: &Value) -> Result<Map<String, Value>> {
    let policy = policy
        .as_object()
        .ok_or_else(|| unrecognized(format!("expected a mapping, found {policy}")))?;

    let mut normalized: Map<String, Value> = policy
        .iter()
        .filter(|(key, _)| key.as_str() != CRITERIA)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    match policy.get(CRITERIA) {
        Some(Value::Object(criteria)) => {
            for (key, value) in criteria {
                normalized.insert(criteria_key(key), value.clone());
            }
        }
        Some(Value::Null) | None => {}
        Some(other) => return Err(unrecognized(format!("'criteria' must be a mapping, found {other}"))),
    }

    for legacy in [REGEX_KEY, PRERELEASE_KEY] {
        if let Some(value) = policy.get(legacy) {
            normalized.insert(criteria_key(legacy), value.clone());
        }
    }

    for residual in [CRITERIA, REGEX_KEY, PRERELEASE_KEY] {
        normalized.shift_remove(residual);
    }

    Ok(normalized)
}

/// Flatten every policy, failing on the first malformed one.
pub fn normalize_cleanup_policies(policies: &[Value]) -> Result<Vec<Value>> {
    policies
        .iter()
        .map(|policy| normalize_cleanup_policy(policy).map(Value::Object))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("regexKey", "criteriaAssetRegex")]
    #[case("isPrerelease", "criteriaReleaseType")]
    #[case("lastBlobUpdated", "criteriaLastBlobUpdated")]
    #[case("lastDownloaded", "criteriaLastDownloaded")]
    #[case("", "criteria")]
    fn test_criteria_key(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(criteria_key(key), expected);
    }

    #[test]
    fn test_nested_criteria_flattened() {
        let policy = normalize_cleanup_policy(&json!({
            "name": "snapshots",
            "format": "maven2",
            "notes": "",
            "criteria": {"lastBlobUpdated": 7, "isPrerelease": "PRERELEASES"}
        }))
        .unwrap();

        assert_eq!(
            Value::Object(policy),
            json!({
                "name": "snapshots",
                "format": "maven2",
                "notes": "",
                "criteriaLastBlobUpdated": 7,
                "criteriaReleaseType": "PRERELEASES"
            })
        );
    }

    #[test]
    fn test_top_level_legacy_keys_mapped() {
        let policy = normalize_cleanup_policy(&json!({
            "name": "regex",
            "regexKey": "^tmp/.*",
            "isPrerelease": "RELEASES"
        }))
        .unwrap();

        assert_eq!(policy["criteriaAssetRegex"], "^tmp/.*");
        assert_eq!(policy["criteriaReleaseType"], "RELEASES");
        assert!(!policy.contains_key("regexKey"));
        assert!(!policy.contains_key("isPrerelease"));
    }

    #[test]
    fn test_api_policy_unchanged() {
        let policy = json!({"name": "old", "format": "npm", "criteriaLastDownloaded": 90});
        assert_eq!(Value::Object(normalize_cleanup_policy(&policy).unwrap()), policy);
    }

    #[test]
    fn test_non_mapping_criteria_rejected() {
        let err = normalize_cleanup_policy(&json!({"name": "bad", "criteria": [1, 2]})).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedShape { kind: "cleanup policy", .. }));
    }

    #[test]
    fn test_batch_fails_on_scalar() {
        let err = normalize_cleanup_policies(&[json!({"name": "ok"}), json!("stale")]).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedShape { .. }));
    }
}
