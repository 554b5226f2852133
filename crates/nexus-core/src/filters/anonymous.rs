//! Anonymous access settings

use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::decode;
use crate::Result;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnonymousAccess {
    Api(Map<String, Value>),
    Legacy(bool),
}

/// Coerce anonymous access settings into the API shape.
///
/// A mapping is already in API shape and returned as-is. The legacy boolean
/// becomes `{enabled, userId: "anonymous", realmName: "NexusAuthorizingRealm"}`.
pub fn normalize_anonymous_access(value: &Value) -> Result<Value> {
    match decode::<AnonymousAccess>("anonymous access", value)? {
        AnonymousAccess::Api(settings) => Ok(Value::Object(settings)),
        AnonymousAccess::Legacy(enabled) => Ok(json!({
            "enabled": enabled,
            "userId": "anonymous",
            "realmName": "NexusAuthorizingRealm"
        })),
    }
}
