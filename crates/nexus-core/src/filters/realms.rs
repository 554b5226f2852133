//! Security realm list

use serde::Deserialize;
use serde_json::{Map, Value};

use super::decode;
use crate::{Error, Result};

/// Realm that is always active.
pub const DEFAULT_REALM: &str = "NexusAuthenticatingRealm";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SecurityRealms {
    /// Ordered realm ids as accepted by the API
    Api(Vec<String>),
    /// Legacy boolean flags, e.g. `{ ldap: true, docker: false }`
    Legacy(Map<String, Value>),
}

/// Build the active realm list.
///
/// A sequence is returned unchanged. A mapping of legacy flags yields the
/// default realm followed by the realm mapped from every flag set to `true`,
/// in `mappings` order.
///
/// # Examples
///
/// ```
/// use nexus_core::filters::normalize_security_realms;
/// use serde_json::json;
///
/// let mappings = json!({"nexus_ldap_realm": "LdapRealm", "nexus_docker_bearer_token_realm": "DockerToken"});
/// let realms = normalize_security_realms(
///     &json!({"nexus_ldap_realm": true, "nexus_docker_bearer_token_realm": false}),
///     mappings.as_object().unwrap(),
/// )
/// .unwrap();
/// assert_eq!(realms, vec!["NexusAuthenticatingRealm", "LdapRealm"]);
/// ```
pub fn normalize_security_realms(value: &Value, mappings: &Map<String, Value>) -> Result<Vec<String>> {
    let flags = match decode::<SecurityRealms>("security realms", value)? {
        SecurityRealms::Api(realms) => return Ok(realms),
        SecurityRealms::Legacy(flags) => flags,
    };

    let mut realms = vec![DEFAULT_REALM.to_string()];
    for (flag, realm) in mappings {
        if flags.get(flag).and_then(Value::as_bool) != Some(true) {
            continue;
        }
        let realm = realm.as_str().ok_or_else(|| Error::UnrecognizedShape {
            kind: "realm mapping",
            message: format!("realm for '{flag}' must be a string, found {realm}"),
        })?;
        realms.push(realm.to_string());
    }

    Ok(realms)
}
