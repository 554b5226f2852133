//! LDAP connections
//!
//! Legacy connections use `ldap_*` role variables and receive the fixed
//! connection defaults of the API. The group type is STATIC when a group
//! object class is configured and DYNAMIC when a member-of attribute is.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::{decode, strip_empty};
use crate::Result;

const DEFAULT_PROTOCOL: &str = "LDAP";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 389;
const DEFAULT_SEARCH_BASE: &str = "dc=example,dc=com";
const DEFAULT_AUTH_SCHEME: &str = "NONE";
const CONNECTION_TIMEOUT_SECONDS: u32 = 30;
const CONNECTION_RETRY_DELAY_SECONDS: u32 = 300;
const MAX_INCIDENTS_COUNT: u32 = 3;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiLdapConnection {
    name: Value,
    protocol: Value,
    host: Value,
    search_base: Value,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// Requires `ldap_name`; a mapping without it matches neither dialect.
#[derive(Debug, Deserialize)]
struct LegacyLdapConnection {
    #[serde(rename = "ldap_name")]
    name: String,
    ldap_protocol: Option<String>,
    ldap_hostname: Option<String>,
    ldap_port: Option<Value>,
    ldap_search_base: Option<String>,
    ldap_auth: Option<String>,
    ldap_auth_username: Option<String>,
    ldap_auth_password: Option<String>,
    ldap_use_trust_store: Option<bool>,
    ldap_user_base_dn: Option<String>,
    ldap_user_filter: Option<String>,
    ldap_user_id_attribute: Option<String>,
    ldap_user_real_name_attribute: Option<String>,
    ldap_user_email_attribute: Option<String>,
    ldap_user_password_attribute: Option<String>,
    ldap_user_object_class: Option<String>,
    ldap_group_base_dn: Option<String>,
    ldap_group_object_class: Option<String>,
    ldap_group_id_attribute: Option<String>,
    ldap_group_member_attribute: Option<String>,
    ldap_group_member_format: Option<String>,
    #[serde(rename = "userMemberOfAttribute")]
    user_member_of_attribute: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LdapConnection {
    Api(ApiLdapConnection),
    Legacy(Box<LegacyLdapConnection>),
}

impl LegacyLdapConnection {
    fn into_api(self) -> Map<String, Value> {
        let Value::Object(mut connection) = json!({
            "name": self.name,
            "protocol": self.ldap_protocol.as_deref().unwrap_or(DEFAULT_PROTOCOL),
            "host": self.ldap_hostname.as_deref().unwrap_or(DEFAULT_HOST),
            "port": self.ldap_port.unwrap_or_else(|| json!(DEFAULT_PORT)),
            "searchBase": self.ldap_search_base.as_deref().unwrap_or(DEFAULT_SEARCH_BASE),
            "authScheme": self.ldap_auth.as_deref().unwrap_or(DEFAULT_AUTH_SCHEME).to_uppercase(),
            "authUsername": self.ldap_auth_username,
            "authPassword": self.ldap_auth_password,
            "connectionTimeoutSeconds": CONNECTION_TIMEOUT_SECONDS,
            "connectionRetryDelaySeconds": CONNECTION_RETRY_DELAY_SECONDS,
            "maxIncidentsCount": MAX_INCIDENTS_COUNT,
            "useTrustStore": self.ldap_use_trust_store.unwrap_or(false),
            "userBaseDn": self.ldap_user_base_dn,
            "userLdapFilter": self.ldap_user_filter,
            "userIdAttribute": self.ldap_user_id_attribute,
            "userRealNameAttribute": self.ldap_user_real_name_attribute,
            "userEmailAddressAttribute": self.ldap_user_email_attribute,
            "userPasswordAttribute": self.ldap_user_password_attribute,
            "userObjectClass": self.ldap_user_object_class,
            "ldapGroupsAsRoles": true,
            "groupBaseDn": self.ldap_group_base_dn,
            "groupSubtree": false,
            "userSubtree": false,
        }) else {
            unreachable!("json! object literal")
        };

        if let Some(object_class) = self.ldap_group_object_class {
            connection.insert("groupType".into(), json!("STATIC"));
            connection.insert("groupObjectClass".into(), json!(object_class));
            connection.insert("groupIdAttribute".into(), json!(self.ldap_group_id_attribute));
            connection.insert("groupMemberAttribute".into(), json!(self.ldap_group_member_attribute));
            connection.insert("groupMemberFormat".into(), json!(self.ldap_group_member_format));
        } else if let Some(member_of) = self.user_member_of_attribute {
            connection.insert("groupType".into(), json!("DYNAMIC"));
            connection.insert("userMemberOfAttribute".into(), json!(member_of));
        }

        connection
    }
}

/// Normalize LDAP connections into the API shape.
///
/// Both dialects are stripped of empty values.
pub fn normalize_ldap_connections(connections: &[Value]) -> Result<Vec<Value>> {
    connections
        .iter()
        .map(|connection| -> Result<Value> {
            let connection = match decode::<LdapConnection>("LDAP connection", connection)? {
                LdapConnection::Api(connection) => match serde_json::to_value(connection)? {
                    Value::Object(map) => map,
                    _ => Map::new(),
                },
                LdapConnection::Legacy(connection) => connection.into_api(),
            };
            Ok(Value::Object(strip_empty(connection)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_legacy_static_groups() {
        let normalized = normalize_ldap_connections(&[json!({
            "ldap_name": "corp",
            "ldap_hostname": "ldap.example.com",
            "ldap_port": 636,
            "ldap_protocol": "LDAPS",
            "ldap_search_base": "dc=corp,dc=example,dc=com",
            "ldap_auth": "simple",
            "ldap_auth_username": "cn=nexus",
            "ldap_auth_password": "secret",
            "ldap_user_base_dn": "ou=users",
            "ldap_user_id_attribute": "uid",
            "ldap_group_object_class": "groupOfNames",
            "ldap_group_id_attribute": "cn",
            "ldap_group_member_attribute": "member",
            "ldap_group_member_format": "uid=${username},ou=users"
        })])
        .unwrap();

        assert_eq!(
            normalized[0],
            json!({
                "name": "corp",
                "protocol": "LDAPS",
                "host": "ldap.example.com",
                "port": 636,
                "searchBase": "dc=corp,dc=example,dc=com",
                "authScheme": "SIMPLE",
                "authUsername": "cn=nexus",
                "authPassword": "secret",
                "connectionTimeoutSeconds": 30,
                "connectionRetryDelaySeconds": 300,
                "maxIncidentsCount": 3,
                "useTrustStore": false,
                "userBaseDn": "ou=users",
                "userIdAttribute": "uid",
                "ldapGroupsAsRoles": true,
                "groupSubtree": false,
                "userSubtree": false,
                "groupType": "STATIC",
                "groupObjectClass": "groupOfNames",
                "groupIdAttribute": "cn",
                "groupMemberAttribute": "member",
                "groupMemberFormat": "uid=${username},ou=users"
            })
        );
    }

    #[test]
    fn test_legacy_dynamic_groups_and_defaults() {
        let normalized = normalize_ldap_connections(&[json!({
            "ldap_name": "minimal",
            "userMemberOfAttribute": "memberOf"
        })])
        .unwrap();

        let connection = &normalized[0];
        assert_eq!(connection["protocol"], "LDAP");
        assert_eq!(connection["host"], "localhost");
        assert_eq!(connection["port"], 389);
        assert_eq!(connection["searchBase"], "dc=example,dc=com");
        assert_eq!(connection["authScheme"], "NONE");
        assert_eq!(connection["groupType"], "DYNAMIC");
        assert_eq!(connection["userMemberOfAttribute"], "memberOf");
        assert!(connection.get("userBaseDn").is_none());
    }

    #[test]
    fn test_api_connection_stripped_of_empties() {
        let normalized = normalize_ldap_connections(&[json!({
            "name": "corp",
            "protocol": "LDAPS",
            "host": "ldap.example.com",
            "searchBase": "dc=corp",
            "userBaseDn": "",
            "authPassword": null
        })])
        .unwrap();

        assert_eq!(
            normalized[0],
            json!({"name": "corp", "protocol": "LDAPS", "host": "ldap.example.com", "searchBase": "dc=corp"})
        );
    }

    #[test]
    fn test_unrecognized_connection_rejected() {
        let err = normalize_ldap_connections(&[json!({"host": "ldap.example.com"})]).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedShape { kind: "LDAP connection", .. }));
    }

    #[test]
    fn test_legacy_keys_without_name_rejected() {
        let err = normalize_ldap_connections(&[json!({
            "ldap_hostname": "ldap.example.com",
            "ldap_port": 636
        })])
        .unwrap_err();
        assert!(matches!(err, Error::UnrecognizedShape { kind: "LDAP connection", .. }));
    }

    #[test]
    fn test_one_bad_connection_fails_the_batch() {
        let result = normalize_ldap_connections(&[
            json!({"ldap_name": "corp", "ldap_hostname": "ldap.example.com"}),
            json!({"host": "ldap.example.com"}),
        ]);
        assert!(result.is_err());
    }
}
