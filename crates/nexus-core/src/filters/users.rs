//! Local user accounts

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::{decode, strip_empty};
use crate::Result;

/// A user already in API shape; unknown keys are carried along untouched.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiLocalUser {
    user_id: Value,
    first_name: Value,
    last_name: Value,
    email_address: Value,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// A user as written in the legacy role variables.
#[derive(Debug, Deserialize)]
struct LegacyLocalUser {
    username: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LocalUser {
    Api(ApiLocalUser),
    Legacy(LegacyLocalUser),
}

impl LegacyLocalUser {
    fn into_api(self) -> Map<String, Value> {
        let Value::Object(user) = json!({
            "userId": self.username,
            "firstName": self.first_name,
            "lastName": self.last_name,
            "emailAddress": self.email,
            "source": "default",
            "status": "active",
            "readOnly": false,
            "roles": self.roles,
            "externalRoles": [],
        }) else {
            unreachable!("json! object literal")
        };
        strip_empty(user)
    }
}

/// Normalize local users into the API shape.
///
/// Users carrying `userId`, `firstName`, `lastName` and `emailAddress` pass
/// through unchanged. Legacy users are mapped and stripped of empty values.
pub fn normalize_local_users(users: &[Value]) -> Result<Vec<Value>> {
    users
        .iter()
        .map(|user| -> Result<Value> {
            Ok(match decode::<LocalUser>("local user", user)? {
                LocalUser::Api(user) => serde_json::to_value(user)?,
                LocalUser::Legacy(user) => Value::Object(user.into_api()),
            })
        })
        .collect()
}
