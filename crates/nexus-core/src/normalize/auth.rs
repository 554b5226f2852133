//! Authentication-type inference for proxy repositories
//!
//! A proxy's `httpClient.authentication` block needs a `type` discriminator
//! once credentials are present. NTLM fields take priority over plain
//! username/password; either scheme must be complete.

use serde_json::{Map, Value};

use crate::error::{AuthScheme, NormalizationCause};
use crate::path;

pub(crate) const AUTHENTICATION_PATH: &str = "httpClient.authentication";
const AUTHENTICATION_TYPE_PATH: &str = "httpClient.authentication.type";

const CREDENTIAL_FIELDS: [&str; 4] = ["username", "password", "ntlmHost", "ntlmDomain"];

/// A credential counts as present when it is neither null nor an empty string.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn detect_scheme(auth: &Map<String, Value>) -> Option<AuthScheme> {
    let has = |field: &str| is_present(auth.get(field));

    if has("ntlmHost") || has("ntlmDomain") {
        Some(AuthScheme::Ntlm)
    } else if has("username") || has("password") {
        Some(AuthScheme::Username)
    } else {
        None
    }
}

/// Set `httpClient.authentication.type` from the credential fields present.
///
/// Leaves the record untouched when the block is absent, not a mapping, or
/// carries no credentials.
pub(crate) fn infer_authentication_type(normalized: &mut Value) -> Result<(), NormalizationCause> {
    let Some(Value::Object(auth)) = path::get(normalized, AUTHENTICATION_PATH) else {
        return Ok(());
    };
    let Some(scheme) = detect_scheme(auth) else {
        return Ok(());
    };

    let missing: Vec<String> = scheme
        .required_fields()
        .iter()
        .filter(|field| !is_present(auth.get(**field)))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(NormalizationCause::IncompleteAuthentication { scheme, missing });
    }

    tracing::debug!(scheme = scheme.as_str(), "Inferred authentication type");
    path::set(normalized, AUTHENTICATION_TYPE_PATH, Value::from(scheme.as_str()));
    Ok(())
}

/// Turn defaults scaffolding back into an explicit `null` block.
///
/// Applies only when the type defaults declared the block null or absent and
/// the merged block carries no credential fields and no `type`.
pub(crate) fn revert_empty_authentication(normalized: &mut Value, type_defaults: &Value) {
    if path::get_present(type_defaults, AUTHENTICATION_PATH).is_some() {
        return;
    }
    let Some(Value::Object(auth)) = path::get(normalized, AUTHENTICATION_PATH) else {
        return;
    };

    let carries_settings = CREDENTIAL_FIELDS
        .iter()
        .chain(std::iter::once(&"type"))
        .any(|field| is_present(auth.get(*field)));
    if carries_settings {
        return;
    }

    tracing::debug!("Reverting empty authentication block to null");
    path::set(normalized, AUTHENTICATION_PATH, Value::Null);
}
