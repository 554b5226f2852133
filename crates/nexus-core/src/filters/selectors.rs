//! Content selectors

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::{decode, strip_empty};
use crate::Result;

/// Selector type assigned to legacy selectors.
const CSEL: &str = "csel";

#[derive(Debug, Serialize, Deserialize)]
struct ApiContentSelector {
    name: Value,
    #[serde(rename = "type")]
    kind: Value,
    description: Value,
    expression: Value,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct LegacyContentSelector {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    search_expression: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentSelector {
    Api(ApiContentSelector),
    Legacy(LegacyContentSelector),
}

/// Normalize content selectors into the API shape.
///
/// Legacy selectors take `search_expression` as their expression and the
/// `csel` type; empty attributes are dropped.
pub fn normalize_content_selectors(selectors: &[Value]) -> Result<Vec<Value>> {
    selectors
        .iter()
        .map(|selector| -> Result<Value> {
            Ok(match decode::<ContentSelector>("content selector", selector)? {
                ContentSelector::Api(selector) => serde_json::to_value(selector)?,
                ContentSelector::Legacy(selector) => {
                    let Value::Object(map) = json!({
                        "name": selector.name,
                        "type": CSEL,
                        "description": selector.description,
                        "expression": selector.search_expression,
                    }) else {
                        unreachable!("json! object literal")
                    };
                    Value::Object(strip_empty(map))
                }
            })
        })
        .collect()
}
