//! Reference implementation of the runtime query-key algorithm.
//!
//! The generated context file ships the same algorithm as `queryKeyFn`. This
//! version lets tooling compute the key a generated query will use, for
//! cache inspection or tests, without running the TypeScript runtime.

use serde_json::Value;

use crate::openapi::ir::naming::to_camel_case;

/// Query key for a path template and a `Variables` value.
///
/// Steps:
/// 1. Split `path` on `/`, dropping empty segments
/// 2. If `variables.pathParams` is set, replace each `{name}` segment with its value
/// 3. Append `variables.queryParams` if set, then `variables.body` if set
///
/// Placeholders may use the document's parameter name (`{pet_id}`) or the
/// camelCased one the generated code uses (`{petId}`). "Set" follows
/// JavaScript truthiness, so an empty string or `0` is treated as absent.
pub fn build_query_key(path: &str, variables: &Value) -> Vec<Value> {
    let segments = path.split('/').filter(|segment| !segment.is_empty());
    let path_params = variables.get("pathParams").filter(|v| is_truthy(v));

    let mut key: Vec<Value> = match path_params {
        Some(params) => segments
            .map(|segment| resolve_path_param(segment, params))
            .collect(),
        None => segments.map(|s| Value::String(s.to_string())).collect(),
    };

    for field in ["queryParams", "body"] {
        if let Some(value) = variables.get(field).filter(|v| is_truthy(v)) {
            key.push(value.clone());
        }
    }

    key
}

fn resolve_path_param(segment: &str, params: &Value) -> Value {
    let Some(name) = segment
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return Value::String(segment.to_string());
    };

    params
        .get(name)
        .or_else(|| params.get(to_camel_case(name)))
        .cloned()
        .unwrap_or(Value::Null)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
