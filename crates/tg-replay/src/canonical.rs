//! Canonical JSON serialization.
//!
//! Identical logical content must always produce identical bytes: object
//! keys are written in sorted byte order, output is compact (no
//! whitespace), and floats are a hard error rather than a formatting
//! question. Every persisted bundle artifact goes through this path.

use serde::Serialize;
use serde_json::Value;

use crate::error::{ReplayError, ReplayResult};

/// Serialize `value` to a canonical JSON string.
///
/// Fails if any number in the tree is not representable as `i64`/`u64`;
/// a float in a persisted artifact is a build error, never a rounding op.
pub fn to_canonical_string<T: Serialize>(value: &T) -> ReplayResult<String> {
    let tree = serde_json::to_value(value)?;
    let mut out = String::new();
    write_value(&tree, &mut out, "$")?;
    Ok(out)
}

fn write_value(value: &Value, out: &mut String, path: &str) -> ReplayResult<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                out.push_str(&i.to_string());
            } else if let Some(u) = n.as_u64() {
                out.push_str(&u.to_string());
            } else {
                return Err(ReplayError::FloatValue {
                    context: format!("{path} = {n}"),
                });
            }
        }
        Value::String(s) => {
            // serde_json's string escaping is deterministic.
            out.push_str(&serde_json::to_string(s)?);
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out, &format!("{path}[{i}]"))?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            // Sort explicitly; never rely on the map's insertion order.
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key)?);
                out.push(':');
                write_value(&map[*key], out, &format!("{path}.{key}"))?;
            }
            out.push('}');
        }
    }
    Ok(())
}
