use base64::{engine::general_purpose::STANDARD, Engine as _};
use model_definition::Key;
use serde_json::Value;

use crate::error::{MutationError, MutationResult};

/// Normalizes a reference into a raw primary key.
///
/// A reference is either a raw key already (an integer, a numeric string
/// or an arbitrary string key) or the opaque global form used by the
/// client schema, a base64 encoding of `Type:key`. The opaque form is
/// decoded transparently; both forms of the same key normalize to the
/// same value.
pub fn disambiguate_id(value: &Value) -> MutationResult<Key> {
    match value {
        Value::Number(number) => match number.as_i64() {
            Some(int) => Ok(Key::Int(int)),
            None => Err(malformed(value)),
        },
        Value::String(string) if !string.is_empty() => {
            if let Ok(int) = string.parse::<i64>() {
                return Ok(Key::Int(int));
            }

            if let Some((_, key)) = decode_global_id(string) {
                if key.is_empty() {
                    return Err(malformed(value));
                }

                return Ok(coerce_key(&key));
            }

            Ok(Key::Str(string.clone()))
        }
        _ => Err(malformed(value)),
    }
}

/// Element-wise [`disambiguate_id`] over a reference list.
pub fn disambiguate_ids(value: &Value) -> MutationResult<Vec<Key>> {
    match value {
        Value::Array(values) => values.iter().map(disambiguate_id).collect(),
        _ => Err(malformed(value)),
    }
}

/// Encodes a key into the opaque global form for the given client type.
pub fn encode_global_id(type_name: &str, key: &Key) -> String {
    STANDARD.encode(format!("{type_name}:{key}"))
}

/// Decodes the opaque global form into its type name and raw key parts.
/// Returns `None` when the value is not such an encoding.
pub fn decode_global_id(value: &str) -> Option<(String, String)> {
    let decoded = STANDARD.decode(value).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (type_name, key) = decoded.split_once(':')?;

    Some((type_name.to_string(), key.to_string()))
}

fn coerce_key(key: &str) -> Key {
    match key.parse::<i64>() {
        Ok(int) => Key::Int(int),
        Err(_) => Key::Str(key.to_string()),
    }
}

fn malformed(value: &Value) -> MutationError {
    MutationError::MalformedReference { value: value.clone() }
}
