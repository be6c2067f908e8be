use std::io::{self, Write};

use serde_json::{json, Value};

use super::BValue;

/// Encode a `BValue` back into a bencoded `Vec<u8>`.
///
/// Dictionaries are written in their stored key order, so a value decoded
/// from canonical input re-encodes to the same bytes.
pub fn encode_bvalue(value: &BValue) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    encode_into(value, &mut out);
    out
}

/// Encode a `BValue` into any writer.
pub fn write_bvalue<W: Write>(value: &BValue, mut writer: W) -> io::Result<()> {
    writer.write_all(&encode_bvalue(value))
}

fn encode_into(value: &BValue, out: &mut Vec<u8>) {
    match value {
        BValue::Integer(i) => {
            out.push(b'i');
            out.extend_from_slice(i.to_string().as_bytes());
            out.push(b'e');
        }
        BValue::ByteString(bytes) => encode_bytes(bytes, out),
        BValue::List(items) => {
            out.push(b'l');
            for item in items {
                encode_into(item, out);
            }
            out.push(b'e');
        }
        BValue::Dict(dict) => {
            out.push(b'd');
            for (key, val) in dict.iter() {
                encode_bytes(key, out);
                encode_into(val, out);
            }
            out.push(b'e');
        }
    }
}

fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(bytes.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(bytes);
}

const HEX_KEY_PREFIX: &str = "_bytes_hex:";

/// Convert a `BValue` into JSON (using Serde JSON `Value`).
///
/// - `Integer(i)` => JSON number
/// - `ByteString(bytes)` => Attempt UTF-8; if invalid, store hex in `\"_bytes_hex\"`.
/// - `List(...)` => JSON array
/// - `Dict(...)` => JSON object, in key order; keys that are not UTF-8 become
///   `_bytes_hex:<hex>` so they cannot collide with a UTF-8 key
pub fn bvalue_to_json(bv: &BValue) -> Value {
    match bv {
        BValue::Integer(i) => json!(i),

        BValue::ByteString(bytes) => match std::str::from_utf8(bytes) {
            Ok(utf8_str) => Value::String(utf8_str.to_string()),
            Err(_) => json!({ "_bytes_hex": hex::encode(bytes) }),
        },

        BValue::List(list_items) => Value::Array(list_items.iter().map(bvalue_to_json).collect()),

        BValue::Dict(dict) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in dict.iter() {
                let key = match std::str::from_utf8(k) {
                    Ok(s) => s.to_string(),
                    Err(_) => format!("{}{}", HEX_KEY_PREFIX, hex::encode(k)),
                };
                if json_map.contains_key(&key) {
                    log::warn!("json key {} appears twice, keeping the later value", key);
                }
                json_map.insert(key, bvalue_to_json(v));
            }
            Value::Object(json_map)
        }
    }
}
