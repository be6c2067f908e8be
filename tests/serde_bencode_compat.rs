use std::collections::HashMap;

use bytes::Bytes;
use rusbit_bencode::{decode_bencode, BDict, BValue};
use serde_bencode::value::Value as Reference;

// HashMap ordering is lost on their side, so compare with keys sorted.
fn from_reference(value: Reference) -> BValue {
    match value {
        Reference::Int(i) => BValue::Integer(i),
        Reference::Bytes(b) => BValue::ByteString(Bytes::from(b)),
        Reference::List(items) => BValue::List(items.into_iter().map(from_reference).collect()),
        Reference::Dict(map) => {
            let mut entries: Vec<(Vec<u8>, Reference)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let dict: BDict = entries
                .into_iter()
                .map(|(k, v)| (Bytes::from(k), from_reference(v)))
                .collect();
            BValue::Dict(dict)
        }
    }
}

#[test]
fn test_agrees_with_serde_bencode_on_canonical_input() {
    let inputs: &[&[u8]] = &[
        b"i42e",
        b"i-13e",
        b"5:hello",
        b"l4:spami42ee",
        b"d3:bar4:spam3:fooi42ee",
        b"d3:fool4:spami1ee3:zip4:eggse",
        b"d4:infod6:lengthi12e6:pieces3:\x00\xff\x10ee",
    ];
    for input in inputs {
        let reference: Reference = serde_bencode::from_bytes(input).unwrap();
        assert_eq!(decode_bencode(input).unwrap(), from_reference(reference));
    }
}

#[test]
fn test_reference_map_sanity() {
    let mut map = HashMap::new();
    map.insert(b"b".to_vec(), Reference::Int(1));
    map.insert(b"a".to_vec(), Reference::Int(2));
    let value = from_reference(Reference::Dict(map));
    assert!(value.is_canonical());
}
