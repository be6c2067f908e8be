use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusbit_bencode::{decode_bencode, encode_bvalue, BDict, BValue, ErrorKind};

fn random_bytes(rng: &mut StdRng) -> Bytes {
    let len = rng.gen_range(0..24);
    let mut buf = vec![0u8; len];
    rng.fill(&mut buf[..]);
    Bytes::from(buf)
}

fn random_value(rng: &mut StdRng, depth: usize) -> BValue {
    let kind = if depth == 0 { rng.gen_range(0..2) } else { rng.gen_range(0..4) };
    match kind {
        0 => BValue::Integer(rng.gen()),
        1 => BValue::ByteString(random_bytes(rng)),
        2 => {
            let len = rng.gen_range(0..5);
            BValue::List((0..len).map(|_| random_value(rng, depth - 1)).collect())
        }
        _ => {
            let len = rng.gen_range(0..5);
            let mut dict = BDict::new();
            for _ in 0..len {
                // random keys are unsorted, which must survive the round trip
                let _ = dict.try_insert(random_bytes(rng), random_value(rng, depth - 1));
            }
            BValue::Dict(dict)
        }
    }
}

#[test]
fn test_random_values_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x6265_6e63);
    for _ in 0..500 {
        let value = random_value(&mut rng, 4);
        let encoded = encode_bvalue(&value);
        assert_eq!(decode_bencode(&encoded).unwrap(), value);
    }
}

#[test]
fn test_canonical_bytes_round_trip() {
    let inputs: &[&[u8]] = &[
        b"i2e",
        b"i-4e",
        b"4:girl",
        b"0:",
        b"l4:girle",
        b"le",
        b"de",
        b"d2:lai2e1:zd1:aleee",
        b"d1:e1:?e",
        b"d8:announce15:http://test.com4:infod4:name4:test12:piece lengthi16384eee",
    ];
    for input in inputs {
        let value = decode_bencode(input).unwrap();
        assert_eq!(encode_bvalue(&value), *input);
    }
}

#[test]
fn test_unsorted_dict_round_trips_in_original_order() {
    let input = b"d4:spami1e3:cow3:mooe";
    let value = decode_bencode(input).unwrap();
    assert!(!value.is_canonical());
    assert_eq!(encode_bvalue(&value), input);

    let mut canonical = value.clone();
    canonical.canonicalize();
    assert_eq!(encode_bvalue(&canonical), b"d3:cow3:moo4:spami1ee");
}

fn torrent_fixture(pieces: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"d8:announce40:http://tracker.thepiratebay.org/announce");
    out.extend_from_slice(b"13:announce-listll40:http://tracker.thepiratebay.org/announceel35:udp://tracker.openbittorrent.com:80ee");
    out.extend_from_slice(b"10:created by13:uTorrent/330013:creation datei1375363666e");
    out.extend_from_slice(b"4:infod6:lengthi362017e4:name36:Leaves of Grass by Walt Whitman.epub");
    out.extend_from_slice(b"12:piece lengthi16384e6:pieces");
    out.extend_from_slice(pieces.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(pieces);
    out.extend_from_slice(b"ee");
    out
}

#[test]
fn test_torrent_with_binary_pieces() {
    let pieces: Vec<u8> = (0..60u8).map(|i| i.wrapping_mul(97).wrapping_add(0x9c)).collect();
    let input = torrent_fixture(&pieces);

    let value = decode_bencode(&input).unwrap();
    assert_eq!(
        value.get(b"announce").and_then(BValue::as_str),
        Some("http://tracker.thepiratebay.org/announce")
    );
    assert_eq!(
        value.get(b"creation date").and_then(BValue::as_integer),
        Some(1375363666)
    );
    let tiers = value.get(b"announce-list").and_then(BValue::as_list).unwrap();
    assert_eq!(tiers.len(), 2);

    let info = value.get(b"info").unwrap();
    assert_eq!(info.get(b"length").and_then(BValue::as_integer), Some(362017));
    assert_eq!(
        info.get(b"pieces").and_then(BValue::as_bytes).map(|b| b.as_ref()),
        Some(pieces.as_slice())
    );

    assert!(value.is_canonical());
    assert_eq!(encode_bvalue(&value), input);
}

#[test]
fn test_every_truncation_is_an_error() {
    let input = torrent_fixture(b"\x00\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x0c\x0d\x0e\x0f\x10\x11\x12\x13");
    for end in 0..input.len() {
        let err = decode_bencode(&input[..end]).unwrap_err();
        assert!(
            matches!(
                err.kind(),
                ErrorKind::TruncatedInput
                    | ErrorKind::MissingTerminator
                    | ErrorKind::DeclaredLengthExceedsBuffer
            ),
            "prefix of {} bytes gave {:?}",
            end,
            err
        );
        assert!(err.offset() <= end);
    }
}

#[test]
fn test_random_garbage_never_panics() {
    let mut rng = StdRng::seed_from_u64(7);
    let alphabet = b"ilde0123456789:-x";
    for _ in 0..2000 {
        let len = rng.gen_range(0..16);
        let input: Vec<u8> = (0..len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();
        if let Ok(value) = decode_bencode(&input) {
            // anything accepted is canonical-length and re-encodes exactly
            assert_eq!(encode_bvalue(&value), input);
        }
    }
}
