use bytes::Bytes;
use log::{debug, trace};

use super::error::BencodeError;
use crate::bencode::bvalue::{BDict, BValue};
use crate::config::{DecodeOptions, MAX_DEPTH_LIMIT};

/// Decodes a buffer holding exactly one bencoded value.
pub fn decode_bencode(input: &[u8]) -> Result<BValue, BencodeError> {
    decode_bencode_with(input, &DecodeOptions::default())
}

/// Decodes one value using `options`. Unless trailing data is allowed, the
/// value must cover the whole buffer.
pub fn decode_bencode_with(input: &[u8], options: &DecodeOptions) -> Result<BValue, BencodeError> {
    let decoder = Decoder::new(input, options.max_depth);
    let result = decoder.decode_value(0, 0).and_then(|(value, next)| {
        if next != input.len() && !options.allow_trailing_data {
            return Err(BencodeError::TrailingData { offset: next });
        }
        Ok(value)
    });

    match &result {
        Ok(value) => debug!("decoded {} from {} bytes", value.kind(), input.len()),
        Err(e) => debug!("failed to decode {} bytes: {}", input.len(), e),
    }
    result
}

/// Decodes the element starting at `index` and returns it with the position
/// just past it. Bytes after the element are left untouched.
pub fn decode_bencode_at(input: &[u8], index: usize) -> Result<(BValue, usize), BencodeError> {
    decode_bencode_at_with(input, index, &DecodeOptions::default())
}

/// Like [`decode_bencode_at`], limiting nesting to `options.max_depth`.
/// `allow_trailing_data` does not apply since the caller gets the next index.
pub fn decode_bencode_at_with(
    input: &[u8],
    index: usize,
    options: &DecodeOptions,
) -> Result<(BValue, usize), BencodeError> {
    Decoder::new(input, options.max_depth).decode_value(index, 0)
}

struct Decoder<'a> {
    input: &'a [u8],
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    fn new(input: &'a [u8], max_depth: usize) -> Self {
        // recursion is one frame pair per level, so the stack sets the ceiling
        Self {
            input,
            max_depth: max_depth.min(MAX_DEPTH_LIMIT),
        }
    }

    fn decode_value(&self, index: usize, depth: usize) -> Result<(BValue, usize), BencodeError> {
        let lead = *self
            .input
            .get(index)
            .ok_or(BencodeError::TruncatedInput { offset: index })?;
        trace!("dispatch {:?} at {}", lead as char, index);

        match lead {
            b'i' => self.decode_integer(index),
            b'l' => self.decode_list(index, depth),
            b'd' => self.decode_dict(index, depth),
            c if c.is_ascii_digit() => self
                .decode_string(index)
                .map(|(bytes, next)| (BValue::ByteString(bytes), next)),
            c => Err(BencodeError::InvalidLeadByte { offset: index, byte: c }),
        }
    }

    /// Decodes `i<digits>e` starting at the `i`.
    fn decode_integer(&self, index: usize) -> Result<(BValue, usize), BencodeError> {
        let start = index + 1;
        let mut pos = start;
        if self.input.get(pos) == Some(&b'-') {
            pos += 1;
        }
        pos = self.skip_digits(pos);

        match self.input.get(pos) {
            None => return Err(BencodeError::MissingTerminator { offset: index }),
            Some(b'e') => {}
            Some(&c) => {
                return Err(BencodeError::MalformedInteger {
                    offset: pos,
                    reason: format!("unexpected byte {:?}", c as char),
                })
            }
        }

        let digits = &self.input[start..pos];
        let malformed = |reason: &str| BencodeError::MalformedInteger {
            offset: start,
            reason: reason.to_string(),
        };
        let unsigned = digits.strip_prefix(b"-").unwrap_or(digits);
        if unsigned.is_empty() {
            return Err(malformed("no digits"));
        }
        if digits == b"-0" {
            return Err(malformed("negative zero"));
        }
        if unsigned.len() > 1 && unsigned[0] == b'0' {
            return Err(malformed("leading zeros are not allowed"));
        }

        // only '-' and ASCII digits reach here
        let num_str = std::str::from_utf8(digits).map_err(|_| malformed("not ASCII"))?;
        let parsed = num_str
            .parse::<i64>()
            .map_err(|e| malformed(&format!("'{}' does not fit in i64: {}", num_str, e)))?;

        // add 1 to account for 'e'
        Ok((BValue::Integer(parsed), pos + 1))
    }

    /// Decodes `<length>:<bytes>` starting at the first length digit.
    fn decode_string(&self, index: usize) -> Result<(Bytes, usize), BencodeError> {
        let colon_index = self.skip_digits(index);
        match self.input.get(colon_index) {
            None => return Err(BencodeError::TruncatedInput { offset: colon_index }),
            Some(b':') => {}
            Some(&c) if colon_index == index => {
                return Err(BencodeError::MalformedLength {
                    offset: index,
                    reason: format!("expected a length digit, found {:?}", c as char),
                })
            }
            Some(&c) => {
                return Err(BencodeError::MissingSeparator {
                    offset: colon_index,
                    found: c,
                })
            }
        }

        let digits = &self.input[index..colon_index];
        let malformed = |reason: String| BencodeError::MalformedLength {
            offset: index,
            reason,
        };
        if digits.is_empty() {
            return Err(malformed("empty length".to_string()));
        }
        if digits.len() > 1 && digits[0] == b'0' {
            return Err(malformed("leading zeros are not allowed".to_string()));
        }
        let str_length = std::str::from_utf8(digits).map_err(|e| malformed(e.to_string()))?;
        let length = str_length
            .parse::<usize>()
            .map_err(|e| malformed(format!("invalid length {}: {}", str_length, e)))?;

        let start_data = colon_index + 1;
        let remaining = self.input.len() - start_data;
        if length > remaining {
            return Err(BencodeError::DeclaredLengthExceedsBuffer {
                offset: index,
                declared: length,
                remaining,
            });
        }

        let end_data = start_data + length;
        let data = Bytes::copy_from_slice(&self.input[start_data..end_data]);
        Ok((data, end_data))
    }

    /// Decodes `l<items>e` starting at the `l`.
    fn decode_list(&self, index: usize, depth: usize) -> Result<(BValue, usize), BencodeError> {
        let depth = self.descend(index, depth)?;
        let mut idx = index + 1; // skip 'l'
        let mut items = Vec::new();

        loop {
            match self.input.get(idx) {
                None => return Err(BencodeError::MissingTerminator { offset: index }),
                Some(b'e') => break,
                Some(_) => {
                    let (val, next) = self.decode_value(idx, depth)?;
                    items.push(val);
                    idx = next;
                }
            }
        }

        // add 1 to account for 'e'
        Ok((BValue::List(items), idx + 1))
    }

    /// Decodes `d(<key><value>)*e` starting at the `d`. Keys are kept in the
    /// order they appear; they do not have to be sorted.
    fn decode_dict(&self, index: usize, depth: usize) -> Result<(BValue, usize), BencodeError> {
        let depth = self.descend(index, depth)?;
        let mut idx = index + 1; // skip 'd'
        let mut dict = BDict::new();

        loop {
            match self.input.get(idx) {
                None => return Err(BencodeError::MissingTerminator { offset: index }),
                Some(b'e') => break,
                Some(_) => {
                    let key_offset = idx;
                    let (key, after_key) = self.decode_string(idx)?;
                    let (value, next) = self.decode_value(after_key, depth)?;
                    dict.try_insert(key, value).map_err(|key| {
                        BencodeError::DuplicateDictionaryKey {
                            offset: key_offset,
                            key: key.to_vec(),
                        }
                    })?;
                    idx = next;
                }
            }
        }

        // add 1 to account for 'e'
        Ok((BValue::Dict(dict), idx + 1))
    }

    fn skip_digits(&self, mut pos: usize) -> usize {
        while self.input.get(pos).map_or(false, u8::is_ascii_digit) {
            pos += 1;
        }
        pos
    }

    fn descend(&self, index: usize, depth: usize) -> Result<usize, BencodeError> {
        if depth >= self.max_depth {
            return Err(BencodeError::NestingTooDeep {
                offset: index,
                limit: self.max_depth,
            });
        }
        Ok(depth + 1)
    }
}
