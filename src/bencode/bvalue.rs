use std::collections::HashMap;

use bytes::Bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BValue {
	ByteString(Bytes), // raw bytes, no encoding guarantee
	Integer(i64),      // bounded to i64, wider integers are rejected on decode
	List(Vec<BValue>),
	Dict(BDict),
}

/// A bencode dictionary that remembers the order its keys were inserted in.
///
/// Keys live in an ordered list next to a lookup map; both always hold the
/// same set of keys. Equality is order-sensitive, so two dictionaries with the
/// same entries in a different order are not equal and do not encode to the
/// same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BDict {
	keys: Vec<Bytes>,
	entries: HashMap<Bytes, BValue>,
}

impl BDict {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			keys: Vec::with_capacity(capacity),
			entries: HashMap::with_capacity(capacity),
		}
	}

	/// Appends a new entry. A key that is already present is handed back and
	/// the dictionary is left unchanged.
	pub fn try_insert(&mut self, key: Bytes, value: BValue) -> Result<(), Bytes> {
		if self.entries.contains_key(&key) {
			return Err(key);
		}
		self.keys.push(key.clone());
		self.entries.insert(key, value);
		Ok(())
	}

	/// Inserts or replaces an entry. A replaced key keeps its original position;
	/// a new key goes to the end. Returns the previous value, if any.
	pub fn insert(&mut self, key: impl Into<Bytes>, value: BValue) -> Option<BValue> {
		let key = key.into();
		if let Some(slot) = self.entries.get_mut(&key) {
			return Some(std::mem::replace(slot, value));
		}
		self.keys.push(key.clone());
		self.entries.insert(key, value);
		None
	}

	pub fn get(&self, key: &[u8]) -> Option<&BValue> {
		self.entries.get(key)
	}

	pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut BValue> {
		self.entries.get_mut(key)
	}

	pub fn contains_key(&self, key: &[u8]) -> bool {
		self.entries.contains_key(key)
	}

	pub fn remove(&mut self, key: &[u8]) -> Option<BValue> {
		let value = self.entries.remove(key)?;
		self.keys.retain(|k| &k[..] != key);
		Some(value)
	}

	pub fn len(&self) -> usize {
		self.keys.len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	/// Keys in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &Bytes> {
		self.keys.iter()
	}

	/// Entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&Bytes, &BValue)> {
		// every listed key has an entry
		self.keys
			.iter()
			.filter_map(move |k| self.entries.get(k).map(|v| (k, v)))
	}

	/// True when keys are strictly ascending by raw byte value, the order
	/// canonical producers emit.
	pub fn is_sorted(&self) -> bool {
		self.keys.windows(2).all(|pair| pair[0] < pair[1])
	}

	pub fn sort_keys(&mut self) {
		self.keys.sort();
	}
}

impl FromIterator<(Bytes, BValue)> for BDict {
	/// Later duplicates replace earlier values in place.
	fn from_iter<I: IntoIterator<Item = (Bytes, BValue)>>(iter: I) -> Self {
		let mut dict = BDict::new();
		for (key, value) in iter {
			dict.insert(key, value);
		}
		dict
	}
}

impl<'a> IntoIterator for &'a BDict {
	type Item = (&'a Bytes, &'a BValue);
	type IntoIter = Box<dyn Iterator<Item = (&'a Bytes, &'a BValue)> + 'a>;

	fn into_iter(self) -> Self::IntoIter {
		Box::new(self.iter())
	}
}

impl BValue {
	/// Byte string holding the UTF-8 bytes of `s`.
	pub fn string(s: &str) -> Self {
		BValue::ByteString(Bytes::copy_from_slice(s.as_bytes()))
	}

	/// Short name of the variant, for messages.
	pub fn kind(&self) -> &'static str {
		match self {
			BValue::ByteString(_) => "byte string",
			BValue::Integer(_) => "integer",
			BValue::List(_) => "list",
			BValue::Dict(_) => "dictionary",
		}
	}

	pub fn as_integer(&self) -> Option<i64> {
		match self {
			BValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&Bytes> {
		match self {
			BValue::ByteString(b) => Some(b),
			_ => None,
		}
	}

	/// The byte string as UTF-8, if it is a byte string and valid UTF-8.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			BValue::ByteString(b) => std::str::from_utf8(b).ok(),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[BValue]> {
		match self {
			BValue::List(l) => Some(l),
			_ => None,
		}
	}

	pub fn as_dict(&self) -> Option<&BDict> {
		match self {
			BValue::Dict(d) => Some(d),
			_ => None,
		}
	}

	pub fn into_dict(self) -> Option<BDict> {
		match self {
			BValue::Dict(d) => Some(d),
			_ => None,
		}
	}

	/// Looks up `key` if this is a dictionary.
	pub fn get(&self, key: &[u8]) -> Option<&BValue> {
		self.as_dict()?.get(key)
	}

	/// Sorts the keys of every dictionary in the tree so that encoding
	/// produces canonical output.
	pub fn canonicalize(&mut self) {
		match self {
			BValue::List(items) => items.iter_mut().for_each(BValue::canonicalize),
			BValue::Dict(dict) => {
				dict.sort_keys();
				dict.entries.values_mut().for_each(BValue::canonicalize);
			}
			BValue::ByteString(_) | BValue::Integer(_) => {}
		}
	}

	/// True when every dictionary in the tree has sorted keys.
	pub fn is_canonical(&self) -> bool {
		match self {
			BValue::List(items) => items.iter().all(BValue::is_canonical),
			BValue::Dict(dict) => dict.is_sorted() && dict.entries.values().all(BValue::is_canonical),
			BValue::ByteString(_) | BValue::Integer(_) => true,
		}
	}
}

impl From<i64> for BValue {
	fn from(i: i64) -> Self {
		BValue::Integer(i)
	}
}

impl From<&str> for BValue {
	fn from(s: &str) -> Self {
		BValue::string(s)
	}
}

impl From<&[u8]> for BValue {
	fn from(b: &[u8]) -> Self {
		BValue::ByteString(Bytes::copy_from_slice(b))
	}
}

impl From<Vec<u8>> for BValue {
	fn from(b: Vec<u8>) -> Self {
		BValue::ByteString(Bytes::from(b))
	}
}

impl From<Bytes> for BValue {
	fn from(b: Bytes) -> Self {
		BValue::ByteString(b)
	}
}

impl From<Vec<BValue>> for BValue {
	fn from(l: Vec<BValue>) -> Self {
		BValue::List(l)
	}
}

impl From<BDict> for BValue {
	fn from(d: BDict) -> Self {
		BValue::Dict(d)
	}
}
