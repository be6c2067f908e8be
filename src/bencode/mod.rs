pub mod bvalue;
pub mod decode;
pub mod encode;
pub mod error;

pub use bvalue::{BDict, BValue};   // re-export
pub use decode::{decode_bencode, decode_bencode_at, decode_bencode_at_with, decode_bencode_with};   // re-export
pub use encode::{bvalue_to_json, encode_bvalue, write_bvalue};   // re-export
pub use error::{BencodeError, ErrorKind};
