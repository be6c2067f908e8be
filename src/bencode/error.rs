use std::fmt;

use thiserror::Error;

/// Every way a decode can fail. Each variant records the byte offset in the
/// input at which the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BencodeError {
    #[error("Truncated input at byte {offset}")]
    TruncatedInput { offset: usize },

    #[error("Malformed integer at byte {offset}: {reason}")]
    MalformedInteger { offset: usize, reason: String },

    #[error("Malformed string length at byte {offset}: {reason}")]
    MalformedLength { offset: usize, reason: String },

    #[error("String at byte {offset} declares {declared} bytes but only {remaining} remain")]
    DeclaredLengthExceedsBuffer {
        offset: usize,
        declared: usize,
        remaining: usize,
    },

    #[error("Expected ':' at byte {offset}, found {found:#04x}")]
    MissingSeparator { offset: usize, found: u8 },

    #[error("Missing 'e' terminator for element starting at byte {offset}")]
    MissingTerminator { offset: usize },

    #[error("Invalid lead byte {byte:#04x} at byte {offset}")]
    InvalidLeadByte { offset: usize, byte: u8 },

    #[error("Duplicate dictionary key {} at byte {offset}", String::from_utf8_lossy(.key))]
    DuplicateDictionaryKey { offset: usize, key: Vec<u8> },

    #[error("Nesting deeper than {limit} levels at byte {offset}")]
    NestingTooDeep { offset: usize, limit: usize },

    #[error("Trailing data after value at byte {offset}")]
    TrailingData { offset: usize },
}

/// The kind of a [`BencodeError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TruncatedInput,
    MalformedInteger,
    MalformedLength,
    DeclaredLengthExceedsBuffer,
    MissingSeparator,
    MissingTerminator,
    InvalidLeadByte,
    DuplicateDictionaryKey,
    NestingTooDeep,
    TrailingData,
}

impl BencodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BencodeError::TruncatedInput { .. } => ErrorKind::TruncatedInput,
            BencodeError::MalformedInteger { .. } => ErrorKind::MalformedInteger,
            BencodeError::MalformedLength { .. } => ErrorKind::MalformedLength,
            BencodeError::DeclaredLengthExceedsBuffer { .. } => {
                ErrorKind::DeclaredLengthExceedsBuffer
            }
            BencodeError::MissingSeparator { .. } => ErrorKind::MissingSeparator,
            BencodeError::MissingTerminator { .. } => ErrorKind::MissingTerminator,
            BencodeError::InvalidLeadByte { .. } => ErrorKind::InvalidLeadByte,
            BencodeError::DuplicateDictionaryKey { .. } => ErrorKind::DuplicateDictionaryKey,
            BencodeError::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
            BencodeError::TrailingData { .. } => ErrorKind::TrailingData,
        }
    }

    /// Byte offset into the input where the error was detected.
    pub fn offset(&self) -> usize {
        match *self {
            BencodeError::TruncatedInput { offset }
            | BencodeError::MalformedInteger { offset, .. }
            | BencodeError::MalformedLength { offset, .. }
            | BencodeError::DeclaredLengthExceedsBuffer { offset, .. }
            | BencodeError::MissingSeparator { offset, .. }
            | BencodeError::MissingTerminator { offset }
            | BencodeError::InvalidLeadByte { offset, .. }
            | BencodeError::DuplicateDictionaryKey { offset, .. }
            | BencodeError::NestingTooDeep { offset, .. }
            | BencodeError::TrailingData { offset } => offset,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_offset() {
        let err = BencodeError::DeclaredLengthExceedsBuffer {
            offset: 2,
            declared: 5,
            remaining: 2,
        };
        assert_eq!(err.kind(), ErrorKind::DeclaredLengthExceedsBuffer);
        assert_eq!(err.offset(), 2);
    }

    #[test]
    fn test_display_mentions_offset() {
        let err = BencodeError::InvalidLeadByte { offset: 7, byte: b'x' };
        assert_eq!(err.to_string(), "Invalid lead byte 0x78 at byte 7");

        let err = BencodeError::DuplicateDictionaryKey {
            offset: 9,
            key: b"spam".to_vec(),
        };
        assert_eq!(err.to_string(), "Duplicate dictionary key spam at byte 9");
    }
}
