//! Error types that this crate can return.

use thiserror::Error;

/// Top-level error from [`crate::Database::open`]/[`crate::Database::load`].
#[derive(Debug, Error)]
pub enum DatabaseOpenError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Key(#[from] DatabaseKeyError),

    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error(transparent)]
    Cryptography(#[from] CryptographyError),

    #[error(transparent)]
    BlockStream(#[from] BlockStreamError),

    #[error(transparent)]
    Xml(#[from] XmlParseError),

    #[error("database has already been loaded once and cannot be reloaded")]
    AlreadyLoaded,
}

/// Errors reading and validating the fixed + TLV header.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("not a KDBX file: invalid signature")]
    InvalidSignature,

    #[error("unsupported KDBX file version {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    #[error("header field {field_id} duplicated")]
    DuplicateField { field_id: u8 },

    #[error("header field {field_id} has invalid length {length}")]
    InvalidFieldLength { field_id: u8, length: usize },

    #[error("unrecognized header field id {field_id}")]
    UnknownField { field_id: u8 },

    #[error("missing required header field: {field}")]
    MissingField { field: &'static str },

    #[error("unsupported outer cipher UUID")]
    UnsupportedCipher,

    #[error("unsupported compression flags value {flags}")]
    UnsupportedCompression { flags: u32 },

    #[error("unsupported key derivation function")]
    UnsupportedKdf,

    #[error(transparent)]
    Truncated(#[from] crate::io::TruncationError),
}

/// Errors related to the database key (composite key construction, wrong password).
#[derive(Debug, Error)]
pub enum DatabaseKeyError {
    /// The supplied key material did not match the database (wrong password).
    #[error("incorrect key (wrong password?)")]
    IncorrectKey,

    #[error("no key material was provided")]
    NoKeySources,

    #[error(transparent)]
    Cryptography(#[from] CryptographyError),
}

/// Errors from cryptographic primitives.
#[derive(Debug, Error)]
pub enum CryptographyError {
    #[error("key or IV has the wrong length for AES-256-CBC")]
    InvalidKeyIvLength,

    #[error("ciphertext padding is invalid")]
    InvalidPadding,
}

/// Errors reading the hashed-block integrity stream.
#[derive(Debug, Error)]
pub enum BlockStreamError {
    #[error("block {block_index} failed its SHA-256 integrity check")]
    BlockHashMismatch { block_index: u64 },

    #[error("block index {actual} out of sequence, expected {expected}")]
    OutOfSequence { expected: u64, actual: u64 },

    #[error(transparent)]
    Truncated(#[from] crate::io::TruncationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors while parsing the XML document inside a KeePass database.
#[derive(Debug, Error)]
pub enum XmlParseError {
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error(transparent)]
    Encoding(#[from] std::str::Utf8Error),

    #[error("unexpected XML event: expected {expected}, got {event:?}")]
    BadEvent {
        expected: &'static str,
        event: crate::xml_db::SimpleXmlEvent,
    },

    #[error("unexpected end of XML document")]
    Eof,

    #[error("decompression error: {0}")]
    Decompression(#[source] std::io::Error),

    #[error("invalid integer in XML text: {0}")]
    InvalidInteger(#[from] std::num::ParseIntError),
}

#[cfg(not(tarpaulin_include))]
mod conversions {
    use super::*;

    impl From<CryptographyError> for DatabaseOpenError {
        fn from(e: CryptographyError) -> Self {
            DatabaseOpenError::Cryptography(e)
        }
    }
}
