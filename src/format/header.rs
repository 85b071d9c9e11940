//! Header parser: fixed signature, file version, then a TLV field loop.
//!
//! Built on [`crate::io::BinaryReader`] instead of manual slice indexing so
//! a short read anywhere in the header becomes a
//! [`crate::io::TruncationError`] rather than a panic.

use std::convert::TryFrom;

use crate::config::{Compression, OuterCipher};
use crate::error::HeaderError;
use crate::io::BinaryReader;

use super::{SIGNATURE1, SIGNATURE2};

/// The populated fixed + TLV header.
#[derive(Debug)]
pub struct Header {
    pub file_version_major: u16,
    pub file_version_minor: u16,
    pub comment: Vec<u8>,
    pub cipher_id: Vec<u8>,
    pub outer_cipher: OuterCipher,
    pub compression: Compression,
    pub master_seed: Vec<u8>,
    pub transform_seed: Vec<u8>,
    pub transform_rounds: u64,
    pub encryption_iv: Vec<u8>,
    pub protected_stream_key: Vec<u8>,
    pub stream_start_bytes: Vec<u8>,
    pub inner_random_stream_id: u32,
}

const FIELD_END: u8 = 0;
const FIELD_COMMENT: u8 = 1;
const FIELD_CIPHER_ID: u8 = 2;
const FIELD_COMPRESSION_FLAGS: u8 = 3;
const FIELD_MASTER_SEED: u8 = 4;
const FIELD_TRANSFORM_SEED: u8 = 5;
const FIELD_TRANSFORM_ROUNDS: u8 = 6;
const FIELD_ENCRYPTION_IV: u8 = 7;
const FIELD_PROTECTED_STREAM_KEY: u8 = 8;
const FIELD_STREAM_START_BYTES: u8 = 9;
const FIELD_INNER_RANDOM_STREAM_ID: u8 = 10;

#[derive(Default)]
struct Builder {
    comment: Option<Vec<u8>>,
    cipher_id: Option<Vec<u8>>,
    compression_flags: Option<u32>,
    master_seed: Option<Vec<u8>>,
    transform_seed: Option<Vec<u8>>,
    transform_rounds: Option<u64>,
    encryption_iv: Option<Vec<u8>>,
    protected_stream_key: Option<Vec<u8>>,
    stream_start_bytes: Option<Vec<u8>>,
    inner_random_stream_id: Option<u32>,
}

/// Parses the fixed signature, file version, and TLV header fields from the
/// start of `data`. Returns the populated header and the byte offset
/// immediately following the `END` field's payload, i.e. the start of the
/// ciphertext body.
pub(crate) fn parse(data: &[u8]) -> Result<(Header, usize), HeaderError> {
    let mut r = BinaryReader::new(data);

    let signature1 = r.read_u32("signature1")?;
    let signature2 = r.read_u32("signature2")?;
    if signature1 != SIGNATURE1 || signature2 != SIGNATURE2 {
        return Err(HeaderError::InvalidSignature);
    }

    let file_version = r.read_u32("file_version")?;
    let file_version_minor = (file_version & 0xFFFF) as u16;
    let file_version_major = (file_version >> 16) as u16;
    if !(1..=3).contains(&file_version_major) {
        return Err(HeaderError::UnsupportedVersion {
            major: file_version_major,
            minor: file_version_minor,
        });
    }

    let mut b = Builder::default();

    loop {
        let field_id = r.read_u8("header field id")?;
        let length = r.read_u16("header field length")? as usize;

        if field_id == FIELD_END {
            r.skip(length, "header END payload")?;
            break;
        }

        let data = r.read_bytes(length, "header field payload")?;

        match field_id {
            FIELD_COMMENT => set_once(&mut b.comment, data, field_id)?,
            FIELD_CIPHER_ID => {
                if data.len() != 16 {
                    return Err(HeaderError::InvalidFieldLength { field_id, length });
                }
                set_once(&mut b.cipher_id, data, field_id)?
            }
            FIELD_COMPRESSION_FLAGS => {
                if data.len() != 4 {
                    return Err(HeaderError::InvalidFieldLength { field_id, length });
                }
                set_once_u32(&mut b.compression_flags, u32_le(&data), field_id)?
            }
            FIELD_MASTER_SEED => {
                if data.len() != 32 {
                    return Err(HeaderError::InvalidFieldLength { field_id, length });
                }
                set_once(&mut b.master_seed, data, field_id)?
            }
            FIELD_TRANSFORM_SEED => {
                if data.len() != 32 {
                    return Err(HeaderError::InvalidFieldLength { field_id, length });
                }
                set_once(&mut b.transform_seed, data, field_id)?
            }
            FIELD_TRANSFORM_ROUNDS => {
                if data.len() != 8 {
                    return Err(HeaderError::InvalidFieldLength { field_id, length });
                }
                set_once_u64(&mut b.transform_rounds, u64_le(&data), field_id)?
            }
            FIELD_ENCRYPTION_IV => set_once(&mut b.encryption_iv, data, field_id)?,
            FIELD_PROTECTED_STREAM_KEY => set_once(&mut b.protected_stream_key, data, field_id)?,
            FIELD_STREAM_START_BYTES => set_once(&mut b.stream_start_bytes, data, field_id)?,
            FIELD_INNER_RANDOM_STREAM_ID => {
                if data.len() != 4 {
                    return Err(HeaderError::InvalidFieldLength { field_id, length });
                }
                set_once_u32(&mut b.inner_random_stream_id, u32_le(&data), field_id)?
            }
            _ => return Err(HeaderError::UnknownField { field_id }),
        }
    }

    let cipher_id = b.cipher_id.ok_or(HeaderError::MissingField { field: "cipher_id" })?;
    let outer_cipher = OuterCipher::try_from(cipher_id.as_slice())?;

    let compression_flags = b
        .compression_flags
        .ok_or(HeaderError::MissingField { field: "compression_flags" })?;
    let compression = Compression::try_from(compression_flags)?;

    let header = Header {
        file_version_major,
        file_version_minor,
        comment: b.comment.unwrap_or_default(),
        cipher_id,
        outer_cipher,
        compression,
        master_seed: b.master_seed.ok_or(HeaderError::MissingField { field: "master_seed" })?,
        transform_seed: b
            .transform_seed
            .ok_or(HeaderError::MissingField { field: "transform_seed" })?,
        transform_rounds: b
            .transform_rounds
            .ok_or(HeaderError::MissingField { field: "transform_rounds" })?,
        encryption_iv: b
            .encryption_iv
            .ok_or(HeaderError::MissingField { field: "encryption_iv" })?,
        protected_stream_key: b.protected_stream_key.unwrap_or_default(),
        stream_start_bytes: b
            .stream_start_bytes
            .ok_or(HeaderError::MissingField { field: "stream_start_bytes" })?,
        inner_random_stream_id: b.inner_random_stream_id.unwrap_or(0),
    };

    Ok((header, r.position()))
}

fn set_once(slot: &mut Option<Vec<u8>>, value: Vec<u8>, field_id: u8) -> Result<(), HeaderError> {
    if slot.is_some() {
        return Err(HeaderError::DuplicateField { field_id });
    }
    *slot = Some(value);
    Ok(())
}

fn set_once_u32(slot: &mut Option<u32>, value: u32, field_id: u8) -> Result<(), HeaderError> {
    if slot.is_some() {
        return Err(HeaderError::DuplicateField { field_id });
    }
    *slot = Some(value);
    Ok(())
}

fn set_once_u64(slot: &mut Option<u64>, value: u64, field_id: u8) -> Result<(), HeaderError> {
    if slot.is_some() {
        return Err(HeaderError::DuplicateField { field_id });
    }
    *slot = Some(value);
    Ok(())
}

fn u32_le(data: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(data);
    u32::from_le_bytes(buf)
}

fn u64_le(data: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(data);
    u64::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tlv(field_id: u8, data: &[u8]) -> Vec<u8> {
        let mut out = vec![field_id];
        out.extend_from_slice(&(data.len() as u16).to_le_bytes());
        out.extend_from_slice(data);
        out
    }

    fn golden_header() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&SIGNATURE1.to_le_bytes());
        buf.extend_from_slice(&SIGNATURE2.to_le_bytes());
        buf.extend_from_slice(&((3u32 << 16) | 1).to_le_bytes());

        buf.extend_from_slice(&tlv(FIELD_CIPHER_ID, &crate::config::CIPHERSUITE_AES256));
        buf.extend_from_slice(&tlv(FIELD_COMPRESSION_FLAGS, &0u32.to_le_bytes()));
        buf.extend_from_slice(&tlv(FIELD_MASTER_SEED, &[0x11u8; 32]));
        buf.extend_from_slice(&tlv(FIELD_TRANSFORM_SEED, &[0x22u8; 32]));
        buf.extend_from_slice(&tlv(FIELD_TRANSFORM_ROUNDS, &6000u64.to_le_bytes()));
        buf.extend_from_slice(&tlv(FIELD_ENCRYPTION_IV, &[0x33u8; 16]));
        buf.extend_from_slice(&tlv(FIELD_STREAM_START_BYTES, &[0x44u8; 32]));
        buf.extend_from_slice(&tlv(FIELD_END, &[]));

        buf.extend_from_slice(b"ciphertext-follows");
        buf
    }

    #[test]
    fn parses_golden_header() {
        let buf = golden_header();
        let (header, body_start) = parse(&buf).unwrap();
        assert_eq!(header.file_version_major, 3);
        assert_eq!(header.transform_rounds, 6000);
        assert_eq!(&buf[body_start..], b"ciphertext-follows");
    }

    #[test]
    fn rejects_bad_signature() {
        let mut buf = golden_header();
        buf[0] = 0;
        assert!(matches!(parse(&buf), Err(HeaderError::InvalidSignature)));
    }

    #[test]
    fn rejects_duplicate_field() {
        let mut buf = golden_header();
        let dup = tlv(FIELD_MASTER_SEED, &[0x11u8; 32]);
        // Splice a duplicate MASTER_SEED field in right after the signature/version.
        buf.splice(12..12, dup);
        assert!(matches!(parse(&buf), Err(HeaderError::DuplicateField { field_id: FIELD_MASTER_SEED })));
    }

    #[test]
    fn rejects_truncated_header() {
        let buf = golden_header();
        let truncated = &buf[..20];
        assert!(parse(truncated).is_err());
    }

    #[test]
    fn rejects_unknown_field_id() {
        let mut buf = golden_header();
        let unknown = tlv(200, b"whatever");
        // Splice an unrecognized field id in right after the signature/version.
        buf.splice(12..12, unknown);
        assert!(matches!(parse(&buf), Err(HeaderError::UnknownField { field_id: 200 })));
    }
}
