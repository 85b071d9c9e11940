//! Configuration knobs recovered from the header's TLV fields.
//!
//! Each axis is a small enum with a `TryFrom` to recover the choice from raw
//! header bytes, covering only what a KDBX2/3 reader needs: the outer body
//! cipher and the post-decryption compression. KDBX4's inner-cipher and
//! KDF-variant-dictionary configuration do not apply here and are left out.

use std::convert::TryFrom;

use hex_literal::hex;

use crate::error::HeaderError;

pub(crate) const CIPHERSUITE_AES256: [u8; 16] = hex!("31c1f2e6bf714350be5805216afc5aff");

/// The outer (body) cipher. KDBX3 only ever selects AES-256, but this stays
/// an enum so an unrecognized cipher UUID surfaces as a clean header error
/// instead of a silent assumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OuterCipher {
    Aes256,
}

impl TryFrom<&[u8]> for OuterCipher {
    type Error = HeaderError;

    fn try_from(uuid: &[u8]) -> Result<Self, Self::Error> {
        if uuid == CIPHERSUITE_AES256 {
            Ok(OuterCipher::Aes256)
        } else {
            Err(HeaderError::UnsupportedCipher)
        }
    }
}

/// Compression applied to the plaintext stream after the hashed-block layer
/// is validated, selected by the header's `compression_flags` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    GZip,
}

impl TryFrom<u32> for Compression {
    type Error = HeaderError;

    fn try_from(flags: u32) -> Result<Self, Self::Error> {
        match flags {
            0 => Ok(Compression::None),
            1 => Ok(Compression::GZip),
            other => Err(HeaderError::UnsupportedCompression { flags: other }),
        }
    }
}
